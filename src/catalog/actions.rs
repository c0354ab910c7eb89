use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    // Subjects
    AddSubject,
    CompleteSubject,
    // Lectures
    AddLecture,
    CompleteLecture,
    UploadFile,
    // Study sessions
    CompleteStudySession,
    CompletePomodoro,
    // Quizzes
    CreateQuiz,
    CompleteQuiz,
    PerfectScore,
    // AI assistant
    AskAi,
    UseAiSummary,
    // Planning
    CreatePlan,
    CompleteTask,
    // Daily activity
    DailyLogin,
    StreakWeek,
    StreakMonth,
}

impl ActionId {
    pub const ALL: [ActionId; 17] = [
        ActionId::AddSubject,
        ActionId::CompleteSubject,
        ActionId::AddLecture,
        ActionId::CompleteLecture,
        ActionId::UploadFile,
        ActionId::CompleteStudySession,
        ActionId::CompletePomodoro,
        ActionId::CreateQuiz,
        ActionId::CompleteQuiz,
        ActionId::PerfectScore,
        ActionId::AskAi,
        ActionId::UseAiSummary,
        ActionId::CreatePlan,
        ActionId::CompleteTask,
        ActionId::DailyLogin,
        ActionId::StreakWeek,
        ActionId::StreakMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::AddSubject => "add_subject",
            ActionId::CompleteSubject => "complete_subject",
            ActionId::AddLecture => "add_lecture",
            ActionId::CompleteLecture => "complete_lecture",
            ActionId::UploadFile => "upload_file",
            ActionId::CompleteStudySession => "complete_study_session",
            ActionId::CompletePomodoro => "complete_pomodoro",
            ActionId::CreateQuiz => "create_quiz",
            ActionId::CompleteQuiz => "complete_quiz",
            ActionId::PerfectScore => "perfect_score",
            ActionId::AskAi => "ask_ai",
            ActionId::UseAiSummary => "use_ai_summary",
            ActionId::CreatePlan => "create_plan",
            ActionId::CompleteTask => "complete_task",
            ActionId::DailyLogin => "daily_login",
            ActionId::StreakWeek => "streak_week",
            ActionId::StreakMonth => "streak_month",
        }
    }

    /// Ids are matched exactly; they are stable keys shared with stored activity.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionDefinition {
    pub id: ActionId,
    pub xp: u32,
    pub message: String,
}

impl ActionDefinition {
    pub fn new(id: ActionId, xp: u32, message: &str) -> Self {
        Self {
            id,
            xp,
            message: message.to_string(),
        }
    }
}

pub fn standard_actions() -> Vec<ActionDefinition> {
    vec![
        ActionDefinition::new(ActionId::AddSubject, 10, "You added a new subject!"),
        ActionDefinition::new(ActionId::CompleteSubject, 50, "You completed a subject!"),
        ActionDefinition::new(ActionId::AddLecture, 5, "You added a new lecture!"),
        ActionDefinition::new(ActionId::CompleteLecture, 15, "You completed a lecture!"),
        ActionDefinition::new(ActionId::UploadFile, 8, "You uploaded a lecture file!"),
        ActionDefinition::new(ActionId::CompleteStudySession, 20, "You completed a study session!"),
        ActionDefinition::new(ActionId::CompletePomodoro, 25, "You completed a pomodoro session!"),
        ActionDefinition::new(ActionId::CreateQuiz, 15, "You created a quiz!"),
        ActionDefinition::new(ActionId::CompleteQuiz, 30, "You completed a quiz!"),
        ActionDefinition::new(ActionId::PerfectScore, 50, "You got a perfect score!"),
        ActionDefinition::new(ActionId::AskAi, 2, "You asked the AI assistant!"),
        ActionDefinition::new(ActionId::UseAiSummary, 5, "You used the AI summary!"),
        ActionDefinition::new(ActionId::CreatePlan, 10, "You created a study plan!"),
        ActionDefinition::new(ActionId::CompleteTask, 8, "You completed a task!"),
        ActionDefinition::new(ActionId::DailyLogin, 5, "You logged in today!"),
        ActionDefinition::new(ActionId::StreakWeek, 100, "You stayed active for a week!"),
        ActionDefinition::new(ActionId::StreakMonth, 500, "You stayed active for a month!"),
    ]
}
