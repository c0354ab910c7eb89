use std::sync::Arc;

use futures::future::join_all;
use study_xp::{
    catalog::Catalog,
    config::GamificationSettings,
    engine::GamificationService,
    ledger::{InMemoryLedger, LedgerAccessor, SqliteLedger},
    models::{Counter, GamificationError, UserProgress},
    notify::{ChannelSink, Notification, Notifier},
};

fn build_service(ledger: Arc<dyn LedgerAccessor>) -> GamificationService {
    GamificationService::new(
        Arc::new(Catalog::standard()),
        ledger,
        GamificationSettings::default(),
    )
}

#[tokio::test]
async fn test_first_award_over_sqlite() {
    let ledger = Arc::new(SqliteLedger::in_memory().await.unwrap());
    let service = build_service(ledger.clone());

    let result = service.award_xp("student-1", Some("add_subject"), None).await.unwrap();

    assert_eq!(result.total_xp, 10);
    assert_eq!(result.new_level, 1);
    assert_eq!(result.newly_earned_badges.len(), 1);
    assert_eq!(result.newly_earned_badges[0].id, "first_subject");

    let stored = ledger.get("student-1").await.unwrap().unwrap();
    assert_eq!(stored.total_xp, 10);
    assert_eq!(stored.level, 1);
    assert!(stored.has_badge("first_subject"));

    let log = ledger.recent_activity("student-1", 10).await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, "add_subject");
    assert_eq!(log[0].amount, 10);
}

#[tokio::test]
async fn test_level_up_over_sqlite() {
    let ledger = Arc::new(SqliteLedger::in_memory().await.unwrap());
    let mut progress = UserProgress::new("student-2");
    progress.total_xp = 95;
    progress.earned_badges.insert("first_subject".to_string());
    ledger.create(progress).await.unwrap();

    let service = build_service(ledger.clone());
    let result = service.award_xp("student-2", None, Some(10)).await.unwrap();

    assert_eq!(result.total_xp, 105);
    assert!(result.leveled_up);
    assert_eq!(result.new_level, 2);
    assert!(result.newly_earned_badges.is_empty());

    let stored = ledger.get("student-2").await.unwrap().unwrap();
    assert_eq!(stored.level, 2);
    assert_eq!(stored.earned_badges.len(), 1);
}

#[tokio::test]
async fn test_unknown_action_leaves_xp_unchanged() {
    let ledger = Arc::new(SqliteLedger::in_memory().await.unwrap());
    let service = build_service(ledger.clone());
    service.award_xp("student-3", Some("daily_login"), None).await.unwrap();

    let err = service.award_xp("student-3", Some("bogus"), None).await.unwrap_err();

    assert!(matches!(err, GamificationError::UnknownAction(_)));
    assert!(!err.is_persistence());
    let stored = ledger.get("student-3").await.unwrap().unwrap();
    assert_eq!(stored.total_xp, 5);
}

#[tokio::test]
async fn test_xp_and_badges_monotonic_over_a_session() {
    let ledger = Arc::new(InMemoryLedger::new());
    let service = build_service(ledger.clone());

    let actions = [
        "daily_login",
        "add_subject",
        "add_lecture",
        "complete_lecture",
        "complete_pomodoro",
        "complete_quiz",
        "perfect_score",
        "streak_week",
        "streak_month",
        "complete_subject",
        "streak_month",
    ];

    let mut last_xp = 0;
    let mut last_badges = 0;
    for action in actions {
        let result = service.award_xp("student-4", Some(action), None).await.unwrap();
        let stored = ledger.get("student-4").await.unwrap().unwrap();

        assert!(stored.total_xp > last_xp);
        assert!(stored.earned_badges.len() >= last_badges);
        assert_eq!(stored.level, service.catalog().derive_level(stored.total_xp));
        assert_eq!(result.total_xp, stored.total_xp);

        last_xp = stored.total_xp;
        last_badges = stored.earned_badges.len();
    }

    assert_eq!(last_xp, 1_290);
    assert_eq!(last_badges, 6);
    assert_eq!(ledger.activities_for("student-4").len(), actions.len());
}

#[tokio::test]
async fn test_concurrent_awards_for_one_user_are_not_lost() {
    let ledger = Arc::new(SqliteLedger::in_memory().await.unwrap());
    let service = Arc::new(build_service(ledger.clone()));

    let awards = (0..20).map(|_| {
        let service = service.clone();
        async move { service.award_xp("student-5", Some("complete_quiz"), None).await }
    });
    let results = join_all(awards).await;

    assert!(results.iter().all(|r| r.is_ok()));
    let stored = ledger.get("student-5").await.unwrap().unwrap();
    assert_eq!(stored.total_xp, 600);
    assert_eq!(stored.level, 4);
}

#[tokio::test]
async fn test_stats_and_counters() {
    let ledger = Arc::new(InMemoryLedger::new());
    let service = build_service(ledger.clone());

    service.award_xp("student-6", Some("streak_week"), None).await.unwrap();
    service.award_xp("student-6", Some("complete_subject"), None).await.unwrap();
    service.record_counter("student-6", Counter::SubjectsCreated).await.unwrap();

    let stats = service.user_stats("student-6").await.unwrap();
    assert_eq!(stats.total_xp, 150);
    assert_eq!(stats.level, 2);
    assert_eq!(stats.xp_to_next_level, 100);
    assert!((stats.progress_to_next_level - 100.0 / 3.0).abs() < 1e-9);

    let stored = ledger.get("student-6").await.unwrap().unwrap();
    assert_eq!(stored.counters.subjects_created, 1);
    assert_eq!(stored.total_xp, 150);
}

#[tokio::test]
async fn test_notifications_reach_channel() {
    let ledger = Arc::new(InMemoryLedger::new());
    let mut progress = UserProgress::new("student-7");
    progress.total_xp = 90;
    progress.earned_badges.insert("first_subject".to_string());
    ledger.create(progress).await.unwrap();
    let service = build_service(ledger);

    let (sink, mut rx) = ChannelSink::new();
    let mut notifier = Notifier::new();
    notifier.subscribe(Arc::new(sink));

    let result = service.award_xp("student-7", Some("complete_quiz"), None).await.unwrap();
    notifier.publish(&result);

    let mut received = Vec::new();
    while let Ok(event) = rx.try_recv() {
        received.push(event);
    }

    assert_eq!(received.len(), 2);
    assert!(matches!(received[0], Notification::XpGained { amount: 30, .. }));
    assert!(matches!(received[1], Notification::LevelUp { ref tier } if tier.level == 2));
}
