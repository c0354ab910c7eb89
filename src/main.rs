use clap::{Parser, Subcommand};
use study_xp::{
    catalog::Catalog,
    config::Settings,
    engine::GamificationService,
    ledger::SqliteLedger,
    models::{Counter, GamificationError},
    notify::{LogSink, Notifier},
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "study-xp")]
#[clap(about = "Award XP, levels and badges for study activity", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Award XP for an action or an explicit amount
    Award {
        /// User ID
        #[clap(short, long)]
        user_id: String,

        /// Action id (e.g. add_subject, complete_pomodoro)
        #[clap(short, long)]
        action: Option<String>,

        /// Explicit XP amount, overrides the action's amount
        #[clap(long)]
        amount: Option<u32>,
    },

    /// Show level, badges and progress for a user
    Stats {
        /// User ID
        #[clap(short, long)]
        user_id: String,
    },

    /// Increment an activity counter
    Counter {
        /// User ID
        #[clap(short, long)]
        user_id: String,

        /// Counter (subjects_created, lectures_completed, study_sessions, quiz_attempts)
        #[clap(short, long)]
        counter: String,
    },

    /// Show the most recent XP awards for a user
    History {
        /// User ID
        #[clap(short, long)]
        user_id: String,

        /// Number of entries
        #[clap(short, long, default_value = "10")]
        limit: u32,
    },

    /// List actions, badges and level tiers
    Catalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        eprintln!("Using default settings ({})", e);
        Settings::default()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level)),
        )
        .init();

    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return Err(GamificationError::ConfigError(e).into());
    }

    let catalog = Arc::new(Catalog::standard());

    match cli.command {
        Commands::Award { user_id, action, amount } => {
            let service = open_service(&settings, &catalog).await?;
            let mut notifier = Notifier::new();
            notifier.subscribe(Arc::new(LogSink));

            match service.award_xp(&user_id, action.as_deref(), amount).await {
                Ok(result) => {
                    println!("\n=== XP Awarded ===");
                    for event in notifier.publish(&result) {
                        println!("  {}", event.message());
                    }
                    println!("\nTotal XP: {}", result.total_xp);
                    println!("Level: {} - {}", result.new_level, result.new_tier.title);
                }
                Err(e) => {
                    error!("Failed to award XP: {}", e);
                    return Err(e.into());
                }
            }
        }

        Commands::Stats { user_id } => {
            let service = open_service(&settings, &catalog).await?;
            let stats = service.user_stats(&user_id).await?;
            println!("\n=== Progress for {} ===", stats.user_id);
            println!("XP: {}", stats.total_xp);
            println!("Level: {} - {} ({})", stats.level, stats.level_title, stats.level_color);
            if stats.xp_to_next_level > 0 {
                println!(
                    "Next level: {} XP to go ({:.1}%)",
                    stats.xp_to_next_level, stats.progress_to_next_level
                );
            } else {
                println!("Top level reached");
            }
            if stats.earned_badges.is_empty() {
                println!("Badges: none yet");
            } else {
                println!("Badges:");
                for badge in &stats.earned_badges {
                    println!("  {} - {}", badge.name, badge.description);
                }
            }
        }

        Commands::Counter { user_id, counter } => {
            let counter = Counter::from_str(&counter)
                .ok_or_else(|| anyhow::anyhow!("Invalid counter: {}", counter))?;
            let service = open_service(&settings, &catalog).await?;
            let counters = service.record_counter(&user_id, counter).await?;
            info!("Recorded {} for {}", counter.as_str(), user_id);
            println!("{} = {}", counter.as_str(), counters.get(counter));
        }

        Commands::History { user_id, limit } => {
            let ledger = SqliteLedger::connect(&settings.database).await?;
            let entries = ledger.recent_activity(&user_id, limit).await?;
            if entries.is_empty() {
                println!("No activity recorded for {}", user_id);
            }
            for entry in entries {
                println!(
                    "{}  +{:<4} {:<24} {}",
                    entry.created_at.format("%Y-%m-%d %H:%M"),
                    entry.amount,
                    entry.action,
                    entry.message
                );
            }
        }

        Commands::Catalog => print_catalog(&catalog),
    }

    Ok(())
}

async fn open_service(
    settings: &Settings,
    catalog: &Arc<Catalog>,
) -> anyhow::Result<GamificationService> {
    let ledger = SqliteLedger::connect(&settings.database).await?;
    Ok(GamificationService::new(
        catalog.clone(),
        Arc::new(ledger),
        settings.gamification.clone(),
    ))
}

fn print_catalog(catalog: &Catalog) {
    println!("\n=== Actions ===");
    for action in catalog.actions() {
        println!("  {:<24} {:>4} XP  {}", action.id.as_str(), action.xp, action.message);
    }

    println!("\n=== Badges ===");
    for badge in catalog.badges() {
        println!("  {:<18} {:>5} XP  {} - {}", badge.id, badge.xp_threshold, badge.name, badge.description);
    }

    println!("\n=== Levels ===");
    for tier in catalog.levels() {
        println!("  {:>2}  {:>5} XP  {} ({})", tier.level, tier.xp_threshold, tier.title, tier.color);
    }
}
