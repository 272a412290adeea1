//! Byamn Challenges CLI
//!
//! Operator tool for inspecting and driving the challenge tracker against a
//! local progress database.
//!
//! ## Usage
//!
//! ```bash
//! # Show the active challenge board for a user
//! byamn-challenges --user u1 list
//!
//! # Record an activity (advances every challenge bound to it)
//! byamn-challenges --user u1 record lesson_complete
//! byamn-challenges --user u1 record study_time --amount 1.5
//!
//! # Dump raw progress records
//! byamn-challenges --user u1 show
//! ```
//!
//! Omitting `--user` runs as an anonymous guest: recording becomes a no-op,
//! exactly as in the platform.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use byamn_challenges::{
    activity_kinds, AnalyticsSink, ChallengeEvent, Config, EventBus, FixedIdentityProvider,
    PersistStatus, ProgressStore, Services, TracingAnalytics, GUEST_SENTINEL,
};

#[derive(Parser, Debug)]
#[command(name = "byamn-challenges")]
#[command(about = "Challenge progress tracker for the Byamn learning platform")]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storage directory for the progress database
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Acting user id (omit to run as an anonymous guest)
    #[arg(long, env = "BYAMN_USER_ID")]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List active challenges with current progress
    List,
    /// Record an activity against every challenge bound to it
    Record {
        /// Activity kind, e.g. lesson_complete or study_time
        kind: String,
        /// Activity magnitude (hours, cards, ...)
        #[arg(long, default_value_t = 1.0)]
        amount: f64,
    },
    /// Dump raw progress records for the user
    Show,
    /// List the activity kinds the tracker understands
    Kinds,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("byamn_challenges=info".parse()?),
        )
        .init();

    let args = Args::parse();

    // Load config
    let mut config = if let Some(config_path) = &args.config {
        Config::load(config_path).context("loading config")?
    } else {
        Config::default()
    };

    // Apply CLI overrides
    if let Some(dir) = args.storage_dir {
        config.storage_dir = dir;
    }

    // Ensure storage directory exists
    tokio::fs::create_dir_all(&config.storage_dir)
        .await
        .context("creating storage directory")?;

    // Save default config if it doesn't exist
    let config_path = config.config_path();
    if !config_path.exists() {
        config.save(&config_path)?;
        info!(path = %config_path.display(), "Created default config");
    }

    let store = Arc::new(
        ProgressStore::open(config.progress_db_path()).context("opening progress database")?,
    );
    let identity = FixedIdentityProvider::from_user_id(args.user.as_deref());
    let events = Arc::new(EventBus::with_capacity(config.event_channel_capacity));
    let analytics: Option<Arc<dyn AnalyticsSink>> = if config.analytics_enabled {
        Some(Arc::new(TracingAnalytics))
    } else {
        None
    };
    let services = Services::build(store, identity, events.clone(), analytics);

    // Reads fall back to the guest document (always empty, never written)
    let display_user = args.user.clone().unwrap_or_else(|| GUEST_SENTINEL.to_string());

    match args.command {
        Command::List => {
            let views = services.tracker.challenge_views(&display_user);
            if views.is_empty() {
                println!("No active challenges.");
                return Ok(());
            }
            println!("Active challenges for {}:", display_user);
            for view in views {
                println!(
                    "  {:<26} {:<16} {:>6.1}/{:<6.1} {:<9} {:>3.0}%  {:>2}d left  [{}]",
                    view.id,
                    view.title,
                    view.progress,
                    view.goal,
                    view.unit,
                    view.progress_percentage,
                    view.days_until_expiry,
                    if view.completed { "done" } else { "open" },
                );
            }
        }

        Command::Record { kind, amount } => {
            let mut receiver = events.subscribe();
            let outcome = services.tracker.record_activity(&kind, amount);

            match outcome.persistence {
                PersistStatus::Anonymous => {
                    println!("Anonymous session: activity not tracked (pass --user to track).");
                }
                PersistStatus::Skipped => {
                    println!("No challenge advanced for kind '{}'.", kind);
                }
                PersistStatus::Saved => {
                    println!("Advanced {} challenge(s): {}", outcome.updated.len(), outcome.updated.join(", "));
                }
                PersistStatus::Failed(ref e) => {
                    println!("Progress updated in memory but the write failed: {}", e);
                }
            }

            while let Ok(event) = receiver.try_recv() {
                if let ChallengeEvent::Completed { title, reward, .. } = event {
                    println!("🎉 Challenge completed: {} ({})", title, reward);
                }
            }
        }

        Command::Show => {
            let records = services.tracker.progress_for(&display_user);
            if records.is_empty() {
                println!("No progress recorded for {}.", display_user);
                return Ok(());
            }
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Command::Kinds => {
            for kind in activity_kinds::ALL {
                let bound: Vec<_> = services
                    .tracker
                    .catalog()
                    .bound_to(kind)
                    .map(|d| d.id.as_str())
                    .collect();
                println!("  {:<18} -> {}", kind, bound.join(", "));
            }
        }
    }

    Ok(())
}
