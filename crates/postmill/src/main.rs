// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Postmill - scheduled blog post generation and publishing.
//!
//! This is the binary entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use postmill::{commands, serve};
use postmill_config::PostmillConfig;
use postmill_core::PostmillError;

/// Postmill - scheduled blog post generation and publishing.
#[derive(Parser, Debug)]
#[command(name = "postmill", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scheduler and the trigger gateway.
    Serve,
    /// Run one pipeline iteration and print the result as JSON.
    Run,
    /// Generate new topics for the queue.
    Replenish,
    /// Inspect or edit the topic queue.
    Queue {
        #[command(subcommand)]
        action: QueueCommands,
    },
    /// Show recent pipeline log entries.
    Logs {
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Inspect or edit the run schedule.
    Schedule {
        #[command(subcommand)]
        action: ScheduleCommands,
    },
}

#[derive(Subcommand, Debug)]
enum QueueCommands {
    /// List every queue item, newest first.
    List,
    /// Add a topic.
    Add {
        topic: String,
        #[arg(long)]
        keyphrase: Option<String>,
        /// Repeat for several keywords.
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
    /// Return a held or discarded item to pending.
    Requeue { id: String },
    /// Mark a pending or held item discarded.
    Discard { id: String },
}

#[derive(Subcommand, Debug)]
enum ScheduleCommands {
    /// Print the persisted schedule and its next run times.
    Show,
    /// Persist a new schedule.
    Set {
        /// Daily run times as HH:MM, comma separated or repeated.
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        times: Vec<String>,
        /// IANA timezone name, e.g. Europe/Berlin.
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long, conflicts_with = "paused")]
        active: bool,
        #[arg(long)]
        paused: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> PostmillConfig {
    let loaded = match path {
        Some(path) => postmill_config::load_and_validate_path(path),
        None => postmill_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            postmill_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

async fn dispatch(command: Commands, config: PostmillConfig) -> Result<(), PostmillError> {
    match command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Run => commands::run_once(&config).await,
        Commands::Replenish => commands::replenish(&config).await,
        Commands::Queue { action } => match action {
            QueueCommands::List => commands::queue_list(&config).await,
            QueueCommands::Add {
                topic,
                keyphrase,
                keywords,
            } => commands::queue_add(&config, &topic, keyphrase.as_deref(), &keywords).await,
            QueueCommands::Requeue { id } => commands::queue_requeue(&config, &id).await,
            QueueCommands::Discard { id } => commands::queue_discard(&config, &id).await,
        },
        Commands::Logs { limit } => commands::logs(&config, limit).await,
        Commands::Schedule { action } => match action {
            ScheduleCommands::Show => commands::schedule_show(&config).await,
            ScheduleCommands::Set {
                times,
                timezone,
                active,
                paused,
            } => {
                let active = match (active, paused) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                };
                commands::schedule_set(&config, times, timezone, active).await
            }
        },
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());
    serve::init_tracing(&config.service.log_level);

    if let Err(e) = dispatch(cli.command, config).await {
        eprintln!("postmill: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn queue_add_collects_repeated_keywords() {
        let cli = Cli::parse_from([
            "postmill",
            "queue",
            "add",
            "Winter lip care",
            "--keyphrase",
            "winter lips",
            "--keyword",
            "balm",
            "--keyword",
            "beeswax",
        ]);
        match cli.command {
            Commands::Queue {
                action: QueueCommands::Add { topic, keyphrase, keywords },
            } => {
                assert_eq!(topic, "Winter lip care");
                assert_eq!(keyphrase.as_deref(), Some("winter lips"));
                assert_eq!(keywords, vec!["balm", "beeswax"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn queue_review_takes_an_id() {
        let cli = Cli::parse_from(["postmill", "queue", "requeue", "q-17"]);
        assert!(matches!(
            cli.command,
            Commands::Queue { action: QueueCommands::Requeue { ref id } } if id == "q-17"
        ));

        let cli = Cli::parse_from(["postmill", "queue", "discard", "q-18"]);
        assert!(matches!(
            cli.command,
            Commands::Queue { action: QueueCommands::Discard { ref id } } if id == "q-18"
        ));

        assert!(Cli::try_parse_from(["postmill", "queue", "requeue"]).is_err());
    }

    #[test]
    fn schedule_set_splits_times() {
        let cli = Cli::parse_from([
            "postmill", "schedule", "set", "--times", "07:00,19:30", "--paused",
        ]);
        match cli.command {
            Commands::Schedule {
                action: ScheduleCommands::Set { times, active, paused, .. },
            } => {
                assert_eq!(times, vec!["07:00", "19:30"]);
                assert!(!active);
                assert!(paused);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn active_and_paused_conflict() {
        let parsed = Cli::try_parse_from([
            "postmill", "schedule", "set", "--active", "--paused",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn logs_limit_defaults_to_fifty() {
        let cli = Cli::parse_from(["postmill", "logs"]);
        assert!(matches!(cli.command, Commands::Logs { limit: 50 }));
    }
}
