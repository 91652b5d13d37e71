use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "postwatch",
    version,
    about = "Watches publishing accounts for new posts and replies",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Data directory for settings and the post cache.
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Upstream API base URL.
    #[arg(long, value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Poll on the configured intervals until interrupted.
    Run {
        /// Run a post sync right after starting.
        #[arg(long)]
        refresh_now: bool,
    },
    /// Run one post sync followed by one comment sync.
    Refresh,
    /// Start tracking an entity by ID.
    Track {
        /// Entity ID.
        id: String,
    },
    /// Stop tracking an entity.
    Untrack {
        /// Entity ID.
        id: String,
    },
    /// List tracked entities.
    List,
    /// Search upstream entities by keyword.
    Search {
        /// Search keyword.
        keyword: String,
    },
    /// Mark a post or comment as read.
    MarkRead {
        /// Post or comment ID.
        id: String,
    },
}

impl CliArgs {
    /// Subcommand to run, `run` when none was given.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Run { refresh_now: false })
    }
}
