//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig, LogLevel};
pub use args::{CliArgs, Command};
pub use storage::{ConfigError, ConfigManager};
