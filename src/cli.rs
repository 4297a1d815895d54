//! Command-line interface argument parsing for lichess-insight.
//!
//! - `lichess-insight show`
//! - `lichess-insight show --user "DrNykterstein" --range 1y`
//! - `lichess-insight show --api-url "http://localhost:8080/api"`

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::{TimeRange, DEFAULT_API_URL};

/// Environment variable overriding the API root
pub const API_URL_ENV: &str = "LICHESS_API_URL";

/// A terminal dashboard for exploring Lichess rating history.
#[derive(Parser, Debug)]
#[command(name = "lichess-insight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the dashboard
    Show {
        /// Username to look up on startup
        #[arg(short, long)]
        user: Option<String>,

        /// Initial chart range: 3m, 6m, 1y or all
        #[arg(short, long, default_value = "all")]
        range: TimeRange,

        /// Root of the Lichess API
        #[arg(long, env = API_URL_ENV)]
        api_url: Option<String>,

        /// Where to write the diagnostic log
        /// Defaults to <cache dir>/lichess-insight/lichess-insight.log
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub initial_user: Option<String>,
    pub initial_range: TimeRange,
    pub api_url: String,
    pub log_file: PathBuf,
}

impl AppConfig {
    /// Create AppConfig from the `show` command's arguments
    pub fn from_show_command(
        user: Option<String>,
        range: TimeRange,
        api_url: Option<String>,
        log_file: Option<PathBuf>,
    ) -> Self {
        let initial_user = user
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let api_url = api_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let log_file = log_file.unwrap_or_else(default_log_file);

        AppConfig {
            initial_user,
            initial_range: range,
            api_url,
            log_file,
        }
    }
}

/// `<cache dir>/lichess-insight/lichess-insight.log`, or the working directory
/// when no cache dir exists
fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("lichess-insight"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lichess-insight.log")
}
