//! lichess-insight: a terminal dashboard for Lichess rating history
//!
//! Looks up a player, then shows their profile, per-mode rating tiles and a
//! rating chart with selectable time ranges.

mod app;
mod cli;
mod data;
mod logging;
mod state;
mod ui;

use anyhow::Result;
use cli::{AppConfig, Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Show {
            user,
            range,
            api_url,
            log_file,
        } => {
            let config = AppConfig::from_show_command(user, range, api_url, log_file);

            logging::init(&config.log_file)?;
            tracing::info!(api_url = %config.api_url, "starting dashboard");

            // Run the TUI application
            app::run(config)?;
        }
    }

    Ok(())
}
