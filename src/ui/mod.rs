//! Terminal User Interface components for lichess-insight.

pub mod chart;
mod help;
mod theme;
pub mod widgets;

pub use help::HelpOverlay;
pub use theme::Theme;
