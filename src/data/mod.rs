//! Data layer: Lichess API access and the pure reshaping applied to its documents.
//!
//! Fetches profiles and rating history, then derives chart series, axis
//! domains and the default mode from them.

mod client;
pub mod history;
mod models;
pub mod scale;
pub mod selector;

pub use client::{FetchError, LichessClient, DEFAULT_API_URL};
pub use history::Projection;
pub use models::{Performance, Profile, RatingHistoryEntry, SearchResult, TimeControl, TimeRange};
pub use scale::PeriodSummary;
