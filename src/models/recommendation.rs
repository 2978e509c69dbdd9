use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Genre recorded for a watched movie when no metadata was available
pub const UNKNOWN_GENRE: &str = "Unknown";

/// A single movie suggested by the LLM
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Recommendation {
    /// Movie title, never empty
    pub title: String,
    /// Four-digit release year
    pub year: String,
    /// Why the movie fits the user's day
    pub reason: String,
}

impl Recommendation {
    pub fn new(
        title: impl Into<String>,
        year: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
            reason: reason.into(),
        }
    }
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}

/// A recommendation the user saved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteEntry {
    pub title: String,
    pub year: String,
    pub reason: String,
}

impl From<&Recommendation> for FavoriteEntry {
    fn from(rec: &Recommendation) -> Self {
        Self {
            title: rec.title.clone(),
            year: rec.year.clone(),
            reason: rec.reason.clone(),
        }
    }
}

/// A recommendation the user marked as watched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchHistoryEntry {
    #[serde(flatten)]
    pub movie: Recommendation,
    pub watch_date: NaiveDate,
    /// Comma-separated genre string from metadata, or [`UNKNOWN_GENRE`]
    pub genre: String,
}
