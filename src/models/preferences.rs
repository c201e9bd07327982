use serde::{Deserialize, Serialize};

use super::YearBand;

/// User taste profile driving the matching engine
///
/// A single record per user, fully replaced (never merged) on each
/// preference renewal. `year: None` means the era preference is unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Preferences {
    /// Preferred genres, at most 3, most frequent first
    pub genres: Vec<String>,
    /// Preferred review emotions, at most 3, most frequent first
    pub emotions: Vec<String>,
    /// Preferred release-era band
    pub year: Option<YearBand>,
}

impl Preferences {
    /// Creates an empty preference record
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no preference field is set at all
    ///
    /// The recommendation flow checks this before constructing the matching
    /// engine and reports "preferences not set" instead of running it.
    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.emotions.is_empty() && self.year.is_none()
    }
}
