//! External collaborator abstractions
//!
//! The matching engine and the preference deriver only ever talk to the
//! review site and the text-analytics models through these traits; concrete
//! providers are constructed once at startup and passed in as
//! `Arc<dyn ...>`. Tests substitute mocks to assert gate ordering and call
//! counts.

use crate::error::AppResult;
use crate::models::Sentiment;

pub mod emotion;
pub mod imdb;

pub use emotion::EmotionApiAnalytics;
pub use imdb::ImdbReviewSource;

/// Source of the single most-supported public review for a title
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetches the most-supported review text for a catalog identifier.
    ///
    /// `Ok(None)` means no review is available (page unreachable, no
    /// reviews posted) and is distinct from a successful empty-text review.
    async fn fetch_review(&self, title_id: &str) -> AppResult<Option<String>>;
}

/// Emotion and sentiment classification over free text
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextAnalytics: Send + Sync {
    /// Up to 3 dominant emotion labels, lowercase, most dominant first
    async fn emotions(&self, text: &str) -> AppResult<Vec<String>>;

    /// Binary like/dislike polarity of a review
    fn sentiment(&self, text: &str) -> Sentiment;
}
