//! Matching Engine: the six-gate recommendation pipeline.
//!
//! Candidates are evaluated in catalog order, cheap gates first, so a
//! movie that fails on genre or year never costs a review fetch. Every
//! acceptance is persisted to the watch-later list before the next
//! candidate is considered, which makes a run's own acceptances visible to
//! its dedup gate. The engine is a pull-based sequence: call
//! [`Matcher::next_match`] until it returns `None`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppResult;
use crate::models::{CatalogEntry, Preferences, RatingRecord, TitleRef, WatchedEntry, YearBand};
use crate::services::providers::{ReviewSource, TextAnalytics};
use crate::store::UserStore;

/// Minimum average rating, exclusive
const MIN_AVERAGE_RATING: f64 = 6.5;

/// Minimum vote count, exclusive
const MIN_VOTE_COUNT: u64 = 50_000;

/// Tuning knobs for one engine run
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Acceptances before the run stops
    pub max_results: usize,
    /// Pause after each acceptance that leaves the run unfinished, bounding
    /// load on the review source
    pub cooldown: Duration,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_results: 3,
            cooldown: Duration::from_secs(1),
        }
    }
}

/// An accepted candidate, with the fields the shell displays
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub rating: f64,
}

/// One recommendation run over the catalog
///
/// Non-restartable: the catalog cursor only moves forward. Construct a new
/// `Matcher` (re-reading the persisted lists) to run again.
pub struct Matcher<'a> {
    wanted_genres: HashSet<String>,
    wanted_emotions: HashSet<String>,
    wanted_band: Option<YearBand>,
    required_genre_matches: usize,
    required_emotion_matches: usize,
    catalog: &'a [CatalogEntry],
    ratings: HashMap<&'a str, &'a RatingRecord>,
    seen_titles: HashSet<String>,
    store: &'a UserStore,
    reviews: Arc<dyn ReviewSource>,
    analytics: Arc<dyn TextAnalytics>,
    options: MatchOptions,
    cursor: usize,
    accepted: usize,
    cooldown_pending: bool,
}

impl<'a> Matcher<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        preferences: &Preferences,
        catalog: &'a [CatalogEntry],
        ratings: HashMap<&'a str, &'a RatingRecord>,
        watched: &[WatchedEntry],
        watch_later: &[TitleRef],
        store: &'a UserStore,
        reviews: Arc<dyn ReviewSource>,
        analytics: Arc<dyn TextAnalytics>,
        options: MatchOptions,
    ) -> Self {
        let seen_titles = watched
            .iter()
            .map(|entry| entry.movie.title.to_lowercase())
            .chain(watch_later.iter().map(|movie| movie.title.to_lowercase()))
            .collect();

        Self {
            wanted_genres: preferences
                .genres
                .iter()
                .map(|g| g.to_lowercase())
                .collect(),
            wanted_emotions: preferences
                .emotions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            wanted_band: preferences.year,
            required_genre_matches: required_matches(preferences.genres.len()),
            required_emotion_matches: required_matches(preferences.emotions.len()),
            catalog,
            ratings,
            seen_titles,
            store,
            reviews,
            analytics,
            options,
            cursor: 0,
            accepted: 0,
            cooldown_pending: false,
        }
    }

    /// Advances to the next accepted candidate, or `None` when the run is
    /// over (result cap reached or catalog exhausted).
    ///
    /// The acceptance is already persisted to the watch-later list when
    /// this returns.
    pub async fn next_match(&mut self) -> AppResult<Option<Recommendation>> {
        if self.accepted >= self.options.max_results {
            return Ok(None);
        }
        if self.cooldown_pending {
            tokio::time::sleep(self.options.cooldown).await;
            self.cooldown_pending = false;
        }

        while self.cursor < self.catalog.len() {
            let entry = &self.catalog[self.cursor];
            self.cursor += 1;

            if let Some(recommendation) = self.evaluate(entry).await? {
                self.accepted += 1;
                if self.accepted < self.options.max_results {
                    self.cooldown_pending = true;
                }
                return Ok(Some(recommendation));
            }
        }

        Ok(None)
    }

    /// Runs a candidate through the gate sequence; `None` means rejected
    async fn evaluate(&mut self, entry: &CatalogEntry) -> AppResult<Option<Recommendation>> {
        // 1. genre gate
        let genre_matches = entry
            .genres
            .iter()
            .filter(|genre| self.wanted_genres.contains(&genre.trim().to_lowercase()))
            .count();
        if genre_matches < self.required_genre_matches {
            return Ok(None);
        }

        // 2. year gate
        let Some(band) = entry.start_year.and_then(YearBand::classify_year) else {
            return Ok(None);
        };
        if let Some(wanted) = self.wanted_band {
            if band != wanted {
                return Ok(None);
            }
        }

        // 3. dedup gate
        if self.seen_titles.contains(&entry.title.to_lowercase()) {
            return Ok(None);
        }

        // 4. rating gate
        let Some(rating) = self.ratings.get(entry.id.as_str()) else {
            return Ok(None);
        };
        let (Some(average_rating), Some(num_votes)) = (rating.average_rating, rating.num_votes)
        else {
            return Ok(None);
        };
        if average_rating <= MIN_AVERAGE_RATING || num_votes <= MIN_VOTE_COUNT {
            return Ok(None);
        }

        // 5. review gate
        let review = match self.reviews.fetch_review(&entry.id).await {
            Ok(Some(review)) => review,
            Ok(None) => {
                tracing::debug!(title = %entry.title, "No review available");
                return Ok(None);
            }
            Err(e) => {
                tracing::warn!(title = %entry.title, error = %e, "Review fetch failed, skipping candidate");
                return Ok(None);
            }
        };

        // 6. emotion gate
        let emotions = match self.analytics.emotions(&review).await {
            Ok(emotions) => emotions,
            Err(e) => {
                tracing::warn!(title = %entry.title, error = %e, "Emotion analysis failed, skipping candidate");
                return Ok(None);
            }
        };
        let emotion_matches = emotions
            .iter()
            .filter(|emotion| self.wanted_emotions.contains(&emotion.trim().to_lowercase()))
            .count();
        if emotion_matches < self.required_emotion_matches {
            return Ok(None);
        }

        // accepted: persist before any later candidate is evaluated
        self.store
            .append_watch_later(&TitleRef::with_id(entry.id.clone(), entry.title.clone()))?;
        self.seen_titles.insert(entry.title.to_lowercase());

        tracing::info!(
            title = %entry.title,
            year = ?entry.start_year,
            rating = average_rating,
            "Recommendation accepted"
        );

        Ok(Some(Recommendation {
            id: entry.id.clone(),
            title: entry.title.clone(),
            year: entry.start_year,
            genres: entry.genres.clone(),
            rating: average_rating,
        }))
    }
}

/// Required list-overlap count: 2 once the user states two or more
/// preferences, otherwise 1.
///
/// The floor stays at 1 even for an empty preference list, so an empty
/// genre or emotion list matches no candidate at all.
fn required_matches(preference_count: usize) -> usize {
    if preference_count >= 2 {
        2
    } else {
        1
    }
}
