//! Preference Deriver: turns one renewal session's movies into a fresh
//! preference record.
//!
//! Each renewal is a full replacement — previous preferences never bleed
//! into the aggregation. Genres and emotions are tallied across the
//! session's entries (top 3 each, ties by first-seen order); the era band
//! is classified from the average of the entries' release years.

use std::collections::HashMap;

use crate::error::AppResult;
use crate::models::{Preferences, SessionEntry, Sentiment, TitleRef, YearBand};
use crate::services::providers::TextAnalytics;
use crate::store::UserStore;

/// Kept per preference list
const TOP_PREFERENCES: usize = 3;

/// Classifies the review's sentiment and appends the movie to the watched
/// list; called once per session entry as it is gathered.
pub fn record_watched(
    store: &UserStore,
    analytics: &dyn TextAnalytics,
    movie: &TitleRef,
    review: &str,
) -> AppResult<Sentiment> {
    let sentiment = analytics.sentiment(review);
    store.append_watched(movie, review, sentiment)?;
    tracing::info!(title = %movie.title, sentiment = %sentiment, "Watched entry recorded");
    Ok(sentiment)
}

/// Aggregates a session's entries into a replacement preference record
pub async fn derive(analytics: &dyn TextAnalytics, entries: &[SessionEntry]) -> Preferences {
    let genres = top_by_count(
        entries.iter().flat_map(|entry| {
            entry
                .genres
                .iter()
                .map(|genre| genre.trim().to_string())
                .filter(|genre| !genre.is_empty())
        }),
        TOP_PREFERENCES,
    );

    let years: Vec<i32> = entries
        .iter()
        .filter_map(|entry| {
            if entry.year.is_none() {
                tracing::warn!(title = %entry.movie.title, "No release year for session entry");
            }
            entry.year
        })
        .collect();
    let year = if years.is_empty() {
        YearBand::New
    } else {
        let average = years.iter().sum::<i32>() as f64 / years.len() as f64;
        YearBand::classify_average(average)
    };

    let mut emotion_labels = Vec::new();
    for entry in entries {
        match analytics.emotions(&entry.review).await {
            Ok(labels) => emotion_labels.extend(labels.into_iter().map(|l| l.to_lowercase())),
            Err(e) => {
                tracing::warn!(
                    title = %entry.movie.title,
                    error = %e,
                    "Emotion analysis failed for session entry"
                );
            }
        }
    }
    let emotions = top_by_count(emotion_labels.into_iter(), TOP_PREFERENCES);

    let preferences = Preferences {
        genres,
        emotions,
        year: Some(year),
    };
    tracing::info!(
        genres = ?preferences.genres,
        emotions = ?preferences.emotions,
        year = %year,
        "Preferences derived from session"
    );
    preferences
}

/// Tallies occurrences and returns the most frequent items, ties broken by
/// first-seen order
fn top_by_count(items: impl Iterator<Item = String>, limit: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in items {
        if !counts.contains_key(&item) {
            order.push(item.clone());
        }
        *counts.entry(item).or_insert(0) += 1;
    }

    // stable sort: equal counts preserve first-seen order
    order.sort_by_key(|item| std::cmp::Reverse(counts[item]));
    order.truncate(limit);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::MockTextAnalytics;

    fn session_entry(title: &str, year: Option<i32>, genres: &[&str], review: &str) -> SessionEntry {
        SessionEntry {
            movie: TitleRef::with_id(format!("tt-{}", title), title),
            year,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            review: review.to_string(),
        }
    }

    fn analytics_returning(emotions: Vec<Vec<&'static str>>) -> MockTextAnalytics {
        let mut analytics = MockTextAnalytics::new();
        let mut responses = emotions.into_iter();
        analytics.expect_emotions().returning(move |_| {
            let labels = responses
                .next()
                .unwrap_or_default()
                .into_iter()
                .map(String::from)
                .collect();
            Ok(labels)
        });
        analytics
    }

    #[test]
    fn test_top_by_count_ranks_and_breaks_ties_first_seen() {
        let top = top_by_count(
            ["Drama", "Action", "Drama", "Thriller", "Action", "Drama"]
                .into_iter()
                .map(String::from),
            2,
        );
        assert_eq!(top, vec!["Drama", "Action"]);

        let tied = top_by_count(
            ["Comedy", "Horror", "Romance"].into_iter().map(String::from),
            3,
        );
        assert_eq!(tied, vec!["Comedy", "Horror", "Romance"]);
    }

    #[tokio::test]
    async fn test_derive_aggregates_genres_and_emotions() {
        let entries = vec![
            session_entry("A", Some(2012), &["Drama", "Crime"], "gripping"),
            session_entry("B", Some(2016), &["Drama"], "moving"),
            session_entry("C", Some(2014), &["Crime", "Thriller"], "tense"),
        ];
        let analytics = analytics_returning(vec![
            vec!["joy", "surprise"],
            vec!["joy", "sadness"],
            vec!["fear", "joy"],
        ]);

        let preferences = derive(&analytics, &entries).await;
        assert_eq!(preferences.genres, vec!["Drama", "Crime", "Thriller"]);
        assert_eq!(preferences.emotions[0], "joy");
        assert_eq!(preferences.emotions.len(), 3);
        // average year 2014 classifies as the 2010-2019 band
        assert_eq!(preferences.year, Some(YearBand::New));
    }

    #[tokio::test]
    async fn test_derive_defaults_year_band_when_no_valid_years() {
        let entries = vec![session_entry("A", None, &["Drama"], "fine")];
        let analytics = analytics_returning(vec![vec!["joy"]]);

        let preferences = derive(&analytics, &entries).await;
        assert_eq!(preferences.year, Some(YearBand::New));
    }

    #[tokio::test]
    async fn test_derive_gap_average_is_unknown() {
        // 1999 and 2000 average to 1999.5, which no band covers
        let entries = vec![
            session_entry("A", Some(1999), &["Drama"], "fine"),
            session_entry("B", Some(2000), &["Drama"], "fine"),
        ];
        let analytics = analytics_returning(vec![vec![], vec![]]);

        let preferences = derive(&analytics, &entries).await;
        assert_eq!(preferences.year, Some(YearBand::Unknown));
    }

    #[tokio::test]
    async fn test_derive_skips_failed_emotion_calls() {
        let entries = vec![
            session_entry("A", Some(2015), &["Drama"], "first"),
            session_entry("B", Some(2015), &["Drama"], "second"),
        ];
        let mut analytics = MockTextAnalytics::new();
        let mut call = 0;
        analytics.expect_emotions().returning(move |_| {
            call += 1;
            if call == 1 {
                Err(crate::error::AppError::ExternalApi("down".to_string()))
            } else {
                Ok(vec!["anger".to_string()])
            }
        });

        let preferences = derive(&analytics, &entries).await;
        assert_eq!(preferences.emotions, vec!["anger"]);
    }

    #[test]
    fn test_record_watched_appends_with_classified_sentiment() {
        let dir = tempfile::tempdir().unwrap();
        let store = UserStore::new(dir.path());
        let mut analytics = MockTextAnalytics::new();
        analytics
            .expect_sentiment()
            .returning(|_| Sentiment::Like);

        let sentiment = record_watched(
            &store,
            &analytics,
            &TitleRef::with_id("tt0113277", "Heat"),
            "the diner scene alone",
        )
        .unwrap();

        assert_eq!(sentiment, Sentiment::Like);
        let watched = store.load_watched().unwrap();
        assert_eq!(watched.len(), 1);
        assert_eq!(watched[0].movie.title, "Heat");
        assert_eq!(watched[0].sentiment, Sentiment::Like);
    }
}
