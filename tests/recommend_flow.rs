//! End-to-end recommendation flow over real store files, with canned
//! external providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use movie_match::catalog;
use movie_match::models::{CatalogEntry, Preferences, RatingRecord, Sentiment, TitleRef, YearBand};
use movie_match::services::matcher::{MatchOptions, Matcher};
use movie_match::services::providers::{ReviewSource, TextAnalytics};
use movie_match::store::UserStore;
use movie_match::AppResult;

/// Review source that always serves the same review and counts its calls
struct CannedReviews {
    review: Option<String>,
    calls: AtomicUsize,
}

impl CannedReviews {
    fn some(text: &str) -> Arc<Self> {
        Arc::new(Self {
            review: Some(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl ReviewSource for CannedReviews {
    async fn fetch_review(&self, _title_id: &str) -> AppResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.review.clone())
    }
}

/// Analytics that always reports the same emotions
struct CannedAnalytics {
    emotions: Vec<String>,
}

impl CannedAnalytics {
    fn with(emotions: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            emotions: emotions.iter().map(|e| e.to_string()).collect(),
        })
    }
}

#[async_trait::async_trait]
impl TextAnalytics for CannedAnalytics {
    async fn emotions(&self, _text: &str) -> AppResult<Vec<String>> {
        Ok(self.emotions.clone())
    }

    fn sentiment(&self, _text: &str) -> Sentiment {
        Sentiment::Like
    }
}

fn movie(id: &str, title: &str, year: i32, genres: &[&str]) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        title: title.to_string(),
        start_year: Some(year),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

fn rated(id: &str, average: f64, votes: u64) -> RatingRecord {
    RatingRecord {
        id: id.to_string(),
        average_rating: Some(average),
        num_votes: Some(votes),
    }
}

fn options() -> MatchOptions {
    MatchOptions {
        max_results: 3,
        cooldown: Duration::ZERO,
    }
}

#[tokio::test]
async fn recommendation_run_persists_and_stays_deduplicated() {
    let dir = tempfile::tempdir().unwrap();
    let store = UserStore::new(dir.path());

    let preferences = Preferences {
        genres: vec!["Drama".to_string()],
        emotions: vec!["joy".to_string()],
        year: Some(YearBand::New),
    };
    store.save_preferences(&preferences).unwrap();
    assert_eq!(store.load_preferences().unwrap(), preferences);

    let full_catalog = vec![
        movie("tt1", "X", 2015, &["Drama"]),
        // wrong era, must never reach the external calls
        movie("tt2", "Y", 1995, &["Drama"]),
    ];
    let ratings = vec![rated("tt1", 8.0, 100_000), rated("tt2", 9.0, 900_000)];

    let reviews = CannedReviews::some("what a joyful film");
    let analytics = CannedAnalytics::with(&["joy", "sadness", "anger"]);

    let watched = store.load_watched().unwrap();
    let watch_later = store.load_watch_later().unwrap();
    let mut matcher = Matcher::new(
        &preferences,
        &full_catalog,
        catalog::rating_lookup(&ratings),
        &watched,
        &watch_later,
        &store,
        reviews.clone(),
        analytics.clone(),
        options(),
    );

    let first = matcher.next_match().await.unwrap().unwrap();
    assert_eq!(first.title, "X");
    assert_eq!(matcher.next_match().await.unwrap(), None);

    // only the era-matching candidate cost a review fetch
    assert_eq!(reviews.calls.load(Ordering::SeqCst), 1);

    // the acceptance is on disk, with its catalog id
    assert_eq!(
        store.load_watch_later().unwrap(),
        vec![TitleRef::with_id("tt1", "X")]
    );

    // a fresh run over reloaded state never re-accepts the same title
    let watched = store.load_watched().unwrap();
    let watch_later = store.load_watch_later().unwrap();
    let mut rerun = Matcher::new(
        &preferences,
        &full_catalog,
        catalog::rating_lookup(&ratings),
        &watched,
        &watch_later,
        &store,
        reviews.clone(),
        analytics.clone(),
        options(),
    );
    assert_eq!(rerun.next_match().await.unwrap(), None);
    assert_eq!(reviews.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn promoted_watch_later_entry_round_trips_through_watched() {
    let dir = tempfile::tempdir().unwrap();
    let store = UserStore::new(dir.path());

    store
        .append_watch_later(&TitleRef::with_id("tt1", "X"))
        .unwrap();
    store.append_watch_later(&TitleRef::new("Y")).unwrap();

    let removed = store.remove_watch_later(0).unwrap();
    assert_eq!(removed, TitleRef::with_id("tt1", "X"));

    store
        .append_watched(&removed, "kept thinking about it", Sentiment::Like)
        .unwrap();

    let watched = store.load_watched().unwrap();
    assert_eq!(watched.len(), 1);
    assert_eq!(watched[0].number, 1);
    assert_eq!(watched[0].movie, TitleRef::with_id("tt1", "X"));

    assert_eq!(store.load_watch_later().unwrap(), vec![TitleRef::new("Y")]);
}

#[test]
fn fresh_store_reports_unset_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let store = UserStore::new(dir.path());

    // the shell checks this before ever constructing a Matcher
    assert!(store.load_preferences().unwrap().is_empty());
}
