//! Text analytics provider
//!
//! Emotion classification calls a hosted per-label-score model and ranks
//! the returned labels locally; sentiment polarity is a local lexicon
//! scorer, so adding a watched entry never needs the network.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::Sentiment;
use crate::services::providers::TextAnalytics;

/// Dominant emotions kept per text
const TOP_EMOTIONS: usize = 3;

/// Polarity at or above this classifies a review as a like
const LIKE_THRESHOLD: f64 = 0.1;

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good", "great", "excellent", "amazing", "wonderful", "fantastic", "superb",
        "outstanding", "brilliant", "love", "loved", "best", "better", "happy", "joy",
        "joyful", "beautiful", "perfect", "awesome", "incredible", "magnificent",
        "delightful", "pleasant", "satisfying", "satisfied", "recommend", "recommended",
        "impressive", "exceptional", "remarkable", "masterpiece", "masterful", "gripping",
        "compelling", "captivating", "moving", "touching", "stunning", "powerful",
        "memorable", "enjoyable", "entertaining", "fun", "charming", "clever", "witty",
        "thrilling", "riveting", "flawless",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad", "terrible", "awful", "horrible", "poor", "worst", "worse", "hate",
        "hated", "dislike", "disliked", "disappointing", "disappointed", "disappointment",
        "boring", "bored", "dull", "bland", "tedious", "slow", "mess", "messy",
        "failure", "failed", "fail", "sad", "unhappy", "angry", "annoyed", "annoying",
        "frustrated", "frustrating", "problem", "wrong", "useless", "waste", "wasted",
        "pointless", "forgettable", "mediocre", "subpar", "inferior", "pathetic",
        "garbage", "trash", "lazy", "shallow", "confusing", "incoherent", "predictable",
        "overrated",
    ]
    .into_iter()
    .collect()
});

/// One classification from the emotion model
#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

pub struct EmotionApiAnalytics {
    http_client: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
}

impl EmotionApiAnalytics {
    pub fn new(
        api_url: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        Ok(Self {
            http_client: reqwest::Client::builder().timeout(timeout).build()?,
            api_url: api_url.into(),
            api_token,
        })
    }
}

#[async_trait::async_trait]
impl TextAnalytics for EmotionApiAnalytics {
    async fn emotions(&self, text: &str) -> AppResult<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self
            .http_client
            .post(&self.api_url)
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Emotion API returned status {}: {}",
                status, body
            )));
        }

        // The model returns all label scores per input: [[{label, score}, ...]]
        let classifications: Vec<Vec<LabelScore>> = response.json().await?;
        let ranked = rank_labels(
            classifications
                .into_iter()
                .flatten()
                .map(|c| (c.label, c.score)),
            TOP_EMOTIONS,
        );

        tracing::debug!(emotions = ?ranked, "Emotions classified");
        Ok(ranked)
    }

    fn sentiment(&self, text: &str) -> Sentiment {
        if polarity(text) >= LIKE_THRESHOLD {
            Sentiment::Like
        } else {
            Sentiment::Dislike
        }
    }
}

/// Aggregates per-label confidence scores and ranks labels by summed score
/// descending; ties keep the label's first occurrence order in the
/// classifier output.
pub(crate) fn rank_labels(
    scores: impl IntoIterator<Item = (String, f64)>,
    limit: usize,
) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();
    for (label, score) in scores {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            continue;
        }
        if !totals.contains_key(&label) {
            order.push(label.clone());
        }
        *totals.entry(label).or_insert(0.0) += score;
    }

    // stable sort: equal totals preserve first-occurrence order
    order.sort_by(|a, b| {
        totals[b]
            .partial_cmp(&totals[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(limit);
    order
}

/// Lexicon polarity in `[-1, 1]`; 0 when the text has no sentiment words
pub(crate) fn polarity(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let mut positive = 0usize;
    let mut negative = 0usize;
    for word in lowered
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| word.len() > 2)
    {
        if POSITIVE_WORDS.contains(word) {
            positive += 1;
        } else if NEGATIVE_WORDS.contains(word) {
            negative += 1;
        }
    }

    let total = positive + negative;
    if total == 0 {
        return 0.0;
    }
    (positive as f64 - negative as f64) / total as f64
}
