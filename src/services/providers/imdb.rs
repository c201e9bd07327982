//! IMDB review provider
//!
//! Fetches the reviews page for a title and extracts the single review with
//! the most helpful votes. One GET with a fixed browser `User-Agent` and a
//! fixed timeout, no retry: any transport failure, non-success status, or
//! review-free page degrades to "no review" rather than an error, so one
//! unreachable title never aborts a recommendation run.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use scraper::{ElementRef, Html, Selector};

use crate::error::AppResult;
use crate::services::providers::ReviewSource;

/// The review site serves an empty shell to unidentified clients
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

pub struct ImdbReviewSource {
    http_client: reqwest::Client,
    base_url: String,
}

impl ImdbReviewSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        Ok(Self {
            http_client: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait::async_trait]
impl ReviewSource for ImdbReviewSource {
    async fn fetch_review(&self, title_id: &str) -> AppResult<Option<String>> {
        let url = format!("{}/title/{}/reviews", self.base_url, title_id);

        let response = match self
            .http_client
            .get(&url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(title_id = %title_id, error = %e, "Review page fetch failed");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                title_id = %title_id,
                status = %response.status(),
                "Review page returned non-success status"
            );
            return Ok(None);
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(title_id = %title_id, error = %e, "Review page body unreadable");
                return Ok(None);
            }
        };

        let review = most_supported_review(&html);
        tracing::debug!(
            title_id = %title_id,
            found = review.is_some(),
            "Review page scraped"
        );
        Ok(review)
    }
}

/// Extracts the body text of the review with the most helpful votes.
///
/// The first review wins ties, matching the page's own ordering of equally
/// supported reviews.
pub(crate) fn most_supported_review(html: &str) -> Option<String> {
    let container_selector = Selector::parse("div.ipc-list-card__content").ok()?;
    let votes_selector = Selector::parse("span.ipc-voting__label__count--up").ok()?;
    let body_selector = Selector::parse("div.ipc-html-content-inner-div").ok()?;

    let document = Html::parse_document(html);

    let mut best: Option<(u64, ElementRef)> = None;
    for container in document.select(&container_selector) {
        let helpful = container
            .select(&votes_selector)
            .next()
            .map(|span| parse_helpful_votes(&span.text().collect::<String>()))
            .unwrap_or(0);
        if best.map_or(true, |(max_votes, _)| helpful > max_votes) {
            best = Some((helpful, container));
        }
    }

    let (_, review) = best?;
    let text = review
        .select(&body_selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parses a helpful-vote count such as "342" or "1.5K"; unparsable → 0
pub(crate) fn parse_helpful_votes(text: &str) -> u64 {
    let text = text.trim();
    if let Some(thousands) = text.strip_suffix('K') {
        thousands
            .parse::<f64>()
            .map(|count| (count * 1000.0) as u64)
            .unwrap_or(0)
    } else {
        text.parse::<u64>().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review_card(votes: &str, body: &str) -> String {
        format!(
            r#"<div class="ipc-list-card__content">
                 <span class="ipc-voting__label__count--up">{}</span>
                 <div class="ipc-html-content-inner-div">{}</div>
               </div>"#,
            votes, body
        )
    }

    #[test]
    fn test_parse_helpful_votes_plain() {
        assert_eq!(parse_helpful_votes("342"), 342);
        assert_eq!(parse_helpful_votes(" 12 "), 12);
    }

    #[test]
    fn test_parse_helpful_votes_thousands_suffix() {
        assert_eq!(parse_helpful_votes("1.5K"), 1500);
        assert_eq!(parse_helpful_votes("2K"), 2000);
    }

    #[test]
    fn test_parse_helpful_votes_unparsable_is_zero() {
        assert_eq!(parse_helpful_votes(""), 0);
        assert_eq!(parse_helpful_votes("1,234"), 0);
        assert_eq!(parse_helpful_votes("lots"), 0);
    }

    #[test]
    fn test_most_supported_review_picks_max_votes() {
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            review_card("12", "middling take"),
            review_card("1.5K", "the definitive review"),
            review_card("900", "close second"),
        );

        assert_eq!(
            most_supported_review(&html),
            Some("the definitive review".to_string())
        );
    }

    #[test]
    fn test_most_supported_review_first_wins_ties() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            review_card("10", "first"),
            review_card("10", "second"),
        );

        assert_eq!(most_supported_review(&html), Some("first".to_string()));
    }

    #[test]
    fn test_most_supported_review_missing_votes_counts_zero() {
        let html = format!(
            r#"<html><body>
                 <div class="ipc-list-card__content">
                   <div class="ipc-html-content-inner-div">unvoted</div>
                 </div>
                 {}
               </body></html>"#,
            review_card("3", "voted"),
        );

        assert_eq!(most_supported_review(&html), Some("voted".to_string()));
    }

    #[test]
    fn test_most_supported_review_no_reviews() {
        assert_eq!(most_supported_review("<html><body></body></html>"), None);
    }

    #[test]
    fn test_most_supported_review_missing_body_is_absent() {
        let html = r#"<html><body>
             <div class="ipc-list-card__content">
               <span class="ipc-voting__label__count--up">5</span>
             </div>
           </body></html>"#;

        assert_eq!(most_supported_review(html), None);
    }
}
