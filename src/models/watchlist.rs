use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Binary review polarity stored with each watched entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Like,
    Dislike,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Like => "like",
            Sentiment::Dislike => "dislike",
        }
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Sentiment::Like),
            "dislike" => Ok(Sentiment::Dislike),
            _ => Err(()),
        }
    }
}

/// Reference to a movie in persisted lists
///
/// Carries the catalog identifier alongside the display title so list
/// entries survive catalog title collisions; entries loaded from legacy
/// files carry only the title. Encoded as `title|id`, or a bare title when
/// no id is known — titles therefore must not contain `|` (nor the `,` and
/// `:` separators of the enclosing formats).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleRef {
    pub id: Option<String>,
    pub title: String,
}

impl TitleRef {
    /// A reference with no catalog id (direct user entry, legacy lines)
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
        }
    }

    /// A reference backed by a catalog identifier
    pub fn with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
        }
    }

    pub fn encode(&self) -> String {
        match &self.id {
            Some(id) => format!("{}|{}", self.title, id),
            None => self.title.clone(),
        }
    }

    pub fn decode(field: &str) -> Self {
        match field.split_once('|') {
            Some((title, id)) if !id.trim().is_empty() => {
                TitleRef::with_id(id.trim(), title.trim())
            }
            Some((title, _)) => TitleRef::new(title.trim()),
            None => TitleRef::new(field.trim()),
        }
    }
}

/// One line of the append-only watched list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    /// 1-based position, assigned at append time and never reused
    pub number: usize,
    pub movie: TitleRef,
    pub review: String,
    pub sentiment: Sentiment,
}

impl WatchedEntry {
    /// Serializes to the `<number>.<ref>:<review>:<sentiment>` line format
    pub fn encode_line(&self) -> String {
        format!(
            "{}.{}:{}:{}",
            self.number,
            self.movie.encode(),
            self.review,
            self.sentiment
        )
    }

    /// Parses one persisted line; `None` for any line that does not split
    /// into exactly three colon fields and a `number.title` head.
    pub fn decode_line(line: &str) -> Option<WatchedEntry> {
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() != 3 {
            return None;
        }
        let (number, movie) = parts[0].split_once('.')?;
        let number = number.trim().parse::<usize>().ok()?;
        let sentiment = parts[2].trim().parse::<Sentiment>().ok()?;
        Some(WatchedEntry {
            number,
            movie: TitleRef::decode(movie),
            review: parts[1].to_string(),
            sentiment,
        })
    }
}

/// A movie gathered during one preference-renewal session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEntry {
    pub movie: TitleRef,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub review: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_ref_encode_with_id() {
        let movie = TitleRef::with_id("tt0111161", "The Shawshank Redemption");
        assert_eq!(movie.encode(), "The Shawshank Redemption|tt0111161");
    }

    #[test]
    fn test_title_ref_encode_bare() {
        assert_eq!(TitleRef::new("Heat").encode(), "Heat");
    }

    #[test]
    fn test_title_ref_decode_round_trip() {
        for movie in [
            TitleRef::with_id("tt0068646", "The Godfather"),
            TitleRef::new("The Godfather"),
        ] {
            assert_eq!(TitleRef::decode(&movie.encode()), movie);
        }
    }

    #[test]
    fn test_title_ref_decode_empty_id_is_bare() {
        assert_eq!(TitleRef::decode("Heat|"), TitleRef::new("Heat"));
    }

    #[test]
    fn test_watched_entry_line_round_trip() {
        let entry = WatchedEntry {
            number: 4,
            movie: TitleRef::with_id("tt0137523", "Fight Club"),
            review: "held up on rewatch".to_string(),
            sentiment: Sentiment::Like,
        };
        assert_eq!(
            entry.encode_line(),
            "4.Fight Club|tt0137523:held up on rewatch:like"
        );
        assert_eq!(WatchedEntry::decode_line(&entry.encode_line()), Some(entry));
    }

    #[test]
    fn test_watched_entry_decode_legacy_line() {
        let entry = WatchedEntry::decode_line("1.Alien:terrifying:like").unwrap();
        assert_eq!(entry.number, 1);
        assert_eq!(entry.movie, TitleRef::new("Alien"));
        assert_eq!(entry.review, "terrifying");
        assert_eq!(entry.sentiment, Sentiment::Like);
    }

    #[test]
    fn test_watched_entry_decode_rejects_malformed() {
        // wrong number of colon fields
        assert_eq!(WatchedEntry::decode_line("1.Alien:terrifying"), None);
        assert_eq!(WatchedEntry::decode_line("1.Alien:a:b:like"), None);
        // no number.title split
        assert_eq!(WatchedEntry::decode_line("Alien:terrifying:like"), None);
        // non-numeric position
        assert_eq!(WatchedEntry::decode_line("x.Alien:terrifying:like"), None);
        // unknown sentiment
        assert_eq!(WatchedEntry::decode_line("1.Alien:terrifying:meh"), None);
    }
}
