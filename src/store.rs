//! User State Store: the three persisted per-user entities.
//!
//! Each entity lives in one flat text file under the data directory and is
//! read fully, mutated in memory, and written back wholesale per operation.
//! There is no locking: callers must not interleave concurrent writers
//! (single-user, single-process contract). Malformed lines are dropped on
//! read, never surfaced as errors.
//!
//! Files written by this version start with a `format=2` marker and encode
//! list entries as `title|id` references; legacy files and lines (bare
//! titles, no marker) still load, with the id absent.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::models::{Preferences, Sentiment, TitleRef, WatchedEntry, YearBand};

const PREFERENCES_FILE: &str = "preferences.txt";
const WATCHED_FILE: &str = "watched.txt";
const WATCH_LATER_FILE: &str = "watch_later.txt";

/// First line of list files written in the current format
const FORMAT_MARKER: &str = "format=2";

/// File-backed store for preferences, the watched list, and the watch-later
/// list
#[derive(Debug, Clone)]
pub struct UserStore {
    dir: PathBuf,
}

impl UserStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn read_if_exists(&self, file: &str) -> AppResult<String> {
        let path = self.path(file);
        if !path.exists() {
            return Ok(String::new());
        }
        Ok(fs::read_to_string(path)?)
    }

    fn write_whole(&self, file: &str, contents: &str) -> AppResult<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(file), contents)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------

    /// Reads the preference record; a missing file is an empty record.
    /// Unrecognized lines are ignored.
    pub fn load_preferences(&self) -> AppResult<Preferences> {
        let contents = self.read_if_exists(PREFERENCES_FILE)?;
        let mut preferences = Preferences::new();
        for line in contents.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("Genres:") {
                preferences.genres = split_comma_list(rest);
            } else if let Some(rest) = line.strip_prefix("Emotions:") {
                preferences.emotions = split_comma_list(rest);
            } else if let Some(rest) = line.strip_prefix("Year:") {
                preferences.year = rest.trim().parse::<YearBand>().ok();
            }
        }
        Ok(preferences)
    }

    /// Replaces the preference file wholesale
    pub fn save_preferences(&self, preferences: &Preferences) -> AppResult<()> {
        let year = preferences.year.map(|b| b.as_str()).unwrap_or("");
        let contents = format!(
            "Genres:{}\nEmotions:{}\nYear:{}\n",
            preferences.genres.join(","),
            preferences.emotions.join(","),
            year
        );
        self.write_whole(PREFERENCES_FILE, &contents)
    }

    // ------------------------------------------------------------------
    // Watched list
    // ------------------------------------------------------------------

    /// Reads the watched list in file order, skipping malformed lines
    pub fn load_watched(&self) -> AppResult<Vec<WatchedEntry>> {
        let contents = self.read_if_exists(WATCHED_FILE)?;
        let mut entries = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line == FORMAT_MARKER {
                continue;
            }
            match WatchedEntry::decode_line(line) {
                Some(entry) => entries.push(entry),
                None => tracing::debug!(line = %line, "Skipping malformed watched entry"),
            }
        }
        Ok(entries)
    }

    /// Appends one watched entry, numbering it `count(valid existing) + 1`
    pub fn append_watched(
        &self,
        movie: &TitleRef,
        review: &str,
        sentiment: Sentiment,
    ) -> AppResult<WatchedEntry> {
        let entry = WatchedEntry {
            number: self.load_watched()?.len() + 1,
            movie: movie.clone(),
            review: review.to_string(),
            sentiment,
        };

        let path = self.path(WATCHED_FILE);
        if path.exists() {
            let mut file = OpenOptions::new().append(true).open(path)?;
            writeln!(file, "{}", entry.encode_line())?;
        } else {
            self.write_whole(
                WATCHED_FILE,
                &format!("{}\n{}\n", FORMAT_MARKER, entry.encode_line()),
            )?;
        }
        Ok(entry)
    }

    // ------------------------------------------------------------------
    // Watch-later list
    // ------------------------------------------------------------------

    /// Reads the watch-later list in stored order
    pub fn load_watch_later(&self) -> AppResult<Vec<TitleRef>> {
        let contents = self.read_if_exists(WATCH_LATER_FILE)?;
        let movies = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && *line != FORMAT_MARKER)
            .flat_map(|line| line.split(','))
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(TitleRef::decode)
            .collect();
        Ok(movies)
    }

    fn save_watch_later(&self, movies: &[TitleRef]) -> AppResult<()> {
        let joined = movies
            .iter()
            .map(TitleRef::encode)
            .collect::<Vec<_>>()
            .join(",");
        self.write_whole(WATCH_LATER_FILE, &format!("{}\n{}\n", FORMAT_MARKER, joined))
    }

    /// Appends a movie to the end of the watch-later list
    pub fn append_watch_later(&self, movie: &TitleRef) -> AppResult<()> {
        let mut movies = self.load_watch_later()?;
        movies.push(movie.clone());
        self.save_watch_later(&movies)
    }

    /// Removes and returns the movie at `index`, failing when the index is
    /// outside `[0, len)`
    pub fn remove_watch_later(&self, index: usize) -> AppResult<TitleRef> {
        let mut movies = self.load_watch_later()?;
        if index >= movies.len() {
            return Err(AppError::InvalidInput(format!(
                "watch later index {} out of range (list has {} entries)",
                index,
                movies.len()
            )));
        }
        let removed = movies.remove(index);
        self.save_watch_later(&movies)?;
        Ok(removed)
    }
}

fn split_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
