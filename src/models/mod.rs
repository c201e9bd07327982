mod catalog;
mod preferences;
mod watchlist;

pub use catalog::{CatalogEntry, RatingRecord, YearBand};
pub use preferences::Preferences;
pub use watchlist::{Sentiment, SessionEntry, TitleRef, WatchedEntry};
