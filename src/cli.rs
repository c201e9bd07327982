//! Interactive menu shell
//!
//! Thin layer over the services: numeric menu selections, re-prompt on
//! anything invalid, no flags. All state flows through [`App`], wired once
//! at startup.

use std::io::{self, Write};
use std::sync::Arc;

use crate::catalog;
use crate::error::{AppError, AppResult};
use crate::models::{CatalogEntry, Preferences, RatingRecord, SessionEntry, TitleRef};
use crate::services::deriver;
use crate::services::matcher::{MatchOptions, Matcher};
use crate::services::providers::{ReviewSource, TextAnalytics};
use crate::services::search;
use crate::store::UserStore;

/// Everything the shell needs, constructed once in `main`
pub struct App {
    pub catalog: Vec<CatalogEntry>,
    pub ratings: Vec<RatingRecord>,
    pub store: UserStore,
    pub reviews: Arc<dyn ReviewSource>,
    pub analytics: Arc<dyn TextAnalytics>,
    pub options: MatchOptions,
}

/// Runs the main menu loop until the user quits
pub async fn run(app: &App) -> AppResult<()> {
    loop {
        println!("\nWelcome to Movie Match");
        println!("1. Recommend a movie");
        println!("2. View a watched list");
        println!("3. View a watch later list");
        println!("4. Search by title");
        println!("5. Quit");

        let choice = prompt("Choose an option: ");
        match choice.as_str() {
            "1" => recommendation_menu(app).await?,
            "2" => view_watched(app)?,
            "3" => view_watch_later(app)?,
            "4" => search_by_title(app).await?,
            "5" => {
                println!("Exiting Movie Match. Goodbye!");
                return Ok(());
            }
            other if other.eq_ignore_ascii_case("quit") => {
                println!("Exiting Movie Match. Goodbye!");
                return Ok(());
            }
            _ => println!("Invalid choice. Please select again."),
        }
    }
}

fn prompt(message: &str) -> String {
    print!("{}", message);
    let _ = io::stdout().flush();

    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        // stdin closed: treat like an explicit quit
        Ok(0) | Err(_) => {
            println!("\nExiting Movie Match. Goodbye!");
            std::process::exit(0);
        }
        Ok(_) => line.trim().to_string(),
    }
}

fn display_year(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string())
}

/// Numbered disambiguation when several catalog entries share a title
fn select_movie<'a>(
    title: &str,
    matches: &[&'a CatalogEntry],
    message: &str,
) -> &'a CatalogEntry {
    if matches.len() == 1 {
        return matches[0];
    }

    println!("Multiple movies found with the title '{}':", title);
    for (index, movie) in matches.iter().enumerate() {
        println!(
            "{}. {} ({}) | Genres: {}",
            index + 1,
            movie.title,
            display_year(movie.start_year),
            movie.genres.join(",")
        );
    }
    loop {
        match prompt(message).parse::<usize>() {
            Ok(selection) if (1..=matches.len()).contains(&selection) => {
                return matches[selection - 1]
            }
            Ok(_) => println!("Invalid selection. Please enter a valid number."),
            Err(_) => println!("Invalid input. Please enter a number."),
        }
    }
}

// ----------------------------------------------------------------------
// Recommendation
// ----------------------------------------------------------------------

async fn recommendation_menu(app: &App) -> AppResult<()> {
    loop {
        println!("\nRecommend a Movie");
        println!("1. Recommend based on preferences");
        println!("2. Renew preferences");
        println!("3. Go back to menu");

        match prompt("Choose an option: ").as_str() {
            "1" => recommend(app).await?,
            "2" => renew_preferences(app).await?,
            "3" => return Ok(()),
            _ => println!("Invalid choice. Please select again."),
        }
    }
}

async fn recommend(app: &App) -> AppResult<()> {
    let preferences = app.store.load_preferences()?;
    if preferences.is_empty() {
        println!("Preferences are not set. Please renew preferences first.");
        return Ok(());
    }

    let watched = app.store.load_watched()?;
    let watch_later = app.store.load_watch_later()?;
    let mut matcher = Matcher::new(
        &preferences,
        &app.catalog,
        catalog::rating_lookup(&app.ratings),
        &watched,
        &watch_later,
        &app.store,
        Arc::clone(&app.reviews),
        Arc::clone(&app.analytics),
        app.options.clone(),
    );

    let mut accepted = 0;
    while let Some(movie) = matcher.next_match().await? {
        accepted += 1;
        println!(
            "Recommended Movie: {} ({}) | Genres: {} | Rating: {}",
            movie.title,
            display_year(movie.year),
            movie.genres.join(","),
            movie.rating
        );
    }

    if accepted > 0 {
        println!("\nRecommended movies have been added to your watch later list.");
    } else {
        println!("\nNo recommendations found based on your current preferences.");
    }
    Ok(())
}

async fn renew_preferences(app: &App) -> AppResult<()> {
    // each renewal starts from a clean slate; earlier preferences never
    // influence the new aggregation
    app.store.save_preferences(&Preferences::new())?;

    println!("\nRenewing preferences...");
    println!("Enter your favorite movies and reviews. Type 'stop' when you're done.");

    let mut session: Vec<SessionEntry> = Vec::new();
    loop {
        let title = prompt("Enter your favorite movie title (or type 'stop' to finish): ");
        if title.eq_ignore_ascii_case("stop") {
            break;
        }
        if title.is_empty() {
            println!("Title cannot be empty. Please try again.");
            continue;
        }

        let matches = search::find_by_title(&app.catalog, &title);
        if matches.is_empty() {
            println!("No movies found with the title '{}'. Please try again.", title);
            continue;
        }
        let selected = select_movie(
            &title,
            &matches,
            "Enter the number of the movie you have watched: ",
        );

        let review = prompt("Enter your review for the movie: ");
        if review.is_empty() {
            println!("Review cannot be empty. Please try again.");
            continue;
        }

        let movie = TitleRef::with_id(selected.id.clone(), selected.title.clone());
        let sentiment =
            deriver::record_watched(&app.store, app.analytics.as_ref(), &movie, &review)?;
        println!(
            "Movie '{}' has been added to your watched list with a status of '{}'.",
            selected.title, sentiment
        );

        session.push(SessionEntry {
            movie,
            year: selected.start_year,
            genres: selected.genres.clone(),
            review,
        });
    }

    if session.is_empty() {
        println!("No new movies were entered. Preferences remain unchanged.");
        return Ok(());
    }

    let preferences = deriver::derive(app.analytics.as_ref(), &session).await;
    app.store.save_preferences(&preferences)?;

    println!("\nPreferences have been updated successfully!");
    println!("Genres: {}", preferences.genres.join(", "));
    println!("Emotions: {}", preferences.emotions.join(", "));
    println!(
        "Year: {}",
        preferences.year.map(|b| b.to_string()).unwrap_or_default()
    );
    Ok(())
}

// ----------------------------------------------------------------------
// Watched list
// ----------------------------------------------------------------------

fn view_watched(app: &App) -> AppResult<()> {
    let watched = app.store.load_watched()?;
    if watched.is_empty() {
        println!("\nYour watched list is empty.");
    } else {
        println!("\nWatched Movies:");
        for entry in &watched {
            println!(
                "{}. {}: {} ({})",
                entry.number, entry.movie.title, entry.review, entry.sentiment
            );
        }
    }

    let choice = prompt("\nDo you want to add a movie to your watched list? (yes/no): ");
    if !choice.eq_ignore_ascii_case("yes") {
        return Ok(());
    }

    loop {
        let title = prompt("Enter the movie title (or type 'stop' to finish adding): ");
        if title.eq_ignore_ascii_case("stop") {
            break;
        }
        if title.is_empty() {
            println!("Title cannot be empty. Please try again.");
            continue;
        }
        let review = prompt("Enter your review: ");
        if review.is_empty() {
            println!("Review cannot be empty. Please try again.");
            continue;
        }

        // direct entries are not resolved against the catalog, so no id
        let sentiment = deriver::record_watched(
            &app.store,
            app.analytics.as_ref(),
            &TitleRef::new(&title),
            &review,
        )?;
        println!(
            "Movie '{}' has been added to your watched list with a status of '{}'.",
            title, sentiment
        );
    }
    Ok(())
}

// ----------------------------------------------------------------------
// Watch-later list
// ----------------------------------------------------------------------

fn view_watch_later(app: &App) -> AppResult<()> {
    let movies = app.store.load_watch_later()?;
    if movies.is_empty() {
        println!("\nYour watch later list is empty.");
    } else {
        println!("\nWatch Later Movies:");
        for (index, movie) in movies.iter().enumerate() {
            println!("{}. {}", index + 1, movie.title);
        }
    }

    loop {
        println!("\nOptions:");
        println!("1. Add a new movie");
        println!("2. Remove a movie");
        println!("3. Go back to menu");

        match prompt("Choose an option: ").as_str() {
            "1" => {
                let title = prompt("Enter the movie title to add: ");
                if title.is_empty() {
                    println!("Title cannot be empty. Please try again.");
                    continue;
                }
                app.store.append_watch_later(&TitleRef::new(&title))?;
                println!("Movie '{}' has been added to your watch later list.", title);
            }
            "2" => remove_watch_later_flow(app)?,
            "3" => return Ok(()),
            _ => println!("Invalid choice. Please select again."),
        }
    }
}

fn remove_watch_later_flow(app: &App) -> AppResult<()> {
    let movies = app.store.load_watch_later()?;
    if movies.is_empty() {
        println!("Watch later list is empty.");
        return Ok(());
    }

    let index = match prompt("Enter the number of the movie to remove: ").parse::<usize>() {
        Ok(number) if number >= 1 => number - 1,
        _ => {
            println!("Please enter a valid number.");
            return Ok(());
        }
    };
    let removed = match app.store.remove_watch_later(index) {
        Ok(movie) => movie,
        Err(AppError::InvalidInput(_)) => {
            println!("Invalid number.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    println!(
        "Movie '{}' has been removed from your watch later list.",
        removed.title
    );

    loop {
        let action = prompt("Do you want to delete it or move to watched list? (delete/move): ");
        match action.to_lowercase().as_str() {
            "delete" => {
                println!("Movie '{}' has been deleted.", removed.title);
                return Ok(());
            }
            "move" => {
                let review = prompt("Enter your review for the movie: ");
                if review.is_empty() {
                    println!("Review cannot be empty. Please try again.");
                    continue;
                }
                let sentiment =
                    deriver::record_watched(&app.store, app.analytics.as_ref(), &removed, &review)?;
                println!(
                    "Movie '{}' has been moved to your watched list with a status of '{}'.",
                    removed.title, sentiment
                );
                return Ok(());
            }
            _ => println!("Invalid choice. Please enter 'delete' or 'move'."),
        }
    }
}

// ----------------------------------------------------------------------
// Title search
// ----------------------------------------------------------------------

async fn search_by_title(app: &App) -> AppResult<()> {
    let title = prompt("Enter the movie title you want to search for: ");
    if title.is_empty() {
        println!("Movie title cannot be empty.");
        return Ok(());
    }

    let matches = search::find_by_title(&app.catalog, &title);
    if matches.is_empty() {
        println!("No movies found with the title '{}'.", title);
        return Ok(());
    }
    let selected = select_movie(
        &title,
        &matches,
        "Enter the number of the movie you want details for: ",
    );

    let lookup = catalog::rating_lookup(&app.ratings);
    let Some(rating) = lookup.get(selected.id.as_str()) else {
        println!("No rating data found for '{}'.", selected.title);
        return Ok(());
    };
    let (Some(average_rating), Some(num_votes)) = (rating.average_rating, rating.num_votes) else {
        println!("Invalid rating or vote data for '{}'.", selected.title);
        return Ok(());
    };

    let Some(review) = app.reviews.fetch_review(&selected.id).await? else {
        println!("No reviews found for '{}'.", selected.title);
        return Ok(());
    };

    println!("\n--- Movie Information ---");
    println!("Title: {}", selected.title);
    println!("Year: {}", display_year(selected.start_year));
    println!("Genres: {}", selected.genres.join(","));
    println!("Rating: {} ({} votes)", average_rating, num_votes);
    println!("Review:\n{}\n", review);
    Ok(())
}
