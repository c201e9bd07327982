use std::sync::Arc;
use std::time::Duration;

use movie_match::cli::{self, App};
use movie_match::config::Config;
use movie_match::services::matcher::MatchOptions;
use movie_match::services::providers::{
    EmotionApiAnalytics, ImdbReviewSource, ReviewSource, TextAnalytics,
};
use movie_match::store::UserStore;
use movie_match::{catalog, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_match=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let app = build_app(&config)?;

    cli::run(&app).await?;
    Ok(())
}

fn build_app(config: &Config) -> AppResult<App> {
    let catalog = catalog::load_catalog(&config.catalog_path)?;
    let ratings = catalog::load_ratings(&config.ratings_path)?;

    let timeout = Duration::from_secs(config.http_timeout_secs);
    let reviews: Arc<dyn ReviewSource> = Arc::new(ImdbReviewSource::new(
        config.reviews_base_url.clone(),
        timeout,
    )?);
    let analytics: Arc<dyn TextAnalytics> = Arc::new(EmotionApiAnalytics::new(
        config.emotion_api_url.clone(),
        config.emotion_api_token.clone(),
        timeout,
    )?);

    Ok(App {
        catalog,
        ratings,
        store: UserStore::new(&config.data_dir),
        reviews,
        analytics,
        options: MatchOptions {
            max_results: config.max_results,
            cooldown: Duration::from_secs(config.politeness_delay_secs),
        },
    })
}
