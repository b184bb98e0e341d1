use backend::{
    catchers::{bad_request, forbidden, internal_error, not_found, too_many_requests},
    config::AppConfig,
    coordinator::VoteCoordinator,
    cors::CORS,
    rate_limiter::RateLimiter,
    routes::{
        all_options, cast_vote, list_quotes, quiz, random, search_quotes, session_votes, AppState,
    },
    store::QuoteStore,
};
use rocket::{catchers, routes};
use shared::ledger::SessionLedger;
use time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

static SEED_QUOTES: &str = include_str!("../quotes.json.example");

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚀 Starting quote vote server");

    let rocket = rocket::build();
    let config = AppConfig::from_figment(rocket.figment());

    let store = QuoteStore::open(&config.file, SEED_QUOTES).await?;
    info!("📚 Quote store ready at {}", config.file.display());

    let ledger = SessionLedger::new(config.max_votes, Duration::hours(config.session_ttl_hours));
    let state = AppState::new(
        VoteCoordinator::new(store, ledger),
        RateLimiter::new(config.rate_limit_attempts, config.rate_limit_window_minutes),
    );

    rocket
        .attach(CORS)
        .manage(state)
        .mount(
            "/api",
            routes![
                list_quotes,
                quiz,
                random,
                search_quotes,
                session_votes,
                cast_vote,
                all_options
            ],
        )
        .register(
            "/",
            catchers![
                bad_request,
                forbidden,
                not_found,
                too_many_requests,
                internal_error
            ],
        )
        .launch()
        .await?;

    Ok(())
}
