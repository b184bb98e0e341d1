use rand::thread_rng;
use rocket::{get, post, http::Status, serde::json::Json, State};
use tracing::instrument;

use shared::models::{Quote, SessionVotes, VoteResponse};
use shared::views;
use crate::coordinator::VoteCoordinator;
use crate::error::ApiError;
use crate::rate_limiter::RateLimiter;
use crate::session::{SessionId, SessionMinter};

pub struct AppState {
    pub coordinator: VoteCoordinator,
    pub vote_limiter: RateLimiter,
    pub minter: SessionMinter,
}

impl AppState {
    pub fn new(coordinator: VoteCoordinator, vote_limiter: RateLimiter) -> Self {
        Self { coordinator, vote_limiter, minter: SessionMinter::new() }
    }
}

#[get("/quotes")]
pub async fn list_quotes(state: &State<AppState>) -> Json<Vec<Quote>> {
    Json(views::ranked(&state.coordinator.quotes().await))
}

#[get("/quotes/quiz")]
pub async fn quiz(state: &State<AppState>) -> Json<Vec<Quote>> {
    let quotes = state.coordinator.quotes().await;
    Json(views::quiz_pair(&quotes, &mut thread_rng()))
}

#[get("/quotes/random")]
pub async fn random(state: &State<AppState>) -> Result<Json<Quote>, ApiError> {
    let quotes = state.coordinator.quotes().await;
    views::random_quote(&quotes, &mut thread_rng())
        .map(Json)
        .ok_or(ApiError::QuoteNotFound)
}

#[get("/quotes/search?<q>")]
pub async fn search_quotes(state: &State<AppState>, q: Option<&str>) -> Json<Vec<Quote>> {
    let quotes = state.coordinator.quotes().await;
    Json(views::search(&quotes, q.unwrap_or_default()))
}

#[get("/session/votes")]
pub async fn session_votes(state: &State<AppState>, session: SessionId) -> Json<SessionVotes> {
    Json(state.coordinator.session_state(session.as_str()))
}

#[instrument(skip(state, session), fields(quote_id = id))]
#[post("/quotes/<id>/vote")]
pub async fn cast_vote(
    state: &State<AppState>,
    id: u64,
    session: SessionId,
) -> Result<Json<VoteResponse>, ApiError> {
    // admission control runs before any ledger or store state is touched
    let rate_key = format!("vote:{}", session.as_str());
    if let Err(minutes) = state.vote_limiter.check(&rate_key) {
        return Err(ApiError::RateLimited(minutes));
    }

    state.coordinator.vote(session.as_str(), id).await.map(Json)
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}
