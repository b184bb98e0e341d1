#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use rocket::http::{Method, Status};
    use rocket::local::asynchronous::Client;
    use time::Duration;

    use shared::ledger::SessionLedger;
    use shared::models::{Quote, SessionVotes, VoteResponse};
    use shared::error::ErrorResponse;
    use crate::coordinator::VoteCoordinator;
    use crate::error::ApiError;
    use crate::rate_limiter::RateLimiter;
    use crate::routes::{self, AppState};
    use crate::store::{QuoteStore, StoreError};

    static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

    fn temp_path(tag: &str) -> PathBuf {
        let n = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "quote_vote_test_{}_{}_{}.json",
            tag,
            std::process::id(),
            n
        ));
        // stale leftovers from a previous run would skew the seed tests
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir_all(&path);
        path
    }

    const SEED_AB: &str = r#"[
        { "id": 1, "text": "A", "votes": 0 },
        { "id": 2, "text": "B", "votes": 0 }
    ]"#;

    async fn store(tag: &str, seed: &str) -> QuoteStore {
        QuoteStore::open(temp_path(tag), seed).await.unwrap()
    }

    fn coordinator(store: QuoteStore, cap: u32) -> VoteCoordinator {
        VoteCoordinator::new(store, SessionLedger::new(cap, Duration::hours(24)))
    }

    async fn client(seed: &str, cap: u32, rate_attempts: u32) -> Client {
        let store = store("http", seed).await;
        let state = AppState::new(coordinator(store, cap), RateLimiter::new(rate_attempts, 15));
        let rocket = rocket::build().manage(state).mount(
            "/api",
            rocket::routes![
                routes::list_quotes,
                routes::quiz,
                routes::random,
                routes::search_quotes,
                routes::session_votes,
                routes::cast_vote,
                routes::all_options
            ],
        );
        Client::tracked(rocket).await.unwrap()
    }

    // ---- store ----

    #[rocket::async_test]
    async fn test_store_seeds_missing_file() {
        let path = temp_path("seed");
        assert!(!path.exists());

        let store = QuoteStore::open(&path, SEED_AB).await.unwrap();
        assert!(path.exists());

        let quotes = store.list_all().await;
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0], Quote { id: 1, text: "A".into(), votes: 0 });
    }

    #[rocket::async_test]
    async fn test_store_keeps_existing_file() {
        let path = temp_path("existing");
        std::fs::write(&path, r#"[{ "id": 9, "text": "kept", "votes": 7 }]"#).unwrap();

        let store = QuoteStore::open(&path, SEED_AB).await.unwrap();
        let quotes = store.list_all().await;
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].votes, 7);
    }

    #[rocket::async_test]
    async fn test_store_increment_persists_across_reopen() {
        let path = temp_path("persist");

        let store = QuoteStore::open(&path, SEED_AB).await.unwrap();
        assert_eq!(store.increment_votes(1).await.unwrap(), 1);
        assert_eq!(store.increment_votes(1).await.unwrap(), 2);
        drop(store);

        let reopened = QuoteStore::open(&path, SEED_AB).await.unwrap();
        assert_eq!(reopened.find_by_id(1).await.unwrap().votes, 2);
        assert_eq!(reopened.find_by_id(2).await.unwrap().votes, 0);
    }

    #[rocket::async_test]
    async fn test_store_unknown_id() {
        let store = store("missing", SEED_AB).await;
        assert!(matches!(store.find_by_id(99).await, Err(StoreError::NotFound)));
        assert!(matches!(store.increment_votes(99).await, Err(StoreError::NotFound)));
    }

    #[rocket::async_test]
    async fn test_store_failed_write_rolls_back() {
        let dir = temp_path("rollback");
        let path = dir.join("quotes.json");
        let store = QuoteStore::open(&path, SEED_AB).await.unwrap();

        // removing the directory makes the next persist fail
        tokio::fs::remove_dir_all(&dir).await.unwrap();

        assert!(matches!(store.increment_votes(1).await, Err(StoreError::Io(_))));
        assert_eq!(store.find_by_id(1).await.unwrap().votes, 0);
    }

    // ---- coordinator ----

    #[rocket::async_test]
    async fn test_vote_success_and_duplicate() {
        let c = coordinator(store("dup", SEED_AB).await, 5);

        let first = c.vote("s1", 1).await.unwrap();
        assert_eq!(
            first,
            VoteResponse { success: true, votes: 1, votes_left: 4, total_votes: 5 }
        );

        assert!(matches!(c.vote("s1", 1).await, Err(ApiError::AlreadyVoted)));

        // the failed attempt left both stores untouched
        let state = c.session_state("s1");
        assert_eq!(state.votes_left, 4);
        assert_eq!(c.quotes().await[0].votes, 1);
    }

    #[rocket::async_test]
    async fn test_vote_limit_reached() {
        let seed = r#"[
            { "id": 1, "text": "A", "votes": 0 },
            { "id": 2, "text": "B", "votes": 0 },
            { "id": 3, "text": "C", "votes": 0 }
        ]"#;
        let c = coordinator(store("limit", seed).await, 2);

        c.vote("s1", 1).await.unwrap();
        c.vote("s1", 2).await.unwrap();
        assert!(matches!(c.vote("s1", 3).await, Err(ApiError::LimitReached)));

        let state = c.session_state("s1");
        assert_eq!(state.votes_left, 0);
        assert_eq!(state.voted_quotes, vec![1, 2]);
    }

    #[rocket::async_test]
    async fn test_vote_unknown_quote() {
        let c = coordinator(store("unknown", SEED_AB).await, 5);
        assert!(matches!(c.vote("s1", 42).await, Err(ApiError::QuoteNotFound)));

        // nothing was debited
        assert_eq!(c.session_state("s1").votes_left, 5);
    }

    #[rocket::async_test]
    async fn test_failed_store_write_recredits_ledger() {
        let dir = temp_path("compensate");
        let path = dir.join("quotes.json");
        let c = coordinator(QuoteStore::open(&path, SEED_AB).await.unwrap(), 5);

        tokio::fs::remove_dir_all(&dir).await.unwrap();

        assert!(matches!(c.vote("s1", 1).await, Err(ApiError::Internal(_))));

        // the debit was compensated and the quote is votable again
        let state = c.session_state("s1");
        assert_eq!(state.votes_left, 5);
        assert!(state.voted_quotes.is_empty());
    }

    #[rocket::async_test]
    async fn test_concurrent_votes_do_not_lose_updates() {
        let c = Arc::new(coordinator(store("concurrent", SEED_AB).await, 5));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let c = Arc::clone(&c);
                rocket::tokio::spawn(async move { c.vote(&format!("session-{i}"), 1).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(c.quotes().await[0].votes, 8);
    }

    // ---- rate limiter ----

    #[test]
    fn test_rate_limiter_window() {
        let limiter = RateLimiter::new(2, 15);
        assert_eq!(limiter.remaining("k"), 2);

        assert!(limiter.check("k").is_ok());
        assert!(limiter.check("k").is_ok());
        let minutes = limiter.check("k").unwrap_err();
        assert!(minutes >= 1);

        // other keys are unaffected
        assert!(limiter.check("other").is_ok());
        assert_eq!(limiter.remaining("k"), 0);
    }

    // ---- HTTP surface ----

    #[rocket::async_test]
    async fn test_http_vote_flow() {
        let client = client(SEED_AB, 5, 100).await;

        let resp = client.post("/api/quotes/1/vote").dispatch().await;
        assert_eq!(resp.status(), Status::Ok);
        let body: VoteResponse = resp.into_json().await.unwrap();
        assert_eq!(
            body,
            VoteResponse { success: true, votes: 1, votes_left: 4, total_votes: 5 }
        );

        // same session, same quote: rejected, budget unchanged
        let resp = client.post("/api/quotes/1/vote").dispatch().await;
        assert_eq!(resp.status(), Status::Forbidden);
        let err: ErrorResponse = resp.into_json().await.unwrap();
        assert_eq!(err.error, "You have already voted for this quote");

        let resp = client.get("/api/session/votes").dispatch().await;
        let session: SessionVotes = resp.into_json().await.unwrap();
        assert_eq!(
            session,
            SessionVotes { votes_left: 4, total_votes: 5, voted_quotes: vec![1] }
        );

        // ranked list puts the voted quote first
        let resp = client.get("/api/quotes").dispatch().await;
        let quotes: Vec<Quote> = resp.into_json().await.unwrap();
        let order: Vec<u64> = quotes.iter().map(|q| q.id).collect();
        assert_eq!(order, vec![1, 2]);
        assert_eq!(quotes[0].votes, 1);
    }

    #[rocket::async_test]
    async fn test_http_vote_unknown_quote() {
        let client = client(SEED_AB, 5, 100).await;

        let resp = client.post("/api/quotes/999/vote").dispatch().await;
        assert_eq!(resp.status(), Status::NotFound);
        let err: ErrorResponse = resp.into_json().await.unwrap();
        assert_eq!(err.error, "Quote not found");
    }

    #[rocket::async_test]
    async fn test_http_vote_limit() {
        let client = client(SEED_AB, 1, 100).await;

        assert_eq!(client.post("/api/quotes/1/vote").dispatch().await.status(), Status::Ok);

        let resp = client.post("/api/quotes/2/vote").dispatch().await;
        assert_eq!(resp.status(), Status::Forbidden);
        let err: ErrorResponse = resp.into_json().await.unwrap();
        assert_eq!(err.error, "No votes remaining for this session");
    }

    #[rocket::async_test]
    async fn test_http_rate_limit() {
        let client = client(SEED_AB, 25, 2).await;

        assert_eq!(client.post("/api/quotes/1/vote").dispatch().await.status(), Status::Ok);
        assert_eq!(client.post("/api/quotes/2/vote").dispatch().await.status(), Status::Ok);

        // third attempt in the window is rejected before any state check
        let resp = client.post("/api/quotes/2/vote").dispatch().await;
        assert_eq!(resp.status(), Status::TooManyRequests);

        let session: SessionVotes =
            client.get("/api/session/votes").dispatch().await.into_json().await.unwrap();
        assert_eq!(session.votes_left, 23);
    }

    #[rocket::async_test]
    async fn test_http_search() {
        let seed = r#"[
            { "id": 1, "text": "Simplicity is key", "votes": 0 },
            { "id": 2, "text": "Less is more", "votes": 0 }
        ]"#;
        let client = client(seed, 5, 100).await;

        let hits: Vec<Quote> = client
            .get("/api/quotes/search?q=SIMPLI")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        // empty and missing queries both return nothing
        let empty: Vec<Quote> = client
            .get("/api/quotes/search?q=")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert!(empty.is_empty());

        let missing: Vec<Quote> = client
            .get("/api/quotes/search")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert!(missing.is_empty());
    }

    #[rocket::async_test]
    async fn test_http_quiz_and_random() {
        let client = client(SEED_AB, 5, 100).await;

        let pair: Vec<Quote> = client
            .get("/api/quotes/quiz")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(pair.len(), 2);
        assert_ne!(pair[0].id, pair[1].id);

        let one: Quote = client
            .get("/api/quotes/random")
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert!(one.id == 1 || one.id == 2);
    }

    #[rocket::async_test]
    async fn test_http_preflight() {
        let client = client(SEED_AB, 5, 100).await;
        let resp = client.req(Method::Options, "/api/quotes").dispatch().await;
        assert_eq!(resp.status(), Status::Ok);
    }
}
