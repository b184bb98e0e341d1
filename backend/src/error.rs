use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use thiserror::Error;

use shared::error::ErrorResponse;
use shared::ledger::LedgerError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Quote not found")]
    QuoteNotFound,
    #[error("You have already voted for this quote")]
    AlreadyVoted,
    #[error("No votes remaining for this session")]
    LimitReached,
    #[error("Rate limit exceeded. Please try again in {0} minutes.")]
    RateLimited(i64),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AlreadyVoted(_) => ApiError::AlreadyVoted,
            LedgerError::LimitReached => ApiError::LimitReached,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::QuoteNotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = match self {
            ApiError::QuoteNotFound => Status::NotFound,
            ApiError::AlreadyVoted => Status::Forbidden,
            ApiError::LimitReached => Status::Forbidden,
            ApiError::RateLimited(_) => Status::TooManyRequests,
            ApiError::Internal(_) => Status::InternalServerError,
        };

        // internal detail stays in the logs, not in the response body
        let message = match &self {
            ApiError::Internal(_) => "An internal server error occurred.".to_string(),
            other => other.to_string(),
        };

        let body = serde_json::to_string(&ErrorResponse::new(message))
            .map_err(|_| Status::InternalServerError)?;

        rocket::Response::build_from(body.respond_to(req)?)
            .header(ContentType::JSON)
            .status(status)
            .ok()
    }
}
