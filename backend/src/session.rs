use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::rand::{SecureRandom, SystemRandom};
use rocket::http::{Cookie, SameSite, Status};
use rocket::request::{FromRequest, Outcome, Request};
use tracing::{debug, error};

use crate::routes::AppState;

pub const SESSION_COOKIE: &str = "quote_session";

/// Mints opaque session tokens from the system CSPRNG.
pub struct SessionMinter {
    rng: SystemRandom,
}

impl SessionMinter {
    pub fn new() -> Self {
        Self { rng: SystemRandom::new() }
    }

    pub fn mint(&self) -> Result<String, Status> {
        let mut bytes = [0u8; 32];
        self.rng.fill(&mut bytes).map_err(|_| Status::InternalServerError)?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }
}

impl Default for SessionMinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Anonymous session identity carried in a private cookie. A request
/// arriving without one gets a fresh token minted and added to the
/// response jar, so the very first contact already has a stable identity.
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionId {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let jar = req.cookies();

        if let Some(cookie) = jar.get_private(SESSION_COOKIE) {
            return Outcome::Success(SessionId(cookie.value().to_string()));
        }

        let Some(state) = req.rocket().state::<AppState>() else {
            error!("Session minter missing from managed state");
            return Outcome::Error((Status::InternalServerError, ()));
        };

        match state.minter.mint() {
            Ok(token) => {
                let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .path("/")
                    .build();
                jar.add_private(cookie);
                debug!("Minted new session token");
                Outcome::Success(SessionId(token))
            }
            Err(status) => Outcome::Error((status, ())),
        }
    }
}
