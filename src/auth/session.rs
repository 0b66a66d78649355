use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "token";

/// Tokens expire after one day; the cookie itself is kept for three.
const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;
const COOKIE_MAX_AGE: time::Duration = time::Duration::days(3);

const REGISTERED_CLAIMS: [&str; 2] = ["iat", "exp"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
    /// Whatever else the client put in the login payload
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Signs and verifies HS256 session tokens and builds the cookies that carry them.
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    production: bool,
}

impl SessionIssuer {
    #[must_use]
    pub fn new(secret: &str, production: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            production,
        }
    }

    /// Sign the client-supplied payload. `email` is lifted into its own claim,
    /// `iat`/`exp` are always set here.
    pub fn issue(&self, mut payload: Map<String, Value>) -> Result<String, ApiError> {
        for key in REGISTERED_CLAIMS {
            payload.remove(key);
        }
        let email = match payload.remove("email") {
            Some(Value::String(email)) => Some(email),
            Some(Value::Null) | None => None,
            Some(_) => return Err(ApiError::BadRequest("email must be a string".into())),
        };

        let now = Utc::now();
        let claims = Claims {
            email,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
            extra: payload,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            warn!(error = %e, "Failed to sign session token");
            ApiError::Internal("Failed to issue token".into())
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!(error = %e, "Rejected session token");
                ApiError::Unauthorized("unauthorized access".into())
            })
    }

    #[must_use]
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .http_only(true)
            .secure(true)
            .same_site(SameSite::None)
            .max_age(COOKIE_MAX_AGE)
            .path("/")
            .build()
    }

    /// Expired, empty cookie that clears the session. Browsers only drop a
    /// cookie when the attributes match the ones it was set with.
    #[must_use]
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let same_site = if self.production {
            SameSite::None
        } else {
            SameSite::Strict
        };
        let mut cookie = Cookie::build((SESSION_COOKIE, ""))
            .http_only(true)
            .secure(self.production)
            .same_site(same_site)
            .path("/")
            .build();
        cookie.make_removal();
        cookie
    }
}
