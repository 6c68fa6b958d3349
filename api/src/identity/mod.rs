use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    App,
    error::{ApiRequestError, AppError},
};

pub const COOKIE_NAME: &str = "auth_token";

#[derive(thiserror::Error, Debug)]
pub enum AuthenticationError {
    #[error(
        "Authentication required, but no cookie `{COOKIE_NAME}` or bearer token found in headers."
    )]
    NoToken,

    #[error(
        "Unauthorized, please check if you're logged in. This could be due to \
         an expired session or token has became invalid."
    )]
    Unauthorized,
}

impl ApiRequestError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn code(&self) -> &'static str {
        match self {
            AuthenticationError::NoToken => "NO_TOKEN",
            AuthenticationError::Unauthorized => "UNAUTHORIZED",
        }
    }
}

/// The id of the user making the request. Sessions are issued elsewhere, this
/// only resolves the token the client presents.
pub struct AuthUser(pub String);

impl FromRequestParts<App> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &App) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AuthenticationError::NoToken)?;

        match state.repos.sessions.find_user_by_token(&token).await? {
            Some(user_id) => Ok(AuthUser(user_id)),
            None => {
                tracing::warn!("Rejected request with an unknown or expired session token");
                Err(AuthenticationError::Unauthorized.into())
            }
        }
    }
}

/// The session cookie wins over an `Authorization: Bearer` header.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(COOKIE_NAME) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
