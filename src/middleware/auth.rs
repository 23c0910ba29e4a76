use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{Claims, JwtKeys};
use crate::config::BypassRoute;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context extracted from the session token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub fullname: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            fullname: claims.fullname,
            username: claims.username,
            email: claims.email,
            is_admin: claims.is_admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Route is on the bypass list; no identity attached
    Bypass,
    Authenticated(AuthUser),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateRejection {
    #[error("Missing session credential")]
    MissingCredential,

    #[error("Invalid or expired session credential")]
    InvalidCredential,
}

impl From<GateRejection> for ApiError {
    fn from(rejection: GateRejection) -> Self {
        ApiError::forbidden(rejection.to_string())
    }
}

/// Decides whether a request may reach its handler.
///
/// The bypass list, cookie name and keys are fixed at construction; nothing
/// here changes while the server runs.
pub struct AuthGate {
    bypass: Vec<BypassRoute>,
    cookie_name: String,
    keys: JwtKeys,
}

impl AuthGate {
    pub fn new(bypass: Vec<BypassRoute>, cookie_name: String, keys: JwtKeys) -> Self {
        Self {
            bypass,
            cookie_name,
            keys,
        }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Exact (method, path) match against the bypass list
    pub fn is_bypassed(&self, method: &Method, path: &str) -> bool {
        self.bypass
            .iter()
            .any(|route| route.path == path && route.method == method.as_str())
    }

    /// Cookie first, then `Authorization: Bearer <token>`. Empty values count as absent.
    pub fn extract_credential(&self, cookies: &CookieJar, headers: &HeaderMap) -> Option<String> {
        if let Some(cookie) = cookies.get(&self.cookie_name) {
            if !cookie.value().is_empty() {
                return Some(cookie.value().to_string());
            }
        }

        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(' ').nth(1))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }

    pub fn authorize(
        &self,
        method: &Method,
        path: &str,
        cookies: &CookieJar,
        headers: &HeaderMap,
    ) -> Result<GateDecision, GateRejection> {
        if self.is_bypassed(method, path) {
            return Ok(GateDecision::Bypass);
        }

        let token = self
            .extract_credential(cookies, headers)
            .ok_or(GateRejection::MissingCredential)?;

        let claims = self.keys.verify(&token).map_err(|e| {
            tracing::debug!("Token verification failed: {}", e);
            GateRejection::InvalidCredential
        })?;

        Ok(GateDecision::Authenticated(AuthUser::from(claims)))
    }
}

/// Authorization gate applied to every route
pub async fn authorization_gate(
    State(state): State<AppState>,
    cookies: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let decision = state
        .gate
        .authorize(request.method(), request.uri().path(), &cookies, request.headers())
        .map_err(|rejection| {
            tracing::warn!(
                "Authorization rejected for {} {}: {}",
                request.method(),
                request.uri().path(),
                rejection
            );
            ApiError::from(rejection)
        })?;

    if let GateDecision::Authenticated(user) = decision {
        tracing::debug!("Authenticated user '{}' (id {})", user.username, user.id);
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}
