// handlers/session.rs - login, current identity and logout

use axum::{extract::State, Extension, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use serde::Serialize;
use serde_json::Value;

use crate::auth::verify_password;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

impl LoginRequest {
    /// Reads the login fields from any JSON body. Fields that are missing or
    /// not strings count as absent, so they end in 401 like a wrong password.
    pub fn from_json(body: &Value) -> Self {
        let text = |field: &str| body.get(field).and_then(Value::as_str).map(str::to_string);

        Self {
            username: text("username"),
            email: text("email"),
            password: text("password").unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/**
 * POST /users/login - Authenticate and receive the session cookie
 *
 * Expected Input (either `username` or `email` identifies the user):
 * ```json
 * { "username": "ana", "password": "..." }
 * ```
 *
 * Expected Output (Success):
 * ```json
 * {
 *   "success": true,
 *   "data": {
 *     "user": { "id": 1, "fullname": "Ana Souza", "username": "ana", "email": "ana@example.com", "is_admin": true },
 *     "token": "eyJhbGciOiJIUzI1NiI...",
 *     "expires_in": 86400
 *   }
 * }
 * ```
 *
 * Unknown user and wrong password both answer 401.
 */
pub async fn login(
    State(state): State<AppState>,
    cookies: CookieJar,
    Json(body): Json<Value>,
) -> Result<(CookieJar, ApiResponse<LoginResponse>), ApiError> {
    let request = LoginRequest::from_json(&body);
    let credentials = state
        .store
        .find_credentials(request.username.as_deref(), request.email.as_deref())
        .await?;

    let Some(credentials) = credentials else {
        tracing::warn!("Login failed: no user matches the given username or email");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(request.password, credentials.password).await? {
        tracing::warn!("Login failed: wrong password for '{}'", credentials.user.username);
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let keys = state.keys();
    let token = keys.issue(&credentials.user)?;
    let expires_in = keys.lifetime().num_seconds();

    let cookie = Cookie::build((state.gate.cookie_name().to_string(), token.clone()))
        .http_only(true)
        .secure(state.config.security.cookie_secure)
        .same_site(SameSite::None)
        .path("/")
        .max_age(cookie::time::Duration::seconds(expires_in));

    tracing::info!("User '{}' logged in", credentials.user.username);
    Ok((
        cookies.add(cookie),
        ApiResponse::success(LoginResponse {
            user: credentials.user,
            token,
            expires_in,
        }),
    ))
}

/// GET /users/me - identity decoded by the authorization gate
pub async fn me(Extension(user): Extension<AuthUser>) -> ApiResult<AuthUser> {
    Ok(ApiResponse::success(user))
}

/// POST /users/logout - expire the session cookie
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    cookies: CookieJar,
) -> (CookieJar, ApiResponse<()>) {
    let mut removal: Cookie<'static> =
        Cookie::build((state.gate.cookie_name().to_string(), "")).path("/").into();
    removal.make_removal();

    tracing::info!("User '{}' logged out", user.username);
    (cookies.add(removal), ApiResponse::no_content())
}
