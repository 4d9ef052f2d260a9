//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::{Registration, TokenResponse};
use crate::types::Created;

/// Letters, digits, underscore, dot and dash
pub(crate) static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("valid username pattern"));

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 32, message = "Username must be 3-32 characters"),
        regex(path = *USERNAME_REGEX, message = "Username may only contain letters, digits, '_', '.' and '-'")
    )]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        }
    }
}

/// Login with username or email
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email address
    #[validate(length(min = 1, message = "Identifier is required"))]
    #[schema(example = "alice")]
    pub identifier: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/student/register", post(register_student))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Register a student account
#[utoipa::path(
    post,
    path = "/api/auth/student/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Student registered", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn register_student(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state.services.auth().register_student(payload.into()).await?;
    Ok(Created(UserResponse::from(user)))
}

/// Exchange credentials for an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account banned or inactive")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let tokens = state
        .services
        .auth()
        .login(payload.identifier, payload.password)
        .await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = TokenResponse),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let tokens = state.services.auth().refresh(&payload.refresh_token).await?;
    Ok(Json(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: "alice@example.com".into(),
            password: "pw123456".into(),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn test_username_rules() {
        assert!(request("alice_01.dev-x").validate().is_ok());
        assert!(request("al").validate().is_err());
        assert!(request("alice smith").validate().is_err());
        assert!(request(&"a".repeat(33)).validate().is_err());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = request("alice");
        req.password = "short".into();
        assert!(req.validate().is_err());
    }
}
