//! Current-user handlers.

use axum::{extract::State, response::Json, routing::{get, put}, Extension, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{LearningPace, ProfileUpdate, StudentProfile, UserResponse};
use crate::errors::AppResult;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Student onboarding answers
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    #[validate(range(min = 1, max = 10))]
    pub year_of_study: Option<i32>,
    pub degree: Option<String>,
    pub interest_type: Option<String>,
    /// Study domains such as `webdev`, `ai`, `design`
    #[serde(default)]
    #[schema(example = json!(["webdev", "ai"]))]
    pub domains: Vec<String>,
    pub career_goal: Option<String>,
    #[serde(default)]
    pub learning_pace: LearningPace,
}

impl From<OnboardingRequest> for StudentProfile {
    fn from(req: OnboardingRequest) -> Self {
        Self {
            year_of_study: req.year_of_study,
            degree: req.degree,
            interest_type: req.interest_type,
            domains: StudentProfile::normalize_domains(req.domains),
            career_goal: req.career_goal,
            learning_pace: req.learning_pace,
            onboarded: true,
        }
    }
}

/// Routes under `/users/me` (authenticated)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_current_user).put(update_current_user))
        .route("/users/me/onboarding", put(complete_onboarding))
}

/// Get the authenticated user's account
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().get_user(current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update the authenticated user's profile
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let update = ProfileUpdate {
        first_name: payload.first_name,
        last_name: payload.last_name,
        avatar_url: payload.avatar_url,
        phone: payload.phone,
    };
    let user = state
        .services
        .users()
        .update_profile(current_user.id, update)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Save onboarding answers (students only)
#[utoipa::path(
    put,
    path = "/api/users/me/onboarding",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = OnboardingRequest,
    responses(
        (status = 200, description = "Onboarding saved", body = UserResponse),
        (status = 403, description = "Caller is not a student")
    )
)]
pub async fn complete_onboarding(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<OnboardingRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users()
        .complete_onboarding(current_user.actor(), payload.into())
        .await?;
    Ok(Json(UserResponse::from(user)))
}
