//! Recommendation and dashboard handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Recommendations;
use crate::errors::AppResult;
use crate::services::{Dashboard, StudentDashboard};

pub fn learner_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", get(recommendations))
        .route("/dashboard", get(dashboard))
}

/// Courses and products ranked for the calling student
#[utoipa::path(
    get,
    path = "/api/recommendations",
    tag = "Learning",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Recommendations", body = Recommendations),
        (status = 403, description = "Students only")
    )
)]
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Recommendations>> {
    Ok(Json(
        state
            .services
            .recommendations()
            .recommend(current_user.actor())
            .await?,
    ))
}

/// Role-specific summary
///
/// The body carries a `role` field (`student`, `instructor` or `admin`)
/// selecting which of the three shapes was returned.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Learning",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student dashboard", body = StudentDashboard),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Dashboard>> {
    Ok(Json(
        state
            .services
            .dashboard()
            .dashboard(current_user.actor())
            .await?,
    ))
}
