//! Enrollment and progress handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Enrollment, EnrollmentWithCourse};
use crate::errors::AppResult;
use crate::types::Created;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub lecture_id: Uuid,
    #[validate(range(min = 0.0, max = 100.0, message = "Progress must be between 0 and 100"))]
    #[schema(example = 100.0)]
    pub progress_pct: f64,
}

pub fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/courses/:id/enroll", post(enroll))
        .route("/courses/:id/progress", put(update_progress))
        .route("/enrollments", get(my_enrollments))
}

/// Enroll the caller in a published course
#[utoipa::path(
    post,
    path = "/api/courses/{id}/enroll",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 201, description = "Enrolled", body = Enrollment),
        (status = 403, description = "Students only"),
        (status = 404, description = "Course not found or unpublished"),
        (status = 409, description = "Already enrolled")
    )
)]
pub async fn enroll(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Created<Enrollment>> {
    let enrollment = state
        .services
        .enrollments()
        .enroll(current_user.actor(), id)
        .await?;
    Ok(Created(enrollment))
}

/// Report progress on a lecture
#[utoipa::path(
    put,
    path = "/api/courses/{id}/progress",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = ProgressRequest,
    responses(
        (status = 200, description = "Progress recorded", body = Enrollment),
        (status = 400, description = "Progress out of range"),
        (status = 404, description = "Not enrolled")
    )
)]
pub async fn update_progress(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ProgressRequest>,
) -> AppResult<Json<Enrollment>> {
    let enrollment = state
        .services
        .enrollments()
        .update_progress(
            current_user.actor(),
            id,
            payload.lecture_id,
            payload.progress_pct,
        )
        .await?;
    Ok(Json(enrollment))
}

/// The caller's enrollments with their courses
#[utoipa::path(
    get,
    path = "/api/enrollments",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Enrollments", body = [EnrollmentWithCourse]))
)]
pub async fn my_enrollments(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<EnrollmentWithCourse>>> {
    Ok(Json(
        state
            .services
            .enrollments()
            .my_enrollments(current_user.actor())
            .await?,
    ))
}
