//! Assignment, submission and grading handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Assignment, StudentAssignmentView, Submission};
use crate::errors::AppResult;
use crate::services::{AssignmentDraft, AssignmentList};
use crate::types::Created;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_at: DateTime<Utc>,
    #[validate(range(exclusive_min = 0.0, message = "Max score must be positive"))]
    #[schema(example = 100.0)]
    pub max_score: f64,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub text_answer: Option<String>,
    /// URLs of uploaded files
    #[serde(default)]
    pub file_urls: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GradeRequest {
    #[validate(range(min = 0.0, message = "Score cannot be negative"))]
    pub score: f64,
    #[validate(length(max = 5000))]
    pub feedback: Option<String>,
}

pub fn assignment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/:id/assignments",
            get(list_assignments).post(create_assignment),
        )
        .route("/assignments/:id/submit", post(submit))
        .route("/assignments/:id/submissions", get(list_submissions))
        .route("/assignments/:id/submissions/:sid/grade", put(grade))
}

/// Create an assignment on a course
#[utoipa::path(
    post,
    path = "/api/courses/{id}/assignments",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 403, description = "Not the assigned instructor")
    )
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateAssignmentRequest>,
) -> AppResult<Created<Assignment>> {
    let draft = AssignmentDraft {
        title: payload.title,
        description: payload.description,
        due_at: payload.due_at,
        max_score: payload.max_score,
        is_published: payload.is_published,
    };
    let assignment = state
        .services
        .assignments()
        .create(current_user.actor(), id, draft)
        .await?;
    Ok(Created(assignment))
}

/// List a course's assignments
///
/// Students get published assignments with their own submission status;
/// staff get every assignment.
#[utoipa::path(
    get,
    path = "/api/courses/{id}/assignments",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Student view", body = [StudentAssignmentView]),
        (status = 403, description = "Not enrolled or not course staff")
    )
)]
pub async fn list_assignments(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AssignmentList>> {
    Ok(Json(
        state
            .services
            .assignments()
            .list_for_course(current_user.actor(), id)
            .await?,
    ))
}

/// Submit (or resubmit) work for an assignment
#[utoipa::path(
    post,
    path = "/api/assignments/{id}/submit",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Submission stored", body = Submission),
        (status = 400, description = "Empty submission"),
        (status = 403, description = "Not enrolled")
    )
)]
pub async fn submit(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitRequest>,
) -> AppResult<Json<Submission>> {
    let submission = state
        .services
        .assignments()
        .submit(
            current_user.actor(),
            id,
            payload.text_answer,
            payload.file_urls,
        )
        .await?;
    Ok(Json(submission))
}

/// List submissions for grading
#[utoipa::path(
    get,
    path = "/api/assignments/{id}/submissions",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Submissions", body = [Submission]),
        (status = 403, description = "Not course staff")
    )
)]
pub async fn list_submissions(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Submission>>> {
    Ok(Json(
        state
            .services
            .assignments()
            .list_submissions(current_user.actor(), id)
            .await?,
    ))
}

/// Grade a submission
#[utoipa::path(
    put,
    path = "/api/assignments/{id}/submissions/{sid}/grade",
    tag = "Assignments",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Assignment ID"),
        ("sid" = Uuid, Path, description = "Submission ID")
    ),
    request_body = GradeRequest,
    responses(
        (status = 200, description = "Graded", body = Submission),
        (status = 400, description = "Score out of range"),
        (status = 403, description = "Not course staff"),
        (status = 404, description = "Submission not found")
    )
)]
pub async fn grade(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path((id, sid)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<GradeRequest>,
) -> AppResult<Json<Submission>> {
    let submission = state
        .services
        .assignments()
        .grade(current_user.actor(), id, sid, payload.score, payload.feedback)
        .await?;
    Ok(Json(submission))
}
