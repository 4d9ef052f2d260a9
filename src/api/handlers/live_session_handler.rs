//! Live session handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
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
use crate::domain::{AttendanceStatus, HostType, LiveSession, SessionStatus};
use crate::errors::AppResult;
use crate::services::SessionDraft;
use crate::types::Created;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSessionRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[validate(url(message = "Invalid join link"))]
    pub join_link: String,
    pub host_type: HostType,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SessionStatusRequest {
    pub status: SessionStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
}

pub fn live_session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/:id/live-sessions",
            get(list_sessions).post(schedule_session),
        )
        .route("/live-sessions/:id/status", put(update_status))
        .route("/live-sessions/:id/attendance", put(mark_attendance))
}

/// Schedule a live session
#[utoipa::path(
    post,
    path = "/api/courses/{id}/live-sessions",
    tag = "Live Sessions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = ScheduleSessionRequest,
    responses(
        (status = 201, description = "Session scheduled", body = LiveSession),
        (status = 400, description = "Start is not before end"),
        (status = 403, description = "Not the assigned instructor")
    )
)]
pub async fn schedule_session(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ScheduleSessionRequest>,
) -> AppResult<Created<LiveSession>> {
    let draft = SessionDraft {
        title: payload.title,
        start_at: payload.start_at,
        end_at: payload.end_at,
        join_link: payload.join_link,
        host_type: payload.host_type,
    };
    let session = state
        .services
        .live_sessions()
        .schedule(current_user.actor(), id, draft)
        .await?;
    Ok(Created(session))
}

/// Sessions of a course, earliest first
#[utoipa::path(
    get,
    path = "/api/courses/{id}/live-sessions",
    tag = "Live Sessions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Sessions", body = [LiveSession]),
        (status = 403, description = "Not enrolled or not course staff")
    )
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<LiveSession>>> {
    Ok(Json(
        state
            .services
            .live_sessions()
            .list_for_course(current_user.actor(), id)
            .await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/live-sessions/{id}/status",
    tag = "Live Sessions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = SessionStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = LiveSession),
        (status = 404, description = "Session not found")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SessionStatusRequest>,
) -> AppResult<Json<LiveSession>> {
    let session = state
        .services
        .live_sessions()
        .update_status(current_user.actor(), id, payload.status)
        .await?;
    Ok(Json(session))
}

/// Record or overwrite a student's attendance
#[utoipa::path(
    put,
    path = "/api/live-sessions/{id}/attendance",
    tag = "Live Sessions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = AttendanceRequest,
    responses(
        (status = 200, description = "Attendance recorded", body = LiveSession),
        (status = 400, description = "Student not enrolled in the course"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttendanceRequest>,
) -> AppResult<Json<LiveSession>> {
    let session = state
        .services
        .live_sessions()
        .mark_attendance(current_user.actor(), id, payload.student_id, payload.status)
        .await?;
    Ok(Json(session))
}
