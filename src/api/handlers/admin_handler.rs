//! Admin account management handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::auth_handler::RegisterRequest;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{UserResponse, UserRole, UserStatus};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, Paginated, PaginationParams};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoleFilter {
    /// Only list accounts with this role
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

/// Routes under `/admin` for accounts (authenticated; admin enforced by services)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id", delete(delete_user))
        .route("/admin/users/:id/status", put(update_status))
        .route("/admin/instructors", post(create_instructor))
}

/// List accounts
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PaginationParams, RoleFilter),
    responses(
        (status = 200, description = "One page of users", body = [UserResponse]),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<RoleFilter>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let (users, total) = state
        .services
        .users()
        .list_users(current_user.actor(), filter.role, params.clone())
        .await?;
    Ok(Json(Paginated::new(users, &params, total).map(UserResponse::from)))
}

/// Change an account's status
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = UserResponse),
        (status = 400, description = "Cannot change own status"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users()
        .set_status(current_user.actor(), id, payload.status)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Permanently delete an account
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete own account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .services
        .users()
        .delete_user(current_user.actor(), id)
        .await?;
    Ok(NoContent)
}

/// Create an instructor account
#[utoipa::path(
    post,
    path = "/api/admin/instructors",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Instructor created", body = UserResponse),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn create_instructor(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .services
        .auth()
        .create_instructor(current_user.actor(), payload.into())
        .await?;
    Ok(Created(UserResponse::from(user)))
}
