//! Course catalog and authoring handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Course, CourseFilter, CourseLevel, SectionInput};
use crate::errors::AppResult;
use crate::services::{CourseDraft, CourseUpdate};
use crate::types::{Created, NoContent, Paginated, PaginationParams};

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseQuery {
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
    /// Case-insensitive title search
    pub search: Option<String>,
}

impl From<CourseQuery> for CourseFilter {
    fn from(q: CourseQuery) -> Self {
        let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            category: non_empty(q.category).map(|c| c.to_lowercase()),
            level: q.level,
            search: non_empty(q.search),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    #[schema(example = "Intro to Rust")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 64, message = "Category is required"))]
    #[schema(example = "programming")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub level: CourseLevel,
    #[serde(default = "default_language")]
    pub language: String,
    #[validate(url)]
    pub cover_url: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Estimated hours cannot be negative"))]
    pub estimated_hours: f64,
    #[serde(default)]
    pub sections: Vec<SectionInput>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub level: Option<CourseLevel>,
    pub language: Option<String>,
    #[validate(url)]
    pub cover_url: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub estimated_hours: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StructureRequest {
    pub sections: Vec<SectionInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub is_published: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignInstructorRequest {
    pub instructor_id: Uuid,
}

/// Public catalog routes
pub fn public_course_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/:id", get(get_course))
        .route("/courses/slug/:slug", get(get_course_by_slug))
}

/// Authoring routes (authenticated)
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", post(create_course))
        .route("/courses/:id", put(update_course).delete(delete_course))
        .route("/courses/:id/structure", put(update_structure))
        .route("/courses/:id/publish", put(set_published))
        .route("/courses/:id/assign-instructor", put(assign_instructor))
        .route("/instructor/courses", get(teaching_courses))
}

/// List published courses
#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "Courses",
    params(PaginationParams, CourseQuery),
    responses((status = 200, description = "One page of published courses", body = [Course]))
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(query): Query<CourseQuery>,
) -> AppResult<Json<Paginated<Course>>> {
    let (courses, total) = state
        .services
        .courses()
        .list_published(query.into(), params.clone())
        .await?;
    Ok(Json(Paginated::new(courses, &params, total)))
}

/// Get a published course by id
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "Courses",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = Course),
        (status = 404, description = "Course not found or unpublished")
    )
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Course>> {
    Ok(Json(state.services.courses().get_published(id).await?))
}

/// Get a published course by slug
#[utoipa::path(
    get,
    path = "/api/courses/slug/{slug}",
    tag = "Courses",
    params(("slug" = String, Path, description = "Course slug")),
    responses(
        (status = 200, description = "Course", body = Course),
        (status = 404, description = "Course not found or unpublished")
    )
)]
pub async fn get_course_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Course>> {
    Ok(Json(
        state.services.courses().get_published_by_slug(&slug).await?,
    ))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/api/courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 403, description = "Instructors and admins only")
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateCourseRequest>,
) -> AppResult<Created<Course>> {
    let draft = CourseDraft {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        tags: payload.tags,
        level: payload.level,
        language: payload.language,
        cover_url: payload.cover_url,
        price: payload.price,
        estimated_hours: payload.estimated_hours,
        sections: payload.sections,
    };
    let course = state
        .services
        .courses()
        .create(current_user.actor(), draft)
        .await?;
    Ok(Created(course))
}

/// Update course metadata
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 403, description = "Not the assigned instructor"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn update_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCourseRequest>,
) -> AppResult<Json<Course>> {
    let update = CourseUpdate {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        tags: payload.tags,
        level: payload.level,
        language: payload.language,
        cover_url: payload.cover_url,
        price: payload.price,
        estimated_hours: payload.estimated_hours,
    };
    let course = state
        .services
        .courses()
        .update(current_user.actor(), id, update)
        .await?;
    Ok(Json(course))
}

/// Replace the course's sections and lectures
#[utoipa::path(
    put,
    path = "/api/courses/{id}/structure",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = StructureRequest,
    responses(
        (status = 200, description = "Structure replaced", body = Course),
        (status = 403, description = "Not the assigned instructor")
    )
)]
pub async fn update_structure(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StructureRequest>,
) -> AppResult<Json<Course>> {
    let course = state
        .services
        .courses()
        .update_structure(current_user.actor(), id, payload.sections)
        .await?;
    Ok(Json(course))
}

/// Publish or unpublish a course
#[utoipa::path(
    put,
    path = "/api/courses/{id}/publish",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = PublishRequest,
    responses(
        (status = 200, description = "Publication changed", body = Course),
        (status = 403, description = "Not the assigned instructor")
    )
)]
pub async fn set_published(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PublishRequest>,
) -> AppResult<Json<Course>> {
    let course = state
        .services
        .courses()
        .set_published(current_user.actor(), id, payload.is_published)
        .await?;
    Ok(Json(course))
}

/// Assign an instructor to a course
#[utoipa::path(
    put,
    path = "/api/courses/{id}/assign-instructor",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = AssignInstructorRequest,
    responses(
        (status = 200, description = "Instructor assigned", body = Course),
        (status = 400, description = "Assignee is not an instructor"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn assign_instructor(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignInstructorRequest>,
) -> AppResult<Json<Course>> {
    let course = state
        .services
        .courses()
        .assign_instructor(current_user.actor(), id, payload.instructor_id)
        .await?;
    Ok(Json(course))
}

/// Delete a course and everything under it
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .services
        .courses()
        .delete(current_user.actor(), id)
        .await?;
    Ok(NoContent)
}

/// Courses the caller teaches
#[utoipa::path(
    get,
    path = "/api/instructor/courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assigned courses (all courses for admins)", body = [Course]),
        (status = 403, description = "Instructors and admins only")
    )
)]
pub async fn teaching_courses(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Course>>> {
    Ok(Json(
        state
            .services
            .courses()
            .teaching_courses(current_user.actor())
            .await?,
    ))
}
