//! Repository layer - Data access abstraction
//!
//! Each aggregate has a trait (mockable in tests) and a SeaORM-backed store.

mod assignment_repository;
mod course_repository;
pub(crate) mod entities;
mod enrollment_repository;
mod live_session_repository;
mod product_repository;
mod user_repository;

use sea_orm::{DbErr, SqlErr};

use crate::errors::AppError;

pub use assignment_repository::{AssignmentRepository, AssignmentStore};
pub use course_repository::{CourseRepository, CourseStore};
pub use enrollment_repository::{EnrollmentRepository, EnrollmentStore};
pub use live_session_repository::{LiveSessionRepository, LiveSessionStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use assignment_repository::MockAssignmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use course_repository::MockCourseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use enrollment_repository::MockEnrollmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use live_session_repository::MockLiveSessionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// A unique index rejected the write: report it as a conflict on `entity`.
pub(crate) fn conflict_or_db(err: DbErr, entity: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(entity, %detail, "Unique constraint violation");
            AppError::conflict(entity)
        }
        _ => AppError::from(err),
    }
}

/// Escape LIKE wildcards in user input.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Rust"), "%rust%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }
}
