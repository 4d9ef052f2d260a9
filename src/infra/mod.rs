//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories (PostgreSQL)
//! - Rate-limit counters (Redis)
//! - Unit of Work as the single repository hub

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, HealthCheck, RateLimiter};
pub use db::{Database, Migrator};
pub use repositories::{
    AssignmentRepository, AssignmentStore, CourseRepository, CourseStore, EnrollmentRepository,
    EnrollmentStore, LiveSessionRepository, LiveSessionStore, ProductRepository, ProductStore,
    UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAssignmentRepository, MockCourseRepository, MockEnrollmentRepository,
    MockLiveSessionRepository, MockProductRepository, MockUserRepository,
};
