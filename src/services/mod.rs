//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and repositories to fulfil each use
//! case. They depend on the [`UnitOfWork`](crate::infra::UnitOfWork) trait,
//! and handlers depend on the service traits.

mod assignment_service;
mod auth_service;
pub mod container;
mod course_service;
mod dashboard_service;
mod enrollment_service;
mod live_session_service;
mod product_service;
mod recommendation_service;
mod user_service;

#[cfg(test)]
pub(crate) mod testing;

// Service Container
pub use container::{parallel, ServiceContainer, Services};

// Service traits and implementations
pub use assignment_service::{AssignmentDraft, AssignmentList, AssignmentManager, AssignmentService};
pub use auth_service::{
    AuthService, Authenticator, Claims, Registration, TokenKind, TokenResponse,
};
pub use course_service::{CourseDraft, CourseManager, CourseService, CourseUpdate};
pub use dashboard_service::{
    AdminDashboard, Dashboard, DashboardManager, DashboardService, InstructorDashboard,
    StudentDashboard,
};
pub use enrollment_service::{EnrollmentManager, EnrollmentService};
pub use live_session_service::{LiveSessionManager, LiveSessionService, SessionDraft};
pub use product_service::{ProductDraft, ProductManager, ProductService, ProductUpdate};
pub use recommendation_service::{RecommendationEngine, RecommendationService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use {
    assignment_service::MockAssignmentService, auth_service::MockAuthService,
    container::MockServiceContainer, course_service::MockCourseService,
    dashboard_service::MockDashboardService, enrollment_service::MockEnrollmentService,
    live_session_service::MockLiveSessionService, product_service::MockProductService,
    recommendation_service::MockRecommendationService, user_service::MockUserService,
};
