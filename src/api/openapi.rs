//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, assignment_handler, auth_handler, course_handler, enrollment_handler,
    learner_handler, live_session_handler, product_handler, user_handler,
};
use crate::domain::{
    Assignment, Attendance, AttendanceStatus, CompletedLecture, Course, CourseLevel, Enrollment,
    EnrollmentWithCourse, HostType, LearningPace, Lecture, LectureInput, LiveSession, Product,
    Profile, Rating, Recommendations, ScoredCourse, Section, SectionInput, StudentAssignmentView,
    StudentProfile, Submission, SubmissionStatus, UserResponse, UserRole, UserStatus,
};
use crate::services::{AdminDashboard, InstructorDashboard, StudentDashboard, TokenResponse};
use crate::types::{MessageResponse, PaginationMeta};

/// OpenAPI documentation for the LMS API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LMS API",
        version = "0.1.0",
        description = "E-learning backend: course catalog and authoring, enrollments with progress and XP, assignments, live sessions and a small storefront",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::register_student,
        auth_handler::login,
        auth_handler::refresh,
        // Current user
        user_handler::get_current_user,
        user_handler::update_current_user,
        user_handler::complete_onboarding,
        // Courses
        course_handler::list_courses,
        course_handler::get_course,
        course_handler::get_course_by_slug,
        course_handler::create_course,
        course_handler::update_course,
        course_handler::update_structure,
        course_handler::set_published,
        course_handler::assign_instructor,
        course_handler::delete_course,
        course_handler::teaching_courses,
        // Enrollments
        enrollment_handler::enroll,
        enrollment_handler::update_progress,
        enrollment_handler::my_enrollments,
        // Assignments
        assignment_handler::create_assignment,
        assignment_handler::list_assignments,
        assignment_handler::submit,
        assignment_handler::list_submissions,
        assignment_handler::grade,
        // Live sessions
        live_session_handler::schedule_session,
        live_session_handler::list_sessions,
        live_session_handler::update_status,
        live_session_handler::mark_attendance,
        // Store
        product_handler::list_products,
        product_handler::get_product,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::delete_product,
        // Learning
        learner_handler::recommendations,
        learner_handler::dashboard,
        // Admin
        admin_handler::list_users,
        admin_handler::update_status,
        admin_handler::delete_user,
        admin_handler::create_instructor,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserStatus,
            UserResponse,
            Profile,
            StudentProfile,
            LearningPace,
            Course,
            CourseLevel,
            Rating,
            Section,
            Lecture,
            SectionInput,
            LectureInput,
            Enrollment,
            CompletedLecture,
            EnrollmentWithCourse,
            Assignment,
            Submission,
            SubmissionStatus,
            StudentAssignmentView,
            LiveSession,
            HostType,
            Attendance,
            AttendanceStatus,
            Product,
            Recommendations,
            ScoredCourse,
            // Service payloads
            TokenResponse,
            StudentDashboard,
            InstructorDashboard,
            AdminDashboard,
            MessageResponse,
            PaginationMeta,
            // Requests
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::RefreshRequest,
            user_handler::UpdateProfileRequest,
            user_handler::OnboardingRequest,
            course_handler::CreateCourseRequest,
            course_handler::UpdateCourseRequest,
            course_handler::StructureRequest,
            course_handler::PublishRequest,
            course_handler::AssignInstructorRequest,
            enrollment_handler::ProgressRequest,
            assignment_handler::CreateAssignmentRequest,
            assignment_handler::SubmitRequest,
            assignment_handler::GradeRequest,
            live_session_handler::ScheduleSessionRequest,
            live_session_handler::SessionStatusRequest,
            live_session_handler::AttendanceRequest,
            product_handler::CreateProductRequest,
            product_handler::UpdateProductRequest,
            admin_handler::UpdateStatusRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Users", description = "Current user's profile and onboarding"),
        (name = "Courses", description = "Public catalog and course authoring"),
        (name = "Enrollments", description = "Enrollment, progress and XP"),
        (name = "Assignments", description = "Assignments, submissions and grading"),
        (name = "Live Sessions", description = "Scheduled sessions and attendance"),
        (name = "Store", description = "Product catalog"),
        (name = "Learning", description = "Recommendations and dashboards"),
        (name = "Admin", description = "Account administration")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
