//! Dashboard service - per-role summary of the caller's activity.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::parallel;
use crate::config::DASHBOARD_UPCOMING_SESSIONS;
use crate::domain::{Actor, Course, EnrollmentWithCourse, LiveSession, UserRole};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub enrolled_count: usize,
    pub completed_count: usize,
    pub total_xp: i64,
    pub best_streak: i32,
    pub enrollments: Vec<EnrollmentWithCourse>,
    pub upcoming_sessions: Vec<LiveSession>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstructorDashboard {
    pub courses_taught: usize,
    pub total_enrollments: u64,
    pub pending_submissions: u64,
    pub courses: Vec<Course>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub users: u64,
    pub courses: u64,
    pub published_courses: u64,
    pub enrollments: u64,
    pub products: u64,
}

/// Dashboard payload, tagged with the caller's role.
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Student(StudentDashboard),
    Instructor(InstructorDashboard),
    Admin(AdminDashboard),
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn dashboard(&self, actor: Actor) -> AppResult<Dashboard>;
}

pub struct DashboardManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DashboardManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn student(&self, actor: Actor) -> AppResult<StudentDashboard> {
        let enrollments = self.uow.enrollments().list_by_student(actor.id).await?;
        let course_ids = enrollments.iter().map(|e| e.enrollment.course_id).collect();

        let upcoming_sessions = self
            .uow
            .live_sessions()
            .upcoming_for_courses(course_ids, Utc::now(), DASHBOARD_UPCOMING_SESSIONS)
            .await?;

        Ok(StudentDashboard {
            enrolled_count: enrollments.len(),
            completed_count: enrollments
                .iter()
                .filter(|e| e.enrollment.is_completed)
                .count(),
            total_xp: enrollments.iter().map(|e| e.enrollment.xp).sum(),
            best_streak: enrollments
                .iter()
                .map(|e| e.enrollment.streak_count)
                .max()
                .unwrap_or(0),
            enrollments,
            upcoming_sessions,
        })
    }

    async fn instructor(&self, actor: Actor) -> AppResult<InstructorDashboard> {
        let courses = self.uow.courses().list_assigned_to(actor.id).await?;
        let ids: Vec<_> = courses.iter().map(|c| c.id).collect();

        let enrollments = self.uow.enrollments();
        let assignments = self.uow.assignments();
        let (total_enrollments, pending_submissions) = parallel::join2(
            enrollments.count_for_courses(ids.clone()),
            assignments.count_ungraded_for_courses(ids),
        )
        .await?;

        Ok(InstructorDashboard {
            courses_taught: courses.len(),
            total_enrollments,
            pending_submissions,
            courses,
        })
    }

    async fn admin(&self) -> AppResult<AdminDashboard> {
        let users = self.uow.users();
        let courses = self.uow.courses();
        let enrollments = self.uow.enrollments();
        let products = self.uow.products();

        let (users, (courses, published_courses), enrollments, products) = parallel::join4(
            users.count(),
            parallel::join2(courses.count(), courses.count_published()),
            enrollments.count(),
            products.count(),
        )
        .await?;

        Ok(AdminDashboard {
            users,
            courses,
            published_courses,
            enrollments,
            products,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> DashboardService for DashboardManager<U> {
    async fn dashboard(&self, actor: Actor) -> AppResult<Dashboard> {
        Ok(match actor.role {
            UserRole::Student => Dashboard::Student(self.student(actor).await?),
            UserRole::Instructor => Dashboard::Instructor(self.instructor(actor).await?),
            UserRole::Admin => Dashboard::Admin(self.admin().await?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        MockAssignmentRepository, MockCourseRepository, MockEnrollmentRepository,
        MockLiveSessionRepository, MockProductRepository, MockUserRepository,
    };
    use crate::services::testing::{course, enrollment, MockUow};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_student_dashboard_aggregates_enrollments() {
        let alice = Actor::new(Uuid::new_v4(), UserRole::Student);

        let mut done = enrollment(Uuid::new_v4(), alice.id);
        done.xp = 30;
        done.streak_count = 4;
        done.is_completed = true;
        let mut ongoing = enrollment(Uuid::new_v4(), alice.id);
        ongoing.xp = 12;
        ongoing.streak_count = 2;

        let rows: Vec<EnrollmentWithCourse> = [done, ongoing]
            .into_iter()
            .map(|enrollment| EnrollmentWithCourse {
                enrollment,
                course_title: "Intro".into(),
                course_slug: "intro".into(),
                course_cover_url: None,
            })
            .collect();

        let mut enrollments = MockEnrollmentRepository::new();
        enrollments
            .expect_list_by_student()
            .returning(move |_| Ok(rows.clone()));
        let mut live_sessions = MockLiveSessionRepository::new();
        live_sessions
            .expect_upcoming_for_courses()
            .withf(|ids, _, limit| ids.len() == 2 && *limit == 5)
            .returning(|_, _, _| Ok(vec![]));

        let svc = DashboardManager::new(
            MockUow {
                enrollments,
                live_sessions,
                ..Default::default()
            }
            .build(),
        );
        let Dashboard::Student(summary) = svc.dashboard(alice).await.unwrap() else {
            panic!("expected student dashboard");
        };
        assert_eq!(summary.enrolled_count, 2);
        assert_eq!(summary.completed_count, 1);
        assert_eq!(summary.total_xp, 42);
        assert_eq!(summary.best_streak, 4);
    }

    #[tokio::test]
    async fn test_instructor_dashboard_counts() {
        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);

        let mut courses = MockCourseRepository::new();
        courses
            .expect_list_assigned_to()
            .returning(|id| Ok(vec![course(Some(id)), course(Some(id))]));
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_count_for_courses().returning(|_| Ok(17));
        let mut assignments = MockAssignmentRepository::new();
        assignments
            .expect_count_ungraded_for_courses()
            .returning(|_| Ok(3));

        let svc = DashboardManager::new(
            MockUow {
                courses,
                enrollments,
                assignments,
                ..Default::default()
            }
            .build(),
        );
        let Dashboard::Instructor(summary) = svc.dashboard(bob).await.unwrap() else {
            panic!("expected instructor dashboard");
        };
        assert_eq!(summary.courses_taught, 2);
        assert_eq!(summary.total_enrollments, 17);
        assert_eq!(summary.pending_submissions, 3);
    }

    #[tokio::test]
    async fn test_admin_dashboard_serializes_with_role_tag() {
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);

        let mut users = MockUserRepository::new();
        users.expect_count().returning(|| Ok(10));
        let mut courses = MockCourseRepository::new();
        courses.expect_count().returning(|| Ok(4));
        courses.expect_count_published().returning(|| Ok(3));
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_count().returning(|| Ok(25));
        let mut products = MockProductRepository::new();
        products.expect_count().returning(|| Ok(8));

        let svc = DashboardManager::new(
            MockUow {
                users,
                courses,
                enrollments,
                products,
                ..Default::default()
            }
            .build(),
        );
        let json = serde_json::to_value(svc.dashboard(admin).await.unwrap()).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["publishedCourses"], 3);
        assert_eq!(json["users"], 10);
    }
}
