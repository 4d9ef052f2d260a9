//! Shared fixtures for service unit tests.

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Assignment, Course, CourseLevel, Enrollment, Lecture, Profile, Rating, Section, User,
    UserRole, UserStatus,
};
use crate::infra::{
    AssignmentRepository, CourseRepository, EnrollmentRepository, LiveSessionRepository,
    MockAssignmentRepository, MockCourseRepository, MockEnrollmentRepository,
    MockLiveSessionRepository, MockProductRepository, MockUserRepository, ProductRepository,
    UnitOfWork, UserRepository,
};

/// Mock repositories to be configured by a test before [`MockUow::build`].
#[derive(Default)]
pub struct MockUow {
    pub users: MockUserRepository,
    pub courses: MockCourseRepository,
    pub enrollments: MockEnrollmentRepository,
    pub assignments: MockAssignmentRepository,
    pub live_sessions: MockLiveSessionRepository,
    pub products: MockProductRepository,
}

impl MockUow {
    pub fn build(self) -> Arc<MockedPersistence> {
        Arc::new(MockedPersistence {
            users: Arc::new(self.users),
            courses: Arc::new(self.courses),
            enrollments: Arc::new(self.enrollments),
            assignments: Arc::new(self.assignments),
            live_sessions: Arc::new(self.live_sessions),
            products: Arc::new(self.products),
        })
    }
}

pub struct MockedPersistence {
    users: Arc<MockUserRepository>,
    courses: Arc<MockCourseRepository>,
    enrollments: Arc<MockEnrollmentRepository>,
    assignments: Arc<MockAssignmentRepository>,
    live_sessions: Arc<MockLiveSessionRepository>,
    products: Arc<MockProductRepository>,
}

impl UnitOfWork for MockedPersistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn courses(&self) -> Arc<dyn CourseRepository> {
        self.courses.clone()
    }

    fn enrollments(&self) -> Arc<dyn EnrollmentRepository> {
        self.enrollments.clone()
    }

    fn assignments(&self) -> Arc<dyn AssignmentRepository> {
        self.assignments.clone()
    }

    fn live_sessions(&self) -> Arc<dyn LiveSessionRepository> {
        self.live_sessions.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.products.clone()
    }
}

pub fn user(role: UserRole) -> User {
    let id = Uuid::new_v4();
    User {
        id,
        username: format!("user{}", &id.simple().to_string()[..8]),
        email: format!("{}@example.com", id.simple()),
        password_hash: String::new(),
        role,
        status: UserStatus::Active,
        profile: Profile::default(),
        student_profile: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A published course with one section of two lectures.
pub fn course(assigned_instructor: Option<Uuid>) -> Course {
    let lecture = |order| Lecture {
        id: Uuid::new_v4(),
        title: format!("Lecture {}", order),
        video_url: None,
        duration_sec: 600,
        order,
    };
    Course {
        id: Uuid::new_v4(),
        title: "Intro to Rust".into(),
        slug: "intro-to-rust".into(),
        description: "Ownership and borrowing".into(),
        category: "programming".into(),
        tags: ["rust".to_string(), "systems".to_string()].into(),
        level: CourseLevel::Beginner,
        language: "en".into(),
        cover_url: None,
        created_by: assigned_instructor.unwrap_or_else(Uuid::new_v4),
        assigned_instructor,
        sections: vec![Section {
            title: "Basics".into(),
            lectures: vec![lecture(1), lecture(2)],
        }],
        is_published: true,
        price: 0.0,
        estimated_hours: 4.0,
        enrollment_count: 0,
        rating: Rating::default(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn enrollment(course_id: Uuid, student_id: Uuid) -> Enrollment {
    Enrollment::start(course_id, student_id, Utc::now())
}

pub fn assignment(course_id: Uuid, max_score: f64) -> Assignment {
    Assignment {
        id: Uuid::new_v4(),
        course_id,
        title: "Borrow checker drills".into(),
        description: String::new(),
        due_at: Utc::now() + Duration::days(7),
        max_score,
        is_published: true,
        created_by: Uuid::new_v4(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
