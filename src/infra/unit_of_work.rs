//! Unit of Work: one place that hands out every repository.
//!
//! Services depend on the [`UnitOfWork`] trait rather than on concrete
//! stores, so a test can swap in mocks for exactly the repositories it
//! touches.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    AssignmentRepository, AssignmentStore, CourseRepository, CourseStore, EnrollmentRepository,
    EnrollmentStore, LiveSessionRepository, LiveSessionStore, ProductRepository, ProductStore,
    UserRepository, UserStore,
};

/// Repository hub for dependency injection.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn courses(&self) -> Arc<dyn CourseRepository>;

    fn enrollments(&self) -> Arc<dyn EnrollmentRepository>;

    fn assignments(&self) -> Arc<dyn AssignmentRepository>;

    fn live_sessions(&self) -> Arc<dyn LiveSessionRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;
}

/// Concrete implementation of UnitOfWork backed by one connection pool
pub struct Persistence {
    users: Arc<UserStore>,
    courses: Arc<CourseStore>,
    enrollments: Arc<EnrollmentStore>,
    assignments: Arc<AssignmentStore>,
    live_sessions: Arc<LiveSessionStore>,
    products: Arc<ProductStore>,
}

impl Persistence {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            courses: Arc::new(CourseStore::new(db.clone())),
            enrollments: Arc::new(EnrollmentStore::new(db.clone())),
            assignments: Arc::new(AssignmentStore::new(db.clone())),
            live_sessions: Arc::new(LiveSessionStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
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
