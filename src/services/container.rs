//! Service Container - Centralized service access with parallel execution support.
//!
//! Handlers reach every use case through [`ServiceContainer`], which hands
//! out trait objects so a router can be built over mocks.

use std::future::Future;
use std::sync::Arc;

use super::{
    AssignmentManager, AssignmentService, AuthService, Authenticator, CourseManager,
    CourseService, DashboardManager, DashboardService, EnrollmentManager, EnrollmentService,
    LiveSessionManager, LiveSessionService, ProductManager, ProductService,
    RecommendationEngine, RecommendationService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn courses(&self) -> Arc<dyn CourseService>;

    fn enrollments(&self) -> Arc<dyn EnrollmentService>;

    fn assignments(&self) -> Arc<dyn AssignmentService>;

    fn live_sessions(&self) -> Arc<dyn LiveSessionService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn recommendations(&self) -> Arc<dyn RecommendationService>;

    fn dashboard(&self) -> Arc<dyn DashboardService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    courses: Arc<dyn CourseService>,
    enrollments: Arc<dyn EnrollmentService>,
    assignments: Arc<dyn AssignmentService>,
    live_sessions: Arc<dyn LiveSessionService>,
    products: Arc<dyn ProductService>,
    recommendations: Arc<dyn RecommendationService>,
    dashboard: Arc<dyn DashboardService>,
}

impl Services {
    /// Wire every service over one Unit of Work.
    pub fn new<U: UnitOfWork + 'static>(uow: Arc<U>, config: Config) -> Self {
        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            users: Arc::new(UserManager::new(uow.clone())),
            courses: Arc::new(CourseManager::new(uow.clone())),
            enrollments: Arc::new(EnrollmentManager::new(uow.clone())),
            assignments: Arc::new(AssignmentManager::new(uow.clone())),
            live_sessions: Arc::new(LiveSessionManager::new(uow.clone())),
            products: Arc::new(ProductManager::new(uow.clone())),
            recommendations: Arc::new(RecommendationEngine::new(uow.clone())),
            dashboard: Arc::new(DashboardManager::new(uow)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: Arc<sea_orm::DatabaseConnection>, config: Config) -> Self {
        Self::new(Arc::new(Persistence::new(db)), config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn courses(&self) -> Arc<dyn CourseService> {
        self.courses.clone()
    }

    fn enrollments(&self) -> Arc<dyn EnrollmentService> {
        self.enrollments.clone()
    }

    fn assignments(&self) -> Arc<dyn AssignmentService> {
        self.assignments.clone()
    }

    fn live_sessions(&self) -> Arc<dyn LiveSessionService> {
        self.live_sessions.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.products.clone()
    }

    fn recommendations(&self) -> Arc<dyn RecommendationService> {
        self.recommendations.clone()
    }

    fn dashboard(&self) -> Arc<dyn DashboardService> {
        self.dashboard.clone()
    }
}

/// Run independent store reads concurrently.
///
/// Every helper fails fast: the first error is returned and the remaining
/// futures are dropped.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    pub async fn join3<F1, F2, F3, T1, T2, T3>(
        f1: F1,
        f2: F2,
        f3: F3,
    ) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }

    pub async fn join4<F1, F2, F3, F4, T1, T2, T3, T4>(
        f1: F1,
        f2: F2,
        f3: F3,
        f4: F4,
    ) -> AppResult<(T1, T2, T3, T4)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
        F4: Future<Output = AppResult<T4>>,
    {
        try_join!(f1, f2, f3, f4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<&'static str> {
            Ok("two")
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
    }

    #[tokio::test]
    async fn test_parallel_join3_fails_fast() {
        let result = parallel::join3(
            async { Ok::<_, AppError>(1) },
            async { Err::<i32, _>(AppError::not_found("Course")) },
            async { Ok::<_, AppError>(3) },
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
