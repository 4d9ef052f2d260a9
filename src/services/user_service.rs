//! User service - profile self-service and admin account management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::policy::{self, Action};
use crate::domain::{Actor, ProfileUpdate, StudentProfile, User, UserRole, UserStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Update the caller's own profile fields
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User>;

    /// Store a student's onboarding answers and mark them onboarded
    async fn complete_onboarding(&self, actor: Actor, profile: StudentProfile) -> AppResult<User>;

    /// Admin: page through accounts, optionally by role
    async fn list_users(
        &self,
        actor: Actor,
        role: Option<UserRole>,
        params: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;

    /// Admin: activate, ban or deactivate an account
    async fn set_status(&self, actor: Actor, id: Uuid, status: UserStatus) -> AppResult<User>;

    /// Admin: permanently delete an account
    async fn delete_user(&self, actor: Actor, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let users = self.uow.users();
        let mut profile = users.find_by_id(id).await?.ok_or_not_found("User")?.profile;
        profile.apply(update);
        users.update_profile(id, profile).await
    }

    async fn complete_onboarding(&self, actor: Actor, profile: StudentProfile) -> AppResult<User> {
        if actor.role != UserRole::Student {
            return Err(AppError::forbidden("Only students complete onboarding"));
        }

        let profile = StudentProfile {
            domains: StudentProfile::normalize_domains(&profile.domains),
            onboarded: true,
            ..profile
        };

        let user = self.uow.users().update_student_profile(actor.id, profile).await?;
        tracing::info!(user_id = %user.id, "Student onboarding completed");
        Ok(user)
    }

    async fn list_users(
        &self,
        actor: Actor,
        role: Option<UserRole>,
        params: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        policy::authorize(&actor, Action::ManageUsers)?;
        self.uow.users().list(role, &params).await
    }

    async fn set_status(&self, actor: Actor, id: Uuid, status: UserStatus) -> AppResult<User> {
        policy::authorize(&actor, Action::ManageUsers)?;
        if actor.id == id {
            return Err(AppError::validation("You cannot change your own status"));
        }

        let user = self.uow.users().update_status(id, status).await?;
        tracing::info!(user_id = %id, %status, by = %actor.id, "User status changed");
        Ok(user)
    }

    async fn delete_user(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        policy::authorize(&actor, Action::ManageUsers)?;
        if actor.id == id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        self.uow.users().delete(id).await?;
        tracing::info!(user_id = %id, by = %actor.id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use crate::services::testing::{user, MockUow};

    fn service(users: MockUserRepository) -> UserManager<crate::services::testing::MockedPersistence> {
        UserManager::new(
            MockUow {
                users,
                ..Default::default()
            }
            .build(),
        )
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let err = service(users).get_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref e) if e == "User"));
    }

    #[tokio::test]
    async fn test_onboarding_normalizes_and_marks_onboarded() {
        let student = user(UserRole::Student);
        let actor = Actor::new(student.id, student.role);

        let mut users = MockUserRepository::new();
        users
            .expect_update_student_profile()
            .withf(|_, p| p.onboarded && p.domains.contains("webdev") && p.domains.len() == 1)
            .times(1)
            .returning(move |_, p| {
                let mut u = student.clone();
                u.student_profile = Some(p);
                Ok(u)
            });

        let answers = StudentProfile {
            domains: ["WebDev".to_string(), " webdev ".to_string()].into(),
            ..Default::default()
        };
        let updated = service(users).complete_onboarding(actor, answers).await.unwrap();
        assert!(updated.student_profile.unwrap().onboarded);
    }

    #[tokio::test]
    async fn test_onboarding_is_student_only() {
        let mut users = MockUserRepository::new();
        users.expect_update_student_profile().never();

        let actor = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let err = service(users)
            .complete_onboarding(actor, StudentProfile::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let mut users = MockUserRepository::new();
        users.expect_delete().never();

        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        let err = service(users).delete_user(admin, admin.id).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_users_requires_admin() {
        let mut users = MockUserRepository::new();
        users.expect_list().never();

        let student = Actor::new(Uuid::new_v4(), UserRole::Student);
        let err = service(users)
            .list_users(student, None, PaginationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_admin_bans_user() {
        let target = user(UserRole::Student);
        let target_id = target.id;

        let mut users = MockUserRepository::new();
        users
            .expect_update_status()
            .withf(move |id, s| *id == target_id && *s == UserStatus::Banned)
            .returning(move |_, s| {
                let mut u = target.clone();
                u.status = s;
                Ok(u)
            });

        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        let banned = service(users)
            .set_status(admin, target_id, UserStatus::Banned)
            .await
            .unwrap();
        assert_eq!(banned.status, UserStatus::Banned);
    }
}
