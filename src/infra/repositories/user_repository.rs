//! User repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::conflict_or_db;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, Profile, StudentProfile, User, UserRole, UserStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find by username or email, whichever matches.
    async fn find_by_login(&self, identifier: &str) -> AppResult<Option<User>>;

    async fn username_exists(&self, username: &str) -> AppResult<bool>;

    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    /// Whether any admin account exists
    async fn admin_exists(&self) -> AppResult<bool>;

    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn update_profile(&self, id: Uuid, profile: Profile) -> AppResult<User>;

    async fn update_student_profile(&self, id: Uuid, profile: StudentProfile) -> AppResult<User>;

    async fn update_status(&self, id: Uuid, status: UserStatus) -> AppResult<User>;

    /// Permanently delete the user row
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Page through users, newest first, optionally restricted to one role
    async fn list(
        &self,
        role: Option<UserRole>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;

    async fn count(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("User")
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_login(&self, identifier: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(identifier))
                    .add(user::Column::Email.eq(identifier.to_lowercase())),
            )
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn admin_exists(&self) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Role.eq(UserRole::Admin.as_str()))
            .count(self.db.as_ref())
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_user.username),
            email: Set(new_user.email.to_lowercase()),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.as_str().to_string()),
            status: Set(UserStatus::Active.as_str().to_string()),
            first_name: Set(new_user.profile.first_name),
            last_name: Set(new_user.profile.last_name),
            avatar_url: Set(new_user.profile.avatar_url),
            phone: Set(new_user.profile.phone),
            student_profile: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| conflict_or_db(e, "User"))?;
        Ok(User::from(model))
    }

    async fn update_profile(&self, id: Uuid, profile: Profile) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();

        active.first_name = Set(profile.first_name);
        active.last_name = Set(profile.last_name);
        active.avatar_url = Set(profile.avatar_url);
        active.phone = Set(profile.phone);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn update_student_profile(&self, id: Uuid, profile: StudentProfile) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();

        let json = serde_json::to_value(&profile)
            .map_err(|e| AppError::internal(format!("Student profile serialization: {}", e)))?;
        active.student_profile = Set(Some(json));
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn update_status(&self, id: Uuid, status: UserStatus) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();

        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("User"));
        }

        Ok(())
    }

    async fn list(
        &self,
        role: Option<UserRole>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        let mut query = UserEntity::find().order_by_desc(user::Column::CreatedAt);
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }

        let paginator = query.paginate(self.db.as_ref(), params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page() - 1).await?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn count(&self) -> AppResult<u64> {
        UserEntity::find()
            .count(self.db.as_ref())
            .await
            .map_err(Into::into)
    }
}
