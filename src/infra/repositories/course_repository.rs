//! Course repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::course::{self, ActiveModel, Entity as CourseEntity};
use super::{conflict_or_db, like_pattern};
use crate::domain::{Course, CourseChanges, CourseFilter, NewCourse, Section};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Course>>;

    /// Whether `slug` is used by a course other than `except`
    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> AppResult<bool>;

    /// Published courses matching `filter`, newest first
    async fn list_published(
        &self,
        filter: &CourseFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Course>, u64)>;

    /// Every published course in creation order
    async fn list_all_published(&self) -> AppResult<Vec<Course>>;

    async fn list_assigned_to(&self, instructor_id: Uuid) -> AppResult<Vec<Course>>;

    async fn list_all(&self) -> AppResult<Vec<Course>>;

    async fn create(&self, course: NewCourse) -> AppResult<Course>;

    async fn update(&self, id: Uuid, changes: CourseChanges) -> AppResult<Course>;

    async fn replace_sections(&self, id: Uuid, sections: Vec<Section>) -> AppResult<Course>;

    async fn set_published(&self, id: Uuid, published: bool) -> AppResult<Course>;

    async fn assign_instructor(&self, id: Uuid, instructor_id: Uuid) -> AppResult<Course>;

    /// `enrollment_count = enrollment_count + 1` in a single statement
    async fn increment_enrollment_count(&self, id: Uuid) -> AppResult<()>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn count(&self) -> AppResult<u64>;

    async fn count_published(&self) -> AppResult<u64>;
}

pub struct CourseStore {
    db: Arc<DatabaseConnection>,
}

impl CourseStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<course::Model> {
        CourseEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Course")
    }

    async fn save(&self, mut active: ActiveModel) -> AppResult<Course> {
        active.updated_at = Set(chrono::Utc::now());
        let model = active
            .update(self.db.as_ref())
            .await
            .map_err(|e| conflict_or_db(e, "Course"))?;
        Ok(Course::from(model))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::internal(format!("Course serialization: {}", e)))
}

#[async_trait]
impl CourseRepository for CourseStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>> {
        let result = CourseEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Course::from))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Course>> {
        let result = CourseEntity::find()
            .filter(course::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(Course::from))
    }

    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> AppResult<bool> {
        let mut query = CourseEntity::find().filter(course::Column::Slug.eq(slug));
        if let Some(id) = except {
            query = query.filter(course::Column::Id.ne(id));
        }
        Ok(query.count(self.db.as_ref()).await? > 0)
    }

    async fn list_published(
        &self,
        filter: &CourseFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Course>, u64)> {
        let mut query = CourseEntity::find()
            .filter(course::Column::IsPublished.eq(true))
            .order_by_desc(course::Column::CreatedAt);

        if let Some(category) = &filter.category {
            query = query.filter(course::Column::Category.eq(category.as_str()));
        }
        if let Some(level) = filter.level {
            query = query.filter(course::Column::Level.eq(level.as_str()));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(course::Column::Title)))
                    .like(like_pattern(search.trim())),
            );
        }

        let paginator = query.paginate(self.db.as_ref(), params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page() - 1).await?;

        Ok((models.into_iter().map(Course::from).collect(), total))
    }

    async fn list_all_published(&self) -> AppResult<Vec<Course>> {
        let models = CourseEntity::find()
            .filter(course::Column::IsPublished.eq(true))
            .order_by_asc(course::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Course::from).collect())
    }

    async fn list_assigned_to(&self, instructor_id: Uuid) -> AppResult<Vec<Course>> {
        let models = CourseEntity::find()
            .filter(course::Column::AssignedInstructor.eq(instructor_id))
            .order_by_desc(course::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Course::from).collect())
    }

    async fn list_all(&self) -> AppResult<Vec<Course>> {
        let models = CourseEntity::find()
            .order_by_desc(course::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Course::from).collect())
    }

    async fn create(&self, new_course: NewCourse) -> AppResult<Course> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_course.title),
            slug: Set(new_course.slug),
            description: Set(new_course.description),
            category: Set(new_course.category),
            tags: Set(to_json(&new_course.tags)?),
            level: Set(new_course.level.as_str().to_string()),
            language: Set(new_course.language),
            cover_url: Set(new_course.cover_url),
            created_by: Set(new_course.created_by),
            assigned_instructor: Set(new_course.assigned_instructor),
            sections: Set(to_json(&new_course.sections)?),
            is_published: Set(false),
            price: Set(new_course.price),
            estimated_hours: Set(new_course.estimated_hours),
            enrollment_count: Set(0),
            rating_average: Set(0.0),
            rating_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| conflict_or_db(e, "Course"))?;
        Ok(Course::from(model))
    }

    async fn update(&self, id: Uuid, changes: CourseChanges) -> AppResult<Course> {
        let mut active: ActiveModel = self.find_model(id).await?.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(tags) = changes.tags {
            active.tags = Set(to_json(&tags)?);
        }
        if let Some(level) = changes.level {
            active.level = Set(level.as_str().to_string());
        }
        if let Some(language) = changes.language {
            active.language = Set(language);
        }
        if let Some(cover_url) = changes.cover_url {
            active.cover_url = Set(Some(cover_url));
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(hours) = changes.estimated_hours {
            active.estimated_hours = Set(hours);
        }

        self.save(active).await
    }

    async fn replace_sections(&self, id: Uuid, sections: Vec<Section>) -> AppResult<Course> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.sections = Set(to_json(&sections)?);
        self.save(active).await
    }

    async fn set_published(&self, id: Uuid, published: bool) -> AppResult<Course> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.is_published = Set(published);
        self.save(active).await
    }

    async fn assign_instructor(&self, id: Uuid, instructor_id: Uuid) -> AppResult<Course> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.assigned_instructor = Set(Some(instructor_id));
        self.save(active).await
    }

    async fn increment_enrollment_count(&self, id: Uuid) -> AppResult<()> {
        let result = CourseEntity::update_many()
            .col_expr(
                course::Column::EnrollmentCount,
                Expr::col(course::Column::EnrollmentCount).add(1),
            )
            .filter(course::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Course"));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = CourseEntity::delete_by_id(id).exec(self.db.as_ref()).await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Course"));
        }
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        CourseEntity::find()
            .count(self.db.as_ref())
            .await
            .map_err(Into::into)
    }

    async fn count_published(&self) -> AppResult<u64> {
        CourseEntity::find()
            .filter(course::Column::IsPublished.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(Into::into)
    }
}
