//! Enrollment repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::conflict_or_db;
use super::entities::course::Entity as CourseEntity;
use super::entities::enrollment::{self, ActiveModel, Entity as EnrollmentEntity};
use crate::domain::{Enrollment, EnrollmentWithCourse};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// The unique enrollment of `student_id` in `course_id`
    async fn find(&self, course_id: Uuid, student_id: Uuid) -> AppResult<Option<Enrollment>>;

    /// Insert a new enrollment. A duplicate (course, student) pair is a
    /// conflict.
    async fn create(&self, enrollment: Enrollment) -> AppResult<Enrollment>;

    /// Persist the progress fields of an existing enrollment
    async fn save_progress(&self, enrollment: Enrollment) -> AppResult<Enrollment>;

    /// `xp = xp + amount` in a single statement
    async fn add_xp(&self, enrollment_id: Uuid, amount: i64) -> AppResult<()>;

    /// The student's enrollments with course details, newest first
    async fn list_by_student(&self, student_id: Uuid) -> AppResult<Vec<EnrollmentWithCourse>>;

    async fn enrolled_course_ids(&self, student_id: Uuid) -> AppResult<Vec<Uuid>>;

    async fn count_for_courses(&self, course_ids: Vec<Uuid>) -> AppResult<u64>;

    async fn count(&self) -> AppResult<u64>;
}

pub struct EnrollmentStore {
    db: Arc<DatabaseConnection>,
}

impl EnrollmentStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn lectures_json(enrollment: &Enrollment) -> AppResult<serde_json::Value> {
    serde_json::to_value(&enrollment.completed_lectures)
        .map_err(|e| AppError::internal(format!("Enrollment serialization: {}", e)))
}

#[async_trait]
impl EnrollmentRepository for EnrollmentStore {
    async fn find(&self, course_id: Uuid, student_id: Uuid) -> AppResult<Option<Enrollment>> {
        let result = EnrollmentEntity::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .filter(enrollment::Column::StudentId.eq(student_id))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(Enrollment::from))
    }

    async fn create(&self, enrollment: Enrollment) -> AppResult<Enrollment> {
        let active_model = ActiveModel {
            id: Set(enrollment.id),
            course_id: Set(enrollment.course_id),
            student_id: Set(enrollment.student_id),
            started_at: Set(enrollment.started_at),
            progress_pct: Set(enrollment.progress_pct),
            last_lecture_id: Set(enrollment.last_lecture_id),
            completed_lectures: Set(lectures_json(&enrollment)?),
            xp: Set(enrollment.xp),
            streak_count: Set(enrollment.streak_count),
            last_activity_at: Set(enrollment.last_activity_at),
            is_completed: Set(enrollment.is_completed),
            completed_at: Set(enrollment.completed_at),
            certificate_url: Set(enrollment.certificate_url),
        };

        let model = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| conflict_or_db(e, "Enrollment"))?;
        Ok(Enrollment::from(model))
    }

    async fn save_progress(&self, enrollment: Enrollment) -> AppResult<Enrollment> {
        let active_model = ActiveModel {
            id: Set(enrollment.id),
            progress_pct: Set(enrollment.progress_pct),
            last_lecture_id: Set(enrollment.last_lecture_id),
            completed_lectures: Set(lectures_json(&enrollment)?),
            xp: Set(enrollment.xp),
            streak_count: Set(enrollment.streak_count),
            last_activity_at: Set(enrollment.last_activity_at),
            is_completed: Set(enrollment.is_completed),
            completed_at: Set(enrollment.completed_at),
            ..Default::default()
        };

        let model = active_model.update(self.db.as_ref()).await?;
        Ok(Enrollment::from(model))
    }

    async fn add_xp(&self, enrollment_id: Uuid, amount: i64) -> AppResult<()> {
        let result = EnrollmentEntity::update_many()
            .col_expr(
                enrollment::Column::Xp,
                Expr::col(enrollment::Column::Xp).add(amount),
            )
            .filter(enrollment::Column::Id.eq(enrollment_id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Enrollment"));
        }
        Ok(())
    }

    async fn list_by_student(&self, student_id: Uuid) -> AppResult<Vec<EnrollmentWithCourse>> {
        let rows = EnrollmentEntity::find()
            .find_also_related(CourseEntity)
            .filter(enrollment::Column::StudentId.eq(student_id))
            .order_by_desc(enrollment::Column::StartedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, course)| {
                let course = course?;
                Some(EnrollmentWithCourse {
                    enrollment: Enrollment::from(enrollment),
                    course_title: course.title,
                    course_slug: course.slug,
                    course_cover_url: course.cover_url,
                })
            })
            .collect())
    }

    async fn enrolled_course_ids(&self, student_id: Uuid) -> AppResult<Vec<Uuid>> {
        let ids = EnrollmentEntity::find()
            .select_only()
            .column(enrollment::Column::CourseId)
            .filter(enrollment::Column::StudentId.eq(student_id))
            .into_tuple::<Uuid>()
            .all(self.db.as_ref())
            .await?;
        Ok(ids)
    }

    async fn count_for_courses(&self, course_ids: Vec<Uuid>) -> AppResult<u64> {
        if course_ids.is_empty() {
            return Ok(0);
        }
        EnrollmentEntity::find()
            .filter(enrollment::Column::CourseId.is_in(course_ids))
            .count(self.db.as_ref())
            .await
            .map_err(Into::into)
    }

    async fn count(&self) -> AppResult<u64> {
        EnrollmentEntity::find()
            .count(self.db.as_ref())
            .await
            .map_err(Into::into)
    }
}
