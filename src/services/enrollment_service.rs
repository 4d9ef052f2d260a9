//! Enrollment service - joining courses and tracking progress.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::policy::{self, Action};
use crate::domain::{Actor, Enrollment, EnrollmentWithCourse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Enroll the calling student in a published course
    async fn enroll(&self, actor: Actor, course_id: Uuid) -> AppResult<Enrollment>;

    /// Record that the student reached `progress_pct` on `lecture_id`
    async fn update_progress(
        &self,
        actor: Actor,
        course_id: Uuid,
        lecture_id: Uuid,
        progress_pct: f64,
    ) -> AppResult<Enrollment>;

    async fn my_enrollments(&self, actor: Actor) -> AppResult<Vec<EnrollmentWithCourse>>;
}

pub struct EnrollmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> EnrollmentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> EnrollmentService for EnrollmentManager<U> {
    async fn enroll(&self, actor: Actor, course_id: Uuid) -> AppResult<Enrollment> {
        policy::authorize(&actor, Action::Enroll)?;

        let courses = self.uow.courses();
        courses
            .find_by_id(course_id)
            .await?
            .filter(|c| c.is_published)
            .ok_or_not_found("Course")?;

        let enrollments = self.uow.enrollments();
        if enrollments.find(course_id, actor.id).await?.is_some() {
            return Err(AppError::conflict("Enrollment"));
        }

        let enrollment = enrollments
            .create(Enrollment::start(course_id, actor.id, Utc::now()))
            .await?;

        // Not rolled back if this fails; the enrollment stands
        if let Err(e) = courses.increment_enrollment_count(course_id).await {
            tracing::error!(course_id = %course_id, error = %e, "Enrollment count not incremented");
            return Err(e);
        }

        tracing::info!(course_id = %course_id, student_id = %actor.id, "Student enrolled");
        Ok(enrollment)
    }

    async fn update_progress(
        &self,
        actor: Actor,
        course_id: Uuid,
        lecture_id: Uuid,
        progress_pct: f64,
    ) -> AppResult<Enrollment> {
        policy::authorize(&actor, Action::TrackProgress)?;

        let enrollments = self.uow.enrollments();
        let mut enrollment = enrollments
            .find(course_id, actor.id)
            .await?
            .ok_or_not_found("Enrollment")?;

        if !(0.0..=100.0).contains(&progress_pct) {
            return Err(AppError::validation("progressPct must be between 0 and 100"));
        }

        let outcome = enrollment.apply_progress(lecture_id, progress_pct, Utc::now());
        let enrollment = enrollments.save_progress(enrollment).await?;

        tracing::debug!(
            enrollment_id = %enrollment.id,
            xp_awarded = outcome.xp_awarded,
            lecture_added = outcome.lecture_added,
            "Progress recorded"
        );
        if outcome.course_completed {
            tracing::info!(course_id = %course_id, student_id = %actor.id, "Course completed");
        }
        Ok(enrollment)
    }

    async fn my_enrollments(&self, actor: Actor) -> AppResult<Vec<EnrollmentWithCourse>> {
        policy::authorize(&actor, Action::Enroll)?;
        self.uow.enrollments().list_by_student(actor.id).await
    }
}
