//! Assignment and submission repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use super::conflict_or_db;
use super::entities::assignment::{self, Entity as AssignmentEntity};
use super::entities::submission::{self, Entity as SubmissionEntity};
use crate::domain::{
    Assignment, Grade, NewAssignment, Submission, SubmissionDraft, SubmissionStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, assignment: NewAssignment) -> AppResult<Assignment>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>>;

    /// Assignments of a course ordered by due date
    async fn list_by_course(
        &self,
        course_id: Uuid,
        published_only: bool,
    ) -> AppResult<Vec<Assignment>>;

    async fn find_submission(&self, id: Uuid) -> AppResult<Option<Submission>>;

    /// The student's submissions for any of `assignment_ids`
    async fn submissions_of_student(
        &self,
        student_id: Uuid,
        assignment_ids: Vec<Uuid>,
    ) -> AppResult<Vec<Submission>>;

    /// Insert the student's submission or replace its content in place,
    /// clearing any previous grade.
    async fn upsert_submission(&self, draft: SubmissionDraft) -> AppResult<Submission>;

    async fn list_submissions(&self, assignment_id: Uuid) -> AppResult<Vec<Submission>>;

    async fn grade_submission(&self, submission_id: Uuid, grade: Grade) -> AppResult<Submission>;

    /// Submissions awaiting a grade across the given courses
    async fn count_ungraded_for_courses(&self, course_ids: Vec<Uuid>) -> AppResult<u64>;
}

pub struct AssignmentStore {
    db: Arc<DatabaseConnection>,
}

impl AssignmentStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn files_json(files: &[String]) -> AppResult<serde_json::Value> {
    serde_json::to_value(files)
        .map_err(|e| AppError::internal(format!("Submission serialization: {}", e)))
}

#[async_trait]
impl AssignmentRepository for AssignmentStore {
    async fn create(&self, new_assignment: NewAssignment) -> AppResult<Assignment> {
        let now = chrono::Utc::now();
        let active_model = assignment::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(new_assignment.course_id),
            title: Set(new_assignment.title),
            description: Set(new_assignment.description),
            due_at: Set(new_assignment.due_at),
            max_score: Set(new_assignment.max_score),
            is_published: Set(new_assignment.is_published),
            created_by: Set(new_assignment.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(Assignment::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>> {
        let result = AssignmentEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Assignment::from))
    }

    async fn list_by_course(
        &self,
        course_id: Uuid,
        published_only: bool,
    ) -> AppResult<Vec<Assignment>> {
        let mut query = AssignmentEntity::find()
            .filter(assignment::Column::CourseId.eq(course_id))
            .order_by_asc(assignment::Column::DueAt);
        if published_only {
            query = query.filter(assignment::Column::IsPublished.eq(true));
        }

        let models = query.all(self.db.as_ref()).await?;
        Ok(models.into_iter().map(Assignment::from).collect())
    }

    async fn find_submission(&self, id: Uuid) -> AppResult<Option<Submission>> {
        let result = SubmissionEntity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Submission::from))
    }

    async fn submissions_of_student(
        &self,
        student_id: Uuid,
        assignment_ids: Vec<Uuid>,
    ) -> AppResult<Vec<Submission>> {
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = SubmissionEntity::find()
            .filter(submission::Column::StudentId.eq(student_id))
            .filter(submission::Column::AssignmentId.is_in(assignment_ids))
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Submission::from).collect())
    }

    async fn upsert_submission(&self, draft: SubmissionDraft) -> AppResult<Submission> {
        let now = chrono::Utc::now();
        let existing = SubmissionEntity::find()
            .filter(submission::Column::AssignmentId.eq(draft.assignment_id))
            .filter(submission::Column::StudentId.eq(draft.student_id))
            .one(self.db.as_ref())
            .await?;

        let files = files_json(&draft.files)?;
        let status = SubmissionStatus::Submitted.as_str().to_string();

        let model = match existing {
            None => {
                let active = submission::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    assignment_id: Set(draft.assignment_id),
                    student_id: Set(draft.student_id),
                    text: Set(draft.text),
                    files: Set(files),
                    submitted_at: Set(now),
                    score: Set(None),
                    max_score: Set(draft.max_score),
                    feedback: Set(None),
                    status: Set(status),
                    graded_by: Set(None),
                    graded_at: Set(None),
                };
                active
                    .insert(self.db.as_ref())
                    .await
                    .map_err(|e| conflict_or_db(e, "Submission"))?
            }
            // Resubmission replaces the content in place and drops the grade
            Some(model) => {
                let mut active: submission::ActiveModel = model.into();
                active.text = Set(draft.text);
                active.files = Set(files);
                active.submitted_at = Set(now);
                active.max_score = Set(draft.max_score);
                active.status = Set(status);
                active.score = Set(None);
                active.feedback = Set(None);
                active.graded_by = Set(None);
                active.graded_at = Set(None);
                active.update(self.db.as_ref()).await?
            }
        };

        Ok(Submission::from(model))
    }

    async fn list_submissions(&self, assignment_id: Uuid) -> AppResult<Vec<Submission>> {
        let models = SubmissionEntity::find()
            .filter(submission::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(submission::Column::SubmittedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Submission::from).collect())
    }

    async fn grade_submission(&self, submission_id: Uuid, grade: Grade) -> AppResult<Submission> {
        let model = SubmissionEntity::find_by_id(submission_id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Submission")?;

        let mut active: submission::ActiveModel = model.into();
        active.score = Set(Some(grade.score));
        active.max_score = Set(grade.max_score);
        active.feedback = Set(grade.feedback);
        active.status = Set(SubmissionStatus::Graded.as_str().to_string());
        active.graded_by = Set(Some(grade.graded_by));
        active.graded_at = Set(Some(grade.graded_at));

        let model = active.update(self.db.as_ref()).await?;
        Ok(Submission::from(model))
    }

    async fn count_ungraded_for_courses(&self, course_ids: Vec<Uuid>) -> AppResult<u64> {
        if course_ids.is_empty() {
            return Ok(0);
        }
        SubmissionEntity::find()
            .join(JoinType::InnerJoin, submission::Relation::Assignment.def())
            .filter(assignment::Column::CourseId.is_in(course_ids))
            .filter(submission::Column::Status.eq(SubmissionStatus::Submitted.as_str()))
            .count(self.db.as_ref())
            .await
            .map_err(Into::into)
    }
}
