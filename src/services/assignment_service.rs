//! Assignment service - authoring, submission and grading.
//!
//! Grading credits the student's enrollment with XP proportional to the
//! score. A student's own view of an assignment carries a status derived at
//! read time from their submission and the due date.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::enrollment::grade_xp;
use crate::domain::policy::{self, Action};
use crate::domain::{
    Actor, Assignment, Course, Grade, NewAssignment, StudentAssignmentView, Submission,
    SubmissionDraft, SubmissionStatus, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone)]
pub struct AssignmentDraft {
    pub title: String,
    pub description: String,
    pub due_at: DateTime<Utc>,
    pub max_score: f64,
    pub is_published: bool,
}

/// Assignments as seen by the caller.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AssignmentList {
    Student(Vec<StudentAssignmentView>),
    Staff(Vec<Assignment>),
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AssignmentService: Send + Sync {
    async fn create(
        &self,
        actor: Actor,
        course_id: Uuid,
        draft: AssignmentDraft,
    ) -> AppResult<Assignment>;

    async fn list_for_course(&self, actor: Actor, course_id: Uuid) -> AppResult<AssignmentList>;

    async fn submit(
        &self,
        actor: Actor,
        assignment_id: Uuid,
        text: Option<String>,
        files: Vec<String>,
    ) -> AppResult<Submission>;

    async fn list_submissions(&self, actor: Actor, assignment_id: Uuid) -> AppResult<Vec<Submission>>;

    async fn grade(
        &self,
        actor: Actor,
        assignment_id: Uuid,
        submission_id: Uuid,
        score: f64,
        feedback: Option<String>,
    ) -> AppResult<Submission>;
}

pub struct AssignmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AssignmentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn course(&self, id: Uuid) -> AppResult<Course> {
        self.uow.courses().find_by_id(id).await?.ok_or_not_found("Course")
    }

    async fn assignment(&self, id: Uuid) -> AppResult<Assignment> {
        self.uow
            .assignments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Assignment")
    }

    /// Load an assignment and check `action` against its course.
    async fn authorized(&self, actor: &Actor, action: Action, id: Uuid) -> AppResult<Assignment> {
        let assignment = self.assignment(id).await?;
        let course = self.course(assignment.course_id).await?;
        policy::authorize_course(actor, action, &course)?;
        Ok(assignment)
    }

    async fn student_views(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Vec<StudentAssignmentView>> {
        let assignments = self.uow.assignments();
        let published = assignments.list_by_course(course_id, true).await?;
        let ids = published.iter().map(|a| a.id).collect();

        let mut submissions: HashMap<Uuid, Submission> = assignments
            .submissions_of_student(student_id, ids)
            .await?
            .into_iter()
            .map(|s| (s.assignment_id, s))
            .collect();

        let now = Utc::now();
        Ok(published
            .into_iter()
            .map(|assignment| {
                let my_submission = submissions.remove(&assignment.id);
                let my_status =
                    SubmissionStatus::derive(my_submission.as_ref(), assignment.due_at, now);
                StudentAssignmentView {
                    assignment,
                    my_status,
                    my_submission,
                }
            })
            .collect())
    }
}

#[async_trait]
impl<U: UnitOfWork> AssignmentService for AssignmentManager<U> {
    async fn create(
        &self,
        actor: Actor,
        course_id: Uuid,
        draft: AssignmentDraft,
    ) -> AppResult<Assignment> {
        let course = self.course(course_id).await?;
        policy::authorize_course(&actor, Action::ManageAssignments, &course)?;

        if draft.max_score <= 0.0 {
            return Err(AppError::validation("maxScore must be greater than 0"));
        }

        let assignment = self
            .uow
            .assignments()
            .create(NewAssignment {
                course_id,
                title: draft.title.trim().to_string(),
                description: draft.description,
                due_at: draft.due_at,
                max_score: draft.max_score,
                is_published: draft.is_published,
                created_by: actor.id,
            })
            .await?;

        tracing::info!(assignment_id = %assignment.id, course_id = %course_id, "Assignment created");
        Ok(assignment)
    }

    async fn list_for_course(&self, actor: Actor, course_id: Uuid) -> AppResult<AssignmentList> {
        let course = self.course(course_id).await?;

        if actor.role == UserRole::Student {
            let enrolled = self
                .uow
                .enrollments()
                .find(course_id, actor.id)
                .await?
                .is_some();
            if !enrolled {
                return Err(AppError::forbidden("You are not enrolled in this course"));
            }
            return Ok(AssignmentList::Student(
                self.student_views(actor.id, course_id).await?,
            ));
        }

        policy::authorize_course(&actor, Action::ManageAssignments, &course)?;
        Ok(AssignmentList::Staff(
            self.uow.assignments().list_by_course(course_id, false).await?,
        ))
    }

    async fn submit(
        &self,
        actor: Actor,
        assignment_id: Uuid,
        text: Option<String>,
        files: Vec<String>,
    ) -> AppResult<Submission> {
        policy::authorize(&actor, Action::SubmitAssignment)?;

        let assignment = self
            .uow
            .assignments()
            .find_by_id(assignment_id)
            .await?
            .filter(|a| a.is_published)
            .ok_or_not_found("Assignment")?;

        let enrolled = self
            .uow
            .enrollments()
            .find(assignment.course_id, actor.id)
            .await?
            .is_some();
        if !enrolled {
            return Err(AppError::forbidden("You are not enrolled in this course"));
        }

        let text = text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        let files: Vec<String> = files
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        if text.is_none() && files.is_empty() {
            return Err(AppError::validation("A submission needs text or at least one file"));
        }

        let submission = self
            .uow
            .assignments()
            .upsert_submission(SubmissionDraft {
                assignment_id,
                student_id: actor.id,
                text,
                files,
                max_score: assignment.max_score,
            })
            .await?;

        tracing::info!(assignment_id = %assignment_id, student_id = %actor.id, "Assignment submitted");
        Ok(submission)
    }

    async fn list_submissions(&self, actor: Actor, assignment_id: Uuid) -> AppResult<Vec<Submission>> {
        self.authorized(&actor, Action::GradeSubmission, assignment_id)
            .await?;
        self.uow.assignments().list_submissions(assignment_id).await
    }

    async fn grade(
        &self,
        actor: Actor,
        assignment_id: Uuid,
        submission_id: Uuid,
        score: f64,
        feedback: Option<String>,
    ) -> AppResult<Submission> {
        let assignment = self
            .authorized(&actor, Action::GradeSubmission, assignment_id)
            .await?;

        let assignments = self.uow.assignments();
        let submission = assignments
            .find_submission(submission_id)
            .await?
            .filter(|s| s.assignment_id == assignment_id)
            .ok_or_not_found("Submission")?;

        if !(0.0..=assignment.max_score).contains(&score) {
            return Err(AppError::validation(format!(
                "Score must be between 0 and {}",
                assignment.max_score
            )));
        }

        let graded = assignments
            .grade_submission(
                submission.id,
                Grade {
                    score,
                    max_score: assignment.max_score,
                    feedback,
                    graded_by: actor.id,
                    graded_at: Utc::now(),
                },
            )
            .await?;

        let xp = grade_xp(score, assignment.max_score);
        let enrollments = self.uow.enrollments();
        match enrollments
            .find(assignment.course_id, submission.student_id)
            .await?
        {
            Some(enrollment) => enrollments.add_xp(enrollment.id, xp).await?,
            None => tracing::warn!(
                submission_id = %submission.id,
                student_id = %submission.student_id,
                "Graded submission has no enrollment; XP not awarded"
            ),
        }

        tracing::info!(submission_id = %graded.id, score, xp, by = %actor.id, "Submission graded");
        Ok(graded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockAssignmentRepository, MockCourseRepository, MockEnrollmentRepository};
    use crate::services::testing::{assignment, course, enrollment, MockUow, MockedPersistence};
    use chrono::Duration;

    fn service(mocks: MockUow) -> AssignmentManager<MockedPersistence> {
        AssignmentManager::new(mocks.build())
    }

    fn submission(assignment: &Assignment, student_id: Uuid) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            assignment_id: assignment.id,
            student_id,
            text: Some("my answer".into()),
            files: vec![],
            submitted_at: Utc::now(),
            score: None,
            max_score: assignment.max_score,
            feedback: None,
            status: SubmissionStatus::Submitted,
            graded_by: None,
            graded_at: None,
        }
    }

    fn courses_returning(course: Course) -> MockCourseRepository {
        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_by_id()
            .returning(move |_| Ok(Some(course.clone())));
        courses
    }

    struct GradingFixture {
        bob: Actor,
        assignment: Assignment,
        submission: Submission,
    }

    fn grading(expect_xp: Option<i64>) -> (GradingFixture, AssignmentManager<MockedPersistence>) {
        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let owned = course(Some(bob.id));
        let task = assignment(owned.id, 100.0);
        let student_id = Uuid::new_v4();
        let sub = submission(&task, student_id);

        let mut assignments = MockAssignmentRepository::new();
        let found = task.clone();
        assignments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        let pending = sub.clone();
        assignments
            .expect_find_submission()
            .returning(move |_| Ok(Some(pending.clone())));
        let graded = sub.clone();
        assignments.expect_grade_submission().returning(move |_, g| {
            let mut s = graded.clone();
            s.score = Some(g.score);
            s.status = SubmissionStatus::Graded;
            s.graded_by = Some(g.graded_by);
            Ok(s)
        });

        let mut enrollments = MockEnrollmentRepository::new();
        enrollments
            .expect_find()
            .returning(move |c, s| Ok(Some(enrollment(c, s))));
        match expect_xp {
            Some(xp) => {
                enrollments
                    .expect_add_xp()
                    .withf(move |_, amount| *amount == xp)
                    .times(1)
                    .returning(|_, _| Ok(()));
            }
            None => {
                enrollments.expect_add_xp().never();
            }
        }

        let svc = service(MockUow {
            courses: courses_returning(owned),
            assignments,
            enrollments,
            ..Default::default()
        });
        (
            GradingFixture {
                bob,
                assignment: task,
                submission: sub,
            },
            svc,
        )
    }

    #[tokio::test]
    async fn test_grade_awards_proportional_xp() {
        let (fx, svc) = grading(Some(40));
        let graded = svc
            .grade(fx.bob, fx.assignment.id, fx.submission.id, 80.0, Some("Nice".into()))
            .await
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.score, Some(80.0));
        assert_eq!(graded.graded_by, Some(fx.bob.id));
    }

    #[tokio::test]
    async fn test_grade_score_out_of_range() {
        let (fx, svc) = grading(None);
        let err = svc
            .grade(fx.bob, fx.assignment.id, fx.submission.id, 101.0, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_grade_by_unassigned_instructor_forbidden() {
        let (fx, svc) = grading(None);
        let carol = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let err = svc
            .grade(carol, fx.assignment.id, fx.submission.id, 50.0, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_admin_grades_any_course() {
        let (fx, svc) = grading(Some(50));
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        svc.grade(admin, fx.assignment.id, fx.submission.id, 100.0, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_submission_from_other_assignment_not_found() {
        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let owned = course(Some(bob.id));
        let task = assignment(owned.id, 10.0);
        let other = assignment(owned.id, 10.0);
        let stray = submission(&other, Uuid::new_v4());

        let mut assignments = MockAssignmentRepository::new();
        let found = task.clone();
        assignments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        assignments
            .expect_find_submission()
            .returning(move |_| Ok(Some(stray.clone())));
        assignments.expect_grade_submission().never();

        let svc = service(MockUow {
            courses: courses_returning(owned),
            assignments,
            ..Default::default()
        });
        let err = svc
            .grade(bob, task.id, Uuid::new_v4(), 5.0, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref e) if e == "Submission"));
    }

    #[tokio::test]
    async fn test_submit_requires_content() {
        let alice = Actor::new(Uuid::new_v4(), UserRole::Student);
        let task = assignment(Uuid::new_v4(), 10.0);

        let mut assignments = MockAssignmentRepository::new();
        assignments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(task.clone())));
        assignments.expect_upsert_submission().never();
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments
            .expect_find()
            .returning(|c, s| Ok(Some(enrollment(c, s))));

        let svc = service(MockUow {
            assignments,
            enrollments,
            ..Default::default()
        });
        let err = svc
            .submit(alice, Uuid::new_v4(), Some("   ".into()), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_submit_requires_enrollment() {
        let alice = Actor::new(Uuid::new_v4(), UserRole::Student);
        let task = assignment(Uuid::new_v4(), 10.0);

        let mut assignments = MockAssignmentRepository::new();
        assignments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(task.clone())));
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_find().returning(|_, _| Ok(None));

        let svc = service(MockUow {
            assignments,
            enrollments,
            ..Default::default()
        });
        let err = svc
            .submit(alice, Uuid::new_v4(), Some("answer".into()), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_submit_unpublished_assignment_not_found() {
        let alice = Actor::new(Uuid::new_v4(), UserRole::Student);
        let mut task = assignment(Uuid::new_v4(), 10.0);
        task.is_published = false;

        let mut assignments = MockAssignmentRepository::new();
        assignments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(task.clone())));

        let svc = service(MockUow {
            assignments,
            ..Default::default()
        });
        let err = svc
            .submit(alice, Uuid::new_v4(), Some("answer".into()), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_copies_max_score() {
        let alice = Actor::new(Uuid::new_v4(), UserRole::Student);
        let task = assignment(Uuid::new_v4(), 25.0);
        let task_id = task.id;

        let mut assignments = MockAssignmentRepository::new();
        let found = task.clone();
        assignments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        assignments
            .expect_upsert_submission()
            .withf(|d| d.max_score == 25.0 && d.files == vec!["notes.pdf".to_string()])
            .times(1)
            .returning(move |d| {
                let mut s = submission(&task, d.student_id);
                s.files = d.files;
                Ok(s)
            });
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments
            .expect_find()
            .returning(|c, s| Ok(Some(enrollment(c, s))));

        let svc = service(MockUow {
            assignments,
            enrollments,
            ..Default::default()
        });
        let saved = svc
            .submit(alice, task_id, None, vec![" notes.pdf ".into()])
            .await
            .unwrap();
        assert_eq!(saved.status, SubmissionStatus::Submitted);
    }

    #[tokio::test]
    async fn test_student_list_derives_status() {
        let alice = Actor::new(Uuid::new_v4(), UserRole::Student);
        let owned = course(None);
        let course_id = owned.id;

        let done = assignment(course_id, 10.0);
        let mut late = assignment(course_id, 10.0);
        late.due_at = Utc::now() - Duration::days(1);
        let turned_in = submission(&done, alice.id);

        let mut assignments = MockAssignmentRepository::new();
        let listed = vec![done.clone(), late.clone()];
        assignments
            .expect_list_by_course()
            .withf(|_, published_only| *published_only)
            .returning(move |_, _| Ok(listed.clone()));
        assignments
            .expect_submissions_of_student()
            .returning(move |_, _| Ok(vec![turned_in.clone()]));
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments
            .expect_find()
            .returning(|c, s| Ok(Some(enrollment(c, s))));

        let svc = service(MockUow {
            courses: courses_returning(owned),
            assignments,
            enrollments,
            ..Default::default()
        });

        let AssignmentList::Student(views) = svc.list_for_course(alice, course_id).await.unwrap()
        else {
            panic!("expected student view");
        };
        assert_eq!(views[0].my_status, SubmissionStatus::Submitted);
        assert!(views[0].my_submission.is_some());
        assert_eq!(views[1].my_status, SubmissionStatus::Overdue);
    }

    #[tokio::test]
    async fn test_unenrolled_student_cannot_list() {
        let alice = Actor::new(Uuid::new_v4(), UserRole::Student);
        let mut enrollments = MockEnrollmentRepository::new();
        enrollments.expect_find().returning(|_, _| Ok(None));

        let svc = service(MockUow {
            courses: courses_returning(course(None)),
            enrollments,
            ..Default::default()
        });
        let err = svc.list_for_course(alice, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_create_requires_positive_max_score() {
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        let mut assignments = MockAssignmentRepository::new();
        assignments.expect_create().never();

        let svc = service(MockUow {
            courses: courses_returning(course(None)),
            assignments,
            ..Default::default()
        });
        let draft = AssignmentDraft {
            title: "Quiz".into(),
            description: String::new(),
            due_at: Utc::now(),
            max_score: 0.0,
            is_published: true,
        };
        let err = svc.create(admin, Uuid::new_v4(), draft).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
