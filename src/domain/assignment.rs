//! Assignments and per-student submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Submitted,
    Graded,
    Overdue,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Graded => "graded",
            SubmissionStatus::Overdue => "overdue",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "submitted" => SubmissionStatus::Submitted,
            "graded" => SubmissionStatus::Graded,
            "overdue" => SubmissionStatus::Overdue,
            _ => SubmissionStatus::Pending,
        }
    }

    /// Status a student sees for an assignment, derived at read time.
    pub fn derive(
        submission: Option<&Submission>,
        due_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        match submission {
            Some(s) if s.status == SubmissionStatus::Graded => SubmissionStatus::Graded,
            Some(_) => SubmissionStatus::Submitted,
            None if now > due_at => SubmissionStatus::Overdue,
            None => SubmissionStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_at: DateTime<Utc>,
    pub max_score: f64,
    pub is_published: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub text: Option<String>,
    pub files: Vec<String>,
    pub submitted_at: DateTime<Utc>,
    pub score: Option<f64>,
    pub max_score: f64,
    pub feedback: Option<String>,
    pub status: SubmissionStatus,
    pub graded_by: Option<Uuid>,
    pub graded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_at: DateTime<Utc>,
    pub max_score: f64,
    pub is_published: bool,
    pub created_by: Uuid,
}

/// Content of a (re)submission.
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub text: Option<String>,
    pub files: Vec<String>,
    pub max_score: f64,
}

/// Grade applied to a submission.
#[derive(Debug, Clone)]
pub struct Grade {
    pub score: f64,
    pub max_score: f64,
    pub feedback: Option<String>,
    pub graded_by: Uuid,
    pub graded_at: DateTime<Utc>,
}

/// Assignment as seen by one student.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignmentView {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub my_status: SubmissionStatus,
    pub my_submission: Option<Submission>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn submission(status: SubmissionStatus) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            assignment_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            text: Some("answer".into()),
            files: vec![],
            submitted_at: Utc::now(),
            score: None,
            max_score: 100.0,
            feedback: None,
            status,
            graded_by: None,
            graded_at: None,
        }
    }

    #[test]
    fn test_derive_pending_before_due() {
        let now = Utc::now();
        let due = now + Duration::days(1);
        assert_eq!(
            SubmissionStatus::derive(None, due, now),
            SubmissionStatus::Pending
        );
    }

    #[test]
    fn test_derive_overdue_after_due() {
        let now = Utc::now();
        let due = now - Duration::hours(1);
        assert_eq!(
            SubmissionStatus::derive(None, due, now),
            SubmissionStatus::Overdue
        );
    }

    #[test]
    fn test_derive_submitted_even_when_late() {
        let now = Utc::now();
        let due = now - Duration::hours(1);
        let s = submission(SubmissionStatus::Submitted);
        assert_eq!(
            SubmissionStatus::derive(Some(&s), due, now),
            SubmissionStatus::Submitted
        );
    }

    #[test]
    fn test_derive_graded() {
        let now = Utc::now();
        let s = submission(SubmissionStatus::Graded);
        assert_eq!(
            SubmissionStatus::derive(Some(&s), now, now),
            SubmissionStatus::Graded
        );
    }
}
