//! Enrollment record and the progress/XP rules applied to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{PROGRESS_PERCENT_PER_XP, XP_PER_FULL_GRADE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedLecture {
    pub lecture_id: Uuid,
    pub completed_at: DateTime<Utc>,
}

/// Per (student, course) progress state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub progress_pct: f64,
    pub last_lecture_id: Option<Uuid>,
    pub completed_lectures: Vec<CompletedLecture>,
    pub xp: i64,
    pub streak_count: i32,
    pub last_activity_at: DateTime<Utc>,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub certificate_url: Option<String>,
}

/// What a progress update changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressOutcome {
    pub xp_awarded: i64,
    pub lecture_added: bool,
    pub course_completed: bool,
}

/// XP for a progress submission: floor(pct × 0.1).
///
/// Computed from the submitted percentage, not from the change since the
/// previous submission, so resubmitting the same value awards XP again.
pub fn progress_xp(progress_pct: f64) -> i64 {
    (progress_pct / PROGRESS_PERCENT_PER_XP).floor() as i64
}

/// XP for a graded submission: floor(score / max × 50).
pub fn grade_xp(score: f64, max_score: f64) -> i64 {
    if max_score <= 0.0 {
        return 0;
    }
    (score * XP_PER_FULL_GRADE / max_score).floor() as i64
}

/// Streak after activity at `now`: +1 when the previous activity was on the
/// previous UTC day, unchanged on the same day, otherwise restarted.
pub fn next_streak(current: i32, last_activity: DateTime<Utc>, now: DateTime<Utc>) -> i32 {
    let days = (now.date_naive() - last_activity.date_naive()).num_days();
    match days {
        0 => current.max(1),
        1 => current + 1,
        _ => 1,
    }
}

impl Enrollment {
    /// Fresh enrollment with no progress.
    pub fn start(course_id: Uuid, student_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            course_id,
            student_id,
            started_at: now,
            progress_pct: 0.0,
            last_lecture_id: None,
            completed_lectures: Vec::new(),
            xp: 0,
            streak_count: 0,
            last_activity_at: now,
            is_completed: false,
            completed_at: None,
            certificate_url: None,
        }
    }

    pub fn has_completed(&self, lecture_id: Uuid) -> bool {
        self.completed_lectures
            .iter()
            .any(|l| l.lecture_id == lecture_id)
    }

    /// Record progress on a lecture. `progress_pct` must already be within
    /// [0, 100].
    pub fn apply_progress(
        &mut self,
        lecture_id: Uuid,
        progress_pct: f64,
        now: DateTime<Utc>,
    ) -> ProgressOutcome {
        self.progress_pct = progress_pct;
        self.last_lecture_id = Some(lecture_id);

        let lecture_added = !self.has_completed(lecture_id);
        if lecture_added {
            self.completed_lectures.push(CompletedLecture {
                lecture_id,
                completed_at: now,
            });
        }

        let xp_awarded = progress_xp(progress_pct);
        self.xp += xp_awarded;

        self.streak_count = next_streak(self.streak_count, self.last_activity_at, now);
        self.last_activity_at = now;

        let course_completed = progress_pct >= 100.0 && !self.is_completed;
        if course_completed {
            self.is_completed = true;
            self.completed_at = Some(now);
        }

        ProgressOutcome {
            xp_awarded,
            lecture_added,
            course_completed,
        }
    }
}

/// Enrollment together with the course fields a student list needs.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWithCourse {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub course_title: String,
    pub course_slug: String,
    pub course_cover_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_progress_xp_floors() {
        assert_eq!(progress_xp(0.0), 0);
        assert_eq!(progress_xp(9.9), 0);
        assert_eq!(progress_xp(45.0), 4);
        assert_eq!(progress_xp(70.0), 7);
        assert_eq!(progress_xp(100.0), 10);
    }

    #[test]
    fn test_grade_xp() {
        assert_eq!(grade_xp(80.0, 100.0), 40);
        assert_eq!(grade_xp(7.0, 10.0), 35);
        assert_eq!(grade_xp(1.0, 3.0), 16);
        assert_eq!(grade_xp(5.0, 0.0), 0);
    }

    #[test]
    fn test_next_streak() {
        assert_eq!(next_streak(0, at(1, 9), at(1, 20)), 1);
        assert_eq!(next_streak(3, at(1, 9), at(1, 20)), 3);
        assert_eq!(next_streak(3, at(1, 23), at(2, 1)), 4);
        assert_eq!(next_streak(3, at(1, 9), at(4, 9)), 1);
    }

    #[test]
    fn test_apply_progress_appends_lecture_once() {
        let now = at(1, 10);
        let mut enrollment = Enrollment::start(Uuid::new_v4(), Uuid::new_v4(), now);
        let lecture = Uuid::new_v4();

        let first = enrollment.apply_progress(lecture, 30.0, now);
        assert!(first.lecture_added);
        assert_eq!(enrollment.completed_lectures.len(), 1);

        let second = enrollment.apply_progress(lecture, 30.0, now + Duration::minutes(5));
        assert!(!second.lecture_added);
        assert_eq!(enrollment.completed_lectures.len(), 1);
        assert_eq!(enrollment.last_lecture_id, Some(lecture));
    }

    #[test]
    fn test_apply_progress_re_awards_xp_for_same_percentage() {
        let now = at(1, 10);
        let mut enrollment = Enrollment::start(Uuid::new_v4(), Uuid::new_v4(), now);
        let lecture = Uuid::new_v4();

        enrollment.apply_progress(lecture, 50.0, now);
        enrollment.apply_progress(lecture, 50.0, now);
        assert_eq!(enrollment.xp, 10);
    }

    #[test]
    fn test_apply_progress_marks_completion_once() {
        let now = at(1, 10);
        let mut enrollment = Enrollment::start(Uuid::new_v4(), Uuid::new_v4(), now);

        let outcome = enrollment.apply_progress(Uuid::new_v4(), 100.0, now);
        assert!(outcome.course_completed);
        assert!(enrollment.is_completed);
        assert_eq!(enrollment.completed_at, Some(now));

        let later = now + Duration::hours(1);
        let outcome = enrollment.apply_progress(Uuid::new_v4(), 100.0, later);
        assert!(!outcome.course_completed);
        assert_eq!(enrollment.completed_at, Some(now));
    }

    #[test]
    fn test_apply_progress_tracks_streak() {
        let mut enrollment = Enrollment::start(Uuid::new_v4(), Uuid::new_v4(), at(1, 8));
        enrollment.apply_progress(Uuid::new_v4(), 10.0, at(1, 9));
        assert_eq!(enrollment.streak_count, 1);
        enrollment.apply_progress(Uuid::new_v4(), 20.0, at(2, 9));
        assert_eq!(enrollment.streak_count, 2);
        enrollment.apply_progress(Uuid::new_v4(), 30.0, at(5, 9));
        assert_eq!(enrollment.streak_count, 1);
    }
}
