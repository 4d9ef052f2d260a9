//! Live session service - scheduling and attendance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::policy::{self, Action};
use crate::domain::{
    Actor, AttendanceStatus, Course, HostType, LiveSession, NewLiveSession, SessionStatus,
    UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone)]
pub struct SessionDraft {
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub join_link: String,
    pub host_type: HostType,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LiveSessionService: Send + Sync {
    async fn schedule(
        &self,
        actor: Actor,
        course_id: Uuid,
        draft: SessionDraft,
    ) -> AppResult<LiveSession>;

    /// Sessions of a course ordered by start time. Visible to enrolled
    /// students and course staff.
    async fn list_for_course(&self, actor: Actor, course_id: Uuid) -> AppResult<Vec<LiveSession>>;

    async fn update_status(
        &self,
        actor: Actor,
        session_id: Uuid,
        status: SessionStatus,
    ) -> AppResult<LiveSession>;

    async fn mark_attendance(
        &self,
        actor: Actor,
        session_id: Uuid,
        student_id: Uuid,
        status: AttendanceStatus,
    ) -> AppResult<LiveSession>;
}

pub struct LiveSessionManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> LiveSessionManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn course(&self, id: Uuid) -> AppResult<Course> {
        self.uow.courses().find_by_id(id).await?.ok_or_not_found("Course")
    }

    /// Load a session and check that the caller manages its course.
    async fn managed(&self, actor: &Actor, session_id: Uuid) -> AppResult<LiveSession> {
        let session = self
            .uow
            .live_sessions()
            .find_by_id(session_id)
            .await?
            .ok_or_not_found("Live session")?;
        let course = self.course(session.course_id).await?;
        policy::authorize_course(actor, Action::ManageLiveSessions, &course)?;
        Ok(session)
    }

    async fn is_enrolled(&self, course_id: Uuid, student_id: Uuid) -> AppResult<bool> {
        Ok(self
            .uow
            .enrollments()
            .find(course_id, student_id)
            .await?
            .is_some())
    }
}

#[async_trait]
impl<U: UnitOfWork> LiveSessionService for LiveSessionManager<U> {
    async fn schedule(
        &self,
        actor: Actor,
        course_id: Uuid,
        draft: SessionDraft,
    ) -> AppResult<LiveSession> {
        let course = self.course(course_id).await?;
        policy::authorize_course(&actor, Action::ManageLiveSessions, &course)?;

        if draft.start_at >= draft.end_at {
            return Err(AppError::validation("startAt must be before endAt"));
        }

        let session = self
            .uow
            .live_sessions()
            .create(NewLiveSession {
                course_id,
                title: draft.title.trim().to_string(),
                start_at: draft.start_at,
                end_at: draft.end_at,
                join_link: draft.join_link,
                host_type: draft.host_type,
                instructor_id: course.assigned_instructor.unwrap_or(actor.id),
            })
            .await?;

        tracing::info!(session_id = %session.id, course_id = %course_id, "Live session scheduled");
        Ok(session)
    }

    async fn list_for_course(&self, actor: Actor, course_id: Uuid) -> AppResult<Vec<LiveSession>> {
        let course = self.course(course_id).await?;

        if actor.role == UserRole::Student {
            if !self.is_enrolled(course_id, actor.id).await? {
                return Err(AppError::forbidden("You are not enrolled in this course"));
            }
        } else {
            policy::authorize_course(&actor, Action::ManageLiveSessions, &course)?;
        }

        self.uow.live_sessions().list_by_course(course_id).await
    }

    async fn update_status(
        &self,
        actor: Actor,
        session_id: Uuid,
        status: SessionStatus,
    ) -> AppResult<LiveSession> {
        self.managed(&actor, session_id).await?;

        let session = self.uow.live_sessions().update_status(session_id, status).await?;
        tracing::info!(session_id = %session_id, status = status.as_str(), "Live session status changed");
        Ok(session)
    }

    async fn mark_attendance(
        &self,
        actor: Actor,
        session_id: Uuid,
        student_id: Uuid,
        status: AttendanceStatus,
    ) -> AppResult<LiveSession> {
        let session = self.managed(&actor, session_id).await?;

        if !self.is_enrolled(session.course_id, student_id).await? {
            return Err(AppError::validation("Student is not enrolled in this course"));
        }

        self.uow
            .live_sessions()
            .mark_attendance(session_id, student_id, status, Utc::now())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Attendance;
    use crate::infra::{MockCourseRepository, MockEnrollmentRepository, MockLiveSessionRepository};
    use crate::services::testing::{course, enrollment, MockUow, MockedPersistence};
    use chrono::Duration;

    fn session(course_id: Uuid, instructor_id: Uuid) -> LiveSession {
        LiveSession {
            id: Uuid::new_v4(),
            course_id,
            title: "Office hours".into(),
            start_at: Utc::now() + Duration::days(1),
            end_at: Utc::now() + Duration::days(1) + Duration::hours(1),
            join_link: "https://meet.example.com/abc".into(),
            host_type: HostType::Gmeet,
            instructor_id,
            status: SessionStatus::Scheduled,
            attendance: vec![],
            created_at: Utc::now(),
        }
    }

    fn draft(start_offset_hours: i64, end_offset_hours: i64) -> SessionDraft {
        let base = Utc::now() + Duration::days(1);
        SessionDraft {
            title: "Office hours".into(),
            start_at: base + Duration::hours(start_offset_hours),
            end_at: base + Duration::hours(end_offset_hours),
            join_link: "https://meet.example.com/abc".into(),
            host_type: HostType::Zoom,
        }
    }

    fn courses_returning(course: Course) -> MockCourseRepository {
        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_by_id()
            .returning(move |_| Ok(Some(course.clone())));
        courses
    }

    #[tokio::test]
    async fn test_admin_schedules_for_assigned_instructor() {
        let bob = Uuid::new_v4();
        let owned = course(Some(bob));
        let course_id = owned.id;

        let mut live_sessions = MockLiveSessionRepository::new();
        live_sessions
            .expect_create()
            .withf(move |s| s.instructor_id == bob)
            .times(1)
            .returning(move |s| Ok(session(s.course_id, s.instructor_id)));

        let svc = LiveSessionManager::new(
            MockUow {
                courses: courses_returning(owned),
                live_sessions,
                ..Default::default()
            }
            .build(),
        );
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        let scheduled = svc.schedule(admin, course_id, draft(0, 1)).await.unwrap();
        assert_eq!(scheduled.instructor_id, bob);
    }

    #[tokio::test]
    async fn test_schedule_rejects_inverted_times() {
        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let mut live_sessions = MockLiveSessionRepository::new();
        live_sessions.expect_create().never();

        let svc = LiveSessionManager::new(
            MockUow {
                courses: courses_returning(course(Some(bob.id))),
                live_sessions,
                ..Default::default()
            }
            .build(),
        );
        let err = svc.schedule(bob, Uuid::new_v4(), draft(2, 1)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    fn attendance_service(enrolled: bool) -> (Actor, LiveSessionManager<MockedPersistence>) {
        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let owned = course(Some(bob.id));
        let existing = session(owned.id, bob.id);

        let mut live_sessions = MockLiveSessionRepository::new();
        let found = existing.clone();
        live_sessions
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        live_sessions
            .expect_mark_attendance()
            .times(if enrolled { 1 } else { 0 })
            .returning(move |_, student_id, status, marked_at| {
                let mut s = existing.clone();
                s.attendance.push(Attendance {
                    student_id,
                    status,
                    marked_at,
                });
                Ok(s)
            });

        let mut enrollments = MockEnrollmentRepository::new();
        enrollments
            .expect_find()
            .returning(move |c, s| Ok(enrolled.then(|| enrollment(c, s))));

        let svc = LiveSessionManager::new(
            MockUow {
                courses: courses_returning(owned),
                live_sessions,
                enrollments,
                ..Default::default()
            }
            .build(),
        );
        (bob, svc)
    }

    #[tokio::test]
    async fn test_mark_attendance_for_enrolled_student() {
        let (bob, svc) = attendance_service(true);
        let student = Uuid::new_v4();
        let updated = svc
            .mark_attendance(bob, Uuid::new_v4(), student, AttendanceStatus::Present)
            .await
            .unwrap();
        assert_eq!(updated.attendance.len(), 1);
        assert_eq!(updated.attendance[0].student_id, student);
    }

    #[tokio::test]
    async fn test_mark_attendance_rejects_unenrolled_student() {
        let (bob, svc) = attendance_service(false);
        let err = svc
            .mark_attendance(bob, Uuid::new_v4(), Uuid::new_v4(), AttendanceStatus::Absent)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_other_instructor_cannot_change_status() {
        let (_, svc) = attendance_service(true);
        let carol = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let err = svc
            .update_status(carol, Uuid::new_v4(), SessionStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
