//! Live session and attendance repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::attendance::{self, Entity as AttendanceEntity};
use super::entities::live_session::{self, Entity as LiveSessionEntity};
use crate::domain::{
    Attendance, AttendanceStatus, LiveSession, NewLiveSession, SessionStatus,
};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LiveSessionRepository: Send + Sync {
    async fn create(&self, session: NewLiveSession) -> AppResult<LiveSession>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<LiveSession>>;

    /// Sessions of a course ordered by start time
    async fn list_by_course(&self, course_id: Uuid) -> AppResult<Vec<LiveSession>>;

    async fn update_status(&self, id: Uuid, status: SessionStatus) -> AppResult<LiveSession>;

    /// Insert or overwrite the student's attendance row
    async fn mark_attendance(
        &self,
        session_id: Uuid,
        student_id: Uuid,
        status: AttendanceStatus,
        marked_at: DateTime<Utc>,
    ) -> AppResult<LiveSession>;

    /// Scheduled sessions of the given courses starting after `after`
    async fn upcoming_for_courses(
        &self,
        course_ids: Vec<Uuid>,
        after: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<LiveSession>>;
}

pub struct LiveSessionStore {
    db: Arc<DatabaseConnection>,
}

impl LiveSessionStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Attach attendance rows to each session, preserving session order.
    async fn with_attendance(&self, sessions: Vec<live_session::Model>) -> AppResult<Vec<LiveSession>> {
        if sessions.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();
        let rows = AttendanceEntity::find()
            .filter(attendance::Column::SessionId.is_in(ids))
            .order_by_asc(attendance::Column::MarkedAt)
            .all(self.db.as_ref())
            .await?;

        let mut by_session: HashMap<Uuid, Vec<Attendance>> = HashMap::new();
        for row in rows {
            by_session
                .entry(row.session_id)
                .or_default()
                .push(Attendance::from(row));
        }

        Ok(sessions
            .into_iter()
            .map(|s| {
                let attendance = by_session.remove(&s.id).unwrap_or_default();
                s.into_domain(attendance)
            })
            .collect())
    }

    async fn load(&self, id: Uuid) -> AppResult<LiveSession> {
        let model = LiveSessionEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Live session")?;

        self.with_attendance(vec![model])
            .await?
            .pop()
            .ok_or_not_found("Live session")
    }
}

#[async_trait]
impl LiveSessionRepository for LiveSessionStore {
    async fn create(&self, session: NewLiveSession) -> AppResult<LiveSession> {
        let active_model = live_session::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(session.course_id),
            title: Set(session.title),
            start_at: Set(session.start_at),
            end_at: Set(session.end_at),
            join_link: Set(session.join_link),
            host_type: Set(session.host_type.as_str().to_string()),
            instructor_id: Set(session.instructor_id),
            status: Set(SessionStatus::Scheduled.as_str().to_string()),
            created_at: Set(Utc::now()),
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(model.into_domain(Vec::new()))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<LiveSession>> {
        let Some(model) = LiveSessionEntity::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };
        Ok(self.with_attendance(vec![model]).await?.pop())
    }

    async fn list_by_course(&self, course_id: Uuid) -> AppResult<Vec<LiveSession>> {
        let models = LiveSessionEntity::find()
            .filter(live_session::Column::CourseId.eq(course_id))
            .order_by_asc(live_session::Column::StartAt)
            .all(self.db.as_ref())
            .await?;
        self.with_attendance(models).await
    }

    async fn update_status(&self, id: Uuid, status: SessionStatus) -> AppResult<LiveSession> {
        let model = LiveSessionEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("Live session")?;

        let mut active: live_session::ActiveModel = model.into();
        active.status = Set(status.as_str().to_string());
        active.update(self.db.as_ref()).await?;

        self.load(id).await
    }

    async fn mark_attendance(
        &self,
        session_id: Uuid,
        student_id: Uuid,
        status: AttendanceStatus,
        marked_at: DateTime<Utc>,
    ) -> AppResult<LiveSession> {
        let row = attendance::ActiveModel {
            session_id: Set(session_id),
            student_id: Set(student_id),
            status: Set(status.as_str().to_string()),
            marked_at: Set(marked_at),
        };

        AttendanceEntity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    attendance::Column::SessionId,
                    attendance::Column::StudentId,
                ])
                .update_columns([attendance::Column::Status, attendance::Column::MarkedAt])
                .to_owned(),
            )
            .exec(self.db.as_ref())
            .await?;

        self.load(session_id).await
    }

    async fn upcoming_for_courses(
        &self,
        course_ids: Vec<Uuid>,
        after: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<LiveSession>> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = LiveSessionEntity::find()
            .filter(live_session::Column::CourseId.is_in(course_ids))
            .filter(live_session::Column::Status.eq(SessionStatus::Scheduled.as_str()))
            .filter(live_session::Column::StartAt.gte(after))
            .order_by_asc(live_session::Column::StartAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;
        self.with_attendance(models).await
    }
}
