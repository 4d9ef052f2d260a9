//! Live session database entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Attendance, HostType, LiveSession, SessionStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "live_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub start_at: DateTimeUtc,
    pub end_at: DateTimeUtc,
    pub join_link: String,
    pub host_type: String,
    pub instructor_id: Uuid,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Combine the session row with its attendance rows.
    pub fn into_domain(self, attendance: Vec<Attendance>) -> LiveSession {
        LiveSession {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            start_at: self.start_at,
            end_at: self.end_at,
            join_link: self.join_link,
            host_type: HostType::parse(&self.host_type),
            instructor_id: self.instructor_id,
            status: SessionStatus::parse(&self.status),
            attendance,
            created_at: self.created_at,
        }
    }
}
