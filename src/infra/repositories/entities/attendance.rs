//! Attendance database entity. One row per (session, student).

use sea_orm::entity::prelude::*;

use crate::domain::{Attendance, AttendanceStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "session_attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: Uuid,
    pub status: String,
    pub marked_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::live_session::Entity",
        from = "Column::SessionId",
        to = "super::live_session::Column::Id"
    )]
    Session,
}

impl Related<super::live_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Attendance {
    fn from(model: Model) -> Self {
        Attendance {
            student_id: model.student_id,
            status: AttendanceStatus::parse(&model.status),
            marked_at: model.marked_at,
        }
    }
}
