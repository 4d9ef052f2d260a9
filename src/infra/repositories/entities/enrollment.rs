//! Enrollment database entity.

use sea_orm::entity::prelude::*;

use super::decode_column;
use crate::domain::Enrollment;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub started_at: DateTimeUtc,
    pub progress_pct: f64,
    pub last_lecture_id: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub completed_lectures: Json,
    pub xp: i64,
    pub streak_count: i32,
    pub last_activity_at: DateTimeUtc,
    pub is_completed: bool,
    pub completed_at: Option<DateTimeUtc>,
    pub certificate_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Enrollment {
    fn from(model: Model) -> Self {
        Enrollment {
            id: model.id,
            course_id: model.course_id,
            student_id: model.student_id,
            started_at: model.started_at,
            progress_pct: model.progress_pct,
            last_lecture_id: model.last_lecture_id,
            completed_lectures: decode_column(
                model.completed_lectures,
                "enrollments",
                "completed_lectures",
                model.id,
            ),
            xp: model.xp,
            streak_count: model.streak_count,
            last_activity_at: model.last_activity_at,
            is_completed: model.is_completed,
            completed_at: model.completed_at,
            certificate_url: model.certificate_url,
        }
    }
}
