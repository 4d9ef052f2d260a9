//! Submission database entity. One row per (assignment, student).

use sea_orm::entity::prelude::*;

use super::decode_column;
use crate::domain::{Submission, SubmissionStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub text: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub files: Json,
    pub submitted_at: DateTimeUtc,
    pub score: Option<f64>,
    pub max_score: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub status: String,
    pub graded_by: Option<Uuid>,
    pub graded_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Submission {
    fn from(model: Model) -> Self {
        Submission {
            id: model.id,
            assignment_id: model.assignment_id,
            student_id: model.student_id,
            text: model.text,
            files: decode_column(model.files, "submissions", "files", model.id),
            submitted_at: model.submitted_at,
            score: model.score,
            max_score: model.max_score,
            feedback: model.feedback,
            status: SubmissionStatus::parse(&model.status),
            graded_by: model.graded_by,
            graded_at: model.graded_at,
        }
    }
}
