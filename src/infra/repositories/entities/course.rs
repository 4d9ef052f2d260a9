//! Course database entity. Tags and the section/lecture tree are JSON
//! columns owned by the course row.

use sea_orm::entity::prelude::*;

use super::decode_column;
use crate::domain::{Course, CourseLevel, Rating};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub level: String,
    pub language: String,
    pub cover_url: Option<String>,
    pub created_by: Uuid,
    pub assigned_instructor: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub sections: Json,
    pub is_published: bool,
    pub price: f64,
    pub estimated_hours: f64,
    pub enrollment_count: i64,
    pub rating_average: f64,
    pub rating_count: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignments,
    #[sea_orm(has_many = "super::live_session::Entity")]
    LiveSessions,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::live_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LiveSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Course {
    fn from(model: Model) -> Self {
        Course {
            id: model.id,
            title: model.title,
            slug: model.slug,
            description: model.description,
            category: model.category,
            tags: decode_column(model.tags, "courses", "tags", model.id),
            level: CourseLevel::parse(&model.level),
            language: model.language,
            cover_url: model.cover_url,
            created_by: model.created_by,
            assigned_instructor: model.assigned_instructor,
            sections: decode_column(model.sections, "courses", "sections", model.id),
            is_published: model.is_published,
            price: model.price,
            estimated_hours: model.estimated_hours,
            enrollment_count: model.enrollment_count,
            rating: Rating {
                average: model.rating_average,
                count: model.rating_count,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
