//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use super::decode_column;
use crate::domain::{Profile, StudentProfile, User, UserRole, UserStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    /// Onboarding answers; NULL until the student onboards
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub student_profile: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            role: UserRole::parse(&model.role),
            status: UserStatus::parse(&model.status),
            profile: Profile {
                first_name: model.first_name,
                last_name: model.last_name,
                avatar_url: model.avatar_url,
                phone: model.phone,
            },
            student_profile: model
                .student_profile
                .and_then(|json| {
                    decode_column::<Option<StudentProfile>>(
                        json,
                        "users",
                        "student_profile",
                        model.id,
                    )
                }),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
