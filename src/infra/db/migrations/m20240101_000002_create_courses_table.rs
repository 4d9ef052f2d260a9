//! Migration: Create courses table.
//!
//! Tags and the section/lecture tree are stored as JSONB on the course row.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Courses::Description).text().not_null())
                    .col(ColumnDef::new(Courses::Category).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Courses::Tags)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Courses::Level).string_len(20).not_null())
                    .col(ColumnDef::new(Courses::Language).string_len(16).not_null())
                    .col(ColumnDef::new(Courses::CoverUrl).string().null())
                    .col(ColumnDef::new(Courses::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Courses::AssignedInstructor).uuid().null())
                    .col(
                        ColumnDef::new(Courses::Sections)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Courses::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Courses::Price).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Courses::EstimatedHours)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Courses::EnrollmentCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Courses::RatingAverage)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Courses::RatingCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Courses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courses_assigned_instructor")
                            .from(Courses::Table, Courses::AssignedInstructor)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_published_category")
                    .table(Courses::Table)
                    .col(Courses::IsPublished)
                    .col(Courses::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_assigned_instructor")
                    .table(Courses::Table)
                    .col(Courses::AssignedInstructor)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Courses {
    Table,
    Id,
    Title,
    Slug,
    Description,
    Category,
    Tags,
    Level,
    Language,
    CoverUrl,
    CreatedBy,
    AssignedInstructor,
    Sections,
    IsPublished,
    Price,
    EstimatedHours,
    EnrollmentCount,
    RatingAverage,
    RatingCount,
    CreatedAt,
    UpdatedAt,
}
