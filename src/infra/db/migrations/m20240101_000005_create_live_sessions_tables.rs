//! Migration: Create live_sessions and session_attendance tables.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_courses_table::Courses;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LiveSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LiveSessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LiveSessions::CourseId).uuid().not_null())
                    .col(ColumnDef::new(LiveSessions::Title).string().not_null())
                    .col(
                        ColumnDef::new(LiveSessions::StartAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LiveSessions::EndAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LiveSessions::JoinLink).string().not_null())
                    .col(ColumnDef::new(LiveSessions::HostType).string_len(20).not_null())
                    .col(ColumnDef::new(LiveSessions::InstructorId).uuid().not_null())
                    .col(
                        ColumnDef::new(LiveSessions::Status)
                            .string_len(20)
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(
                        ColumnDef::new(LiveSessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_live_sessions_course")
                            .from(LiveSessions::Table, LiveSessions::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_live_sessions_course_start")
                    .table(LiveSessions::Table)
                    .col(LiveSessions::CourseId)
                    .col(LiveSessions::StartAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SessionAttendance::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SessionAttendance::SessionId).uuid().not_null())
                    .col(ColumnDef::new(SessionAttendance::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(SessionAttendance::Status)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionAttendance::MarkedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // One attendance row per (session, student)
                    .primary_key(
                        Index::create()
                            .col(SessionAttendance::SessionId)
                            .col(SessionAttendance::StudentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_attendance_session")
                            .from(SessionAttendance::Table, SessionAttendance::SessionId)
                            .to(LiveSessions::Table, LiveSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_attendance_student")
                            .from(SessionAttendance::Table, SessionAttendance::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SessionAttendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LiveSessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LiveSessions {
    Table,
    Id,
    CourseId,
    Title,
    StartAt,
    EndAt,
    JoinLink,
    HostType,
    InstructorId,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum SessionAttendance {
    Table,
    SessionId,
    StudentId,
    Status,
    MarkedAt,
}
