//! Scheduled live sessions and attendance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HostType {
    Gmeet,
    Zoom,
    Youtube,
    Internal,
}

impl HostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostType::Gmeet => "gmeet",
            HostType::Zoom => "zoom",
            HostType::Youtube => "youtube",
            HostType::Internal => "internal",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "gmeet" => HostType::Gmeet,
            "zoom" => HostType::Zoom,
            "youtube" => HostType::Youtube,
            _ => HostType::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Scheduled,
    Live,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Live => "live",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "live" => SessionStatus::Live,
            "completed" => SessionStatus::Completed,
            "cancelled" => SessionStatus::Cancelled,
            _ => SessionStatus::Scheduled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "present" => AttendanceStatus::Present,
            "late" => AttendanceStatus::Late,
            _ => AttendanceStatus::Absent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
    pub marked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiveSession {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub join_link: String,
    pub host_type: HostType,
    pub instructor_id: Uuid,
    pub status: SessionStatus,
    pub attendance: Vec<Attendance>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLiveSession {
    pub course_id: Uuid,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub join_link: String,
    pub host_type: HostType,
    pub instructor_id: Uuid,
}
