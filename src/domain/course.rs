//! Course aggregate: metadata, ordered sections of lectures, ownership.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Difficulty level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "intermediate" => CourseLevel::Intermediate,
            "advanced" => CourseLevel::Advanced,
            _ => CourseLevel::Beginner,
        }
    }
}

/// Aggregate rating
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Rating {
    pub average: f64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub id: Uuid,
    pub title: String,
    pub video_url: Option<String>,
    #[serde(default)]
    pub duration_sec: i64,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
}

/// Lecture as submitted by a client; `id` is optional for new lectures.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LectureInput {
    pub id: Option<Uuid>,
    pub title: String,
    pub video_url: Option<String>,
    #[serde(default)]
    pub duration_sec: i64,
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionInput {
    pub title: String,
    #[serde(default)]
    pub lectures: Vec<LectureInput>,
}

/// Turn client-supplied sections into stored sections.
///
/// Existing lecture ids are kept; missing ones are generated. Missing
/// `order` values default to the lecture's position within its section.
pub fn build_sections(input: Vec<SectionInput>) -> Vec<Section> {
    input
        .into_iter()
        .map(|section| Section {
            title: section.title.trim().to_string(),
            lectures: section
                .lectures
                .into_iter()
                .enumerate()
                .map(|(position, lecture)| Lecture {
                    id: lecture.id.unwrap_or_else(Uuid::new_v4),
                    title: lecture.title.trim().to_string(),
                    video_url: lecture.video_url,
                    duration_sec: lecture.duration_sec.max(0),
                    order: lecture.order.unwrap_or(position as i32 + 1),
                })
                .collect(),
        })
        .collect()
}

/// Course domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub tags: BTreeSet<String>,
    pub level: CourseLevel,
    pub language: String,
    pub cover_url: Option<String>,
    pub created_by: Uuid,
    pub assigned_instructor: Option<Uuid>,
    pub sections: Vec<Section>,
    pub is_published: bool,
    pub price: f64,
    pub estimated_hours: f64,
    pub enrollment_count: i64,
    pub rating: Rating,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn lecture_count(&self) -> usize {
        self.sections.iter().map(|s| s.lectures.len()).sum()
    }

    pub fn has_lecture(&self, lecture_id: Uuid) -> bool {
        self.sections
            .iter()
            .flat_map(|s| s.lectures.iter())
            .any(|l| l.id == lecture_id)
    }

    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.assigned_instructor == Some(user_id)
    }
}

/// Fields for a new course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub tags: BTreeSet<String>,
    pub level: CourseLevel,
    pub language: String,
    pub cover_url: Option<String>,
    pub created_by: Uuid,
    pub assigned_instructor: Option<Uuid>,
    pub sections: Vec<Section>,
    pub price: f64,
    pub estimated_hours: f64,
}

/// Partial metadata update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub level: Option<CourseLevel>,
    pub language: Option<String>,
    pub cover_url: Option<String>,
    pub price: Option<f64>,
    pub estimated_hours: Option<f64>,
}

/// Filters for the public catalog.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
    pub search: Option<String>,
}

/// Lowercase, de-duplicated, non-empty tags.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Derive a URL slug: lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("untitled");
    }
    slug
}

/// Candidate slugs in the order they should be tried: `base`, `base-2`, ...
pub fn slug_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((2..).map(move |n| format!("{}-{}", base, n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Intro to Rust!"), "intro-to-rust");
        assert_eq!(slugify("  C++ & Systems -- Part 2 "), "c-systems-part-2");
        assert_eq!(slugify("!!!"), "untitled");
    }

    #[test]
    fn test_slug_candidates() {
        let candidates: Vec<_> = slug_candidates("rust").take(3).collect();
        assert_eq!(candidates, vec!["rust", "rust-2", "rust-3"]);
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(["WebDev", "webdev ", "", "AI"]);
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["ai", "webdev"]);
    }

    #[test]
    fn test_build_sections_keeps_ids_and_fills_order() {
        let existing = Uuid::new_v4();
        let sections = build_sections(vec![SectionInput {
            title: " Basics ".into(),
            lectures: vec![
                LectureInput {
                    id: Some(existing),
                    title: "Hello".into(),
                    video_url: None,
                    duration_sec: 120,
                    order: None,
                },
                LectureInput {
                    id: None,
                    title: "World".into(),
                    video_url: Some("https://cdn.example.com/v.mp4".into()),
                    duration_sec: -5,
                    order: Some(7),
                },
            ],
        }]);

        assert_eq!(sections[0].title, "Basics");
        let lectures = &sections[0].lectures;
        assert_eq!(lectures[0].id, existing);
        assert_eq!(lectures[0].order, 1);
        assert_ne!(lectures[1].id, existing);
        assert_eq!(lectures[1].order, 7);
        assert_eq!(lectures[1].duration_sec, 0);
    }
}
