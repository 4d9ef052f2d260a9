//! Recommendation scoring.
//!
//! Courses are ranked by overlap between their tags and the student's
//! declared domains, nudged by pace fit, popularity and rating. Products are
//! filtered by categories mapped from the same domains; there is no ranking
//! beyond the store's rating/recency order.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::course::Course;
use super::product::Product;
use super::user::{LearningPace, StudentProfile};
use crate::config::{BASELINE_PRODUCT_CATEGORIES, MAX_COURSE_RECOMMENDATIONS};

/// Fixed mapping from study domain to storefront categories.
const DOMAIN_CATEGORIES: &[(&str, &[&str])] = &[
    ("webdev", &["headphones", "monitor", "keyboard", "mouse"]),
    ("appdev", &["smartphone", "chargers", "cables", "tablet"]),
    ("datascience", &["monitor", "keyboard", "books", "laptop-stand"]),
    ("ai", &["laptop-stand", "monitor", "books", "keyboard"]),
    ("design", &["stylus", "tablet", "monitor", "sketchbook"]),
    ("cybersecurity", &["books", "keyboard", "usb-drives"]),
    ("gamedev", &["headphones", "mouse", "controller", "monitor"]),
    ("cloud", &["books", "monitor", "webcam"]),
];

/// Storefront categories mapped from one domain (empty when unknown).
pub fn categories_for_domain(domain: &str) -> &'static [&'static str] {
    DOMAIN_CATEGORIES
        .iter()
        .find(|(name, _)| *name == domain)
        .map(|(_, categories)| *categories)
        .unwrap_or(&[])
}

/// Union of mapped categories and the baseline set, de-duplicated.
pub fn product_categories(profile: &StudentProfile) -> Vec<String> {
    let mut categories: BTreeSet<&str> = BASELINE_PRODUCT_CATEGORIES.iter().copied().collect();
    for domain in &profile.domains {
        categories.extend(categories_for_domain(domain.as_str()));
    }
    categories.into_iter().map(str::to_string).collect()
}

/// Number of course tags that match the student's domains.
pub fn matching_tags(course: &Course, profile: &StudentProfile) -> usize {
    course
        .tags
        .iter()
        .filter(|tag| profile.domains.contains(tag.as_str()))
        .count()
}

/// Score a candidate course for a student.
pub fn course_score(course: &Course, profile: &StudentProfile) -> f64 {
    let mut score = 10.0 * matching_tags(course, profile) as f64;

    match profile.learning_pace {
        LearningPace::Intensive if course.estimated_hours > 20.0 => score += 5.0,
        LearningPace::Slow if course.estimated_hours <= 10.0 => score += 5.0,
        _ => {}
    }

    score += 0.1 * course.enrollment_count as f64;
    score += 2.0 * course.rating.average;
    score
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCourse {
    #[serde(flatten)]
    pub course: Course,
    pub score: f64,
}

/// Pick the top courses for a student from `candidates`.
///
/// Drops unpublished courses, courses in `enrolled`, and courses with no tag
/// in the student's domains. Ties keep the order of `candidates`.
pub fn rank_courses(
    candidates: Vec<Course>,
    profile: &StudentProfile,
    enrolled: &HashSet<Uuid>,
) -> Vec<ScoredCourse> {
    if profile.domains.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredCourse> = candidates
        .into_iter()
        .filter(|c| c.is_published && !enrolled.contains(&c.id))
        .filter(|c| matching_tags(c, profile) > 0)
        .map(|course| {
            let score = course_score(&course, profile);
            ScoredCourse { course, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(MAX_COURSE_RECOMMENDATIONS);
    scored
}

/// Recommendation payload.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct Recommendations {
    pub courses: Vec<ScoredCourse>,
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::{CourseLevel, Rating};
    use chrono::Utc;

    fn course(title: &str, tags: &[&str], hours: f64, enrollments: i64, rating: f64) -> Course {
        Course {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: title.to_lowercase(),
            description: String::new(),
            category: "programming".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            level: CourseLevel::Beginner,
            language: "en".into(),
            cover_url: None,
            created_by: Uuid::new_v4(),
            assigned_instructor: None,
            sections: vec![],
            is_published: true,
            price: 0.0,
            estimated_hours: hours,
            enrollment_count: enrollments,
            rating: Rating {
                average: rating,
                count: 1,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn profile(domains: &[&str], pace: LearningPace) -> StudentProfile {
        StudentProfile {
            domains: domains.iter().map(|d| d.to_string()).collect(),
            learning_pace: pace,
            onboarded: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_course_score_formula() {
        let p = profile(&["webdev", "ai"], LearningPace::Intensive);
        let c = course("Fullstack", &["webdev", "ai", "databases"], 30.0, 50, 4.5);
        // 10*2 + 5 + 0.1*50 + 2*4.5
        assert!((course_score(&c, &p) - 39.0).abs() < 1e-9);
    }

    #[test]
    fn test_slow_pace_bonus_applies_to_short_courses() {
        let p = profile(&["webdev"], LearningPace::Slow);
        let short = course("Short", &["webdev"], 10.0, 0, 0.0);
        let long = course("Long", &["webdev"], 10.5, 0, 0.0);
        assert!((course_score(&short, &p) - 15.0).abs() < 1e-9);
        assert!((course_score(&long, &p) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_courses_filters_and_limits() {
        let p = profile(&["webdev"], LearningPace::Medium);
        let enrolled_course = course("Enrolled", &["webdev"], 5.0, 0, 5.0);
        let mut draft = course("Draft", &["webdev"], 5.0, 0, 5.0);
        draft.is_published = false;
        let unrelated = course("Cooking", &["food"], 5.0, 1000, 5.0);

        let mut candidates = vec![enrolled_course.clone(), draft, unrelated];
        for i in 0..6 {
            candidates.push(course(&format!("Web {}", i), &["webdev"], 5.0, i, 0.0));
        }

        let enrolled: HashSet<Uuid> = [enrolled_course.id].into_iter().collect();
        let ranked = rank_courses(candidates, &p, &enrolled);

        assert_eq!(ranked.len(), 4);
        assert!(ranked.iter().all(|s| s.course.is_published));
        assert!(ranked.iter().all(|s| s.course.id != enrolled_course.id));
        assert!(ranked.iter().all(|s| s.course.tags.contains("webdev")));
        assert_eq!(ranked[0].course.title, "Web 5");
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_rank_courses_ties_keep_input_order() {
        let p = profile(&["webdev"], LearningPace::Medium);
        let a = course("A", &["webdev"], 5.0, 0, 0.0);
        let b = course("B", &["webdev"], 5.0, 0, 0.0);
        let ranked = rank_courses(vec![a, b], &p, &HashSet::new());
        assert_eq!(ranked[0].course.title, "A");
        assert_eq!(ranked[1].course.title, "B");
    }

    #[test]
    fn test_rank_courses_empty_domains() {
        let p = profile(&[], LearningPace::Medium);
        let c = course("Anything", &["webdev"], 5.0, 0, 5.0);
        assert!(rank_courses(vec![c], &p, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_product_categories_union_with_baseline() {
        let p = profile(&["webdev"], LearningPace::Medium);
        let categories = product_categories(&p);
        for expected in ["headphones", "stylus", "chargers", "cables", "monitor", "keyboard", "mouse"] {
            assert!(categories.iter().any(|c| c == expected), "missing {}", expected);
        }
        assert_eq!(categories.len(), 7);
    }

    #[test]
    fn test_unknown_domain_maps_to_nothing() {
        assert!(categories_for_domain("basket-weaving").is_empty());
        let p = profile(&["basket-weaving"], LearningPace::Medium);
        assert_eq!(product_categories(&p).len(), BASELINE_PRODUCT_CATEGORIES.len());
    }
}
