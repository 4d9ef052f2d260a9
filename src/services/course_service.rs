//! Course service - catalog reads and course authoring.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::course::{build_sections, normalize_tags, slug_candidates, slugify};
use crate::domain::policy::{self, Action};
use crate::domain::{
    Actor, Course, CourseChanges, CourseFilter, CourseLevel, NewCourse, SectionInput, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fields for a new course.
#[derive(Debug, Clone, Default)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub level: CourseLevel,
    pub language: String,
    pub cover_url: Option<String>,
    pub price: f64,
    pub estimated_hours: f64,
    pub sections: Vec<SectionInput>,
}

/// Partial metadata update.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub level: Option<CourseLevel>,
    pub language: Option<String>,
    pub cover_url: Option<String>,
    pub price: Option<f64>,
    pub estimated_hours: Option<f64>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CourseService: Send + Sync {
    /// Public catalog page
    async fn list_published(
        &self,
        filter: CourseFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Course>, u64)>;

    async fn get_published(&self, id: Uuid) -> AppResult<Course>;

    async fn get_published_by_slug(&self, slug: &str) -> AppResult<Course>;

    async fn create(&self, actor: Actor, draft: CourseDraft) -> AppResult<Course>;

    async fn update(&self, actor: Actor, id: Uuid, update: CourseUpdate) -> AppResult<Course>;

    /// Replace the whole section/lecture tree
    async fn update_structure(
        &self,
        actor: Actor,
        id: Uuid,
        sections: Vec<SectionInput>,
    ) -> AppResult<Course>;

    async fn set_published(&self, actor: Actor, id: Uuid, published: bool) -> AppResult<Course>;

    async fn assign_instructor(
        &self,
        actor: Actor,
        id: Uuid,
        instructor_id: Uuid,
    ) -> AppResult<Course>;

    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()>;

    /// Courses the caller teaches; every course for admins
    async fn teaching_courses(&self, actor: Actor) -> AppResult<Vec<Course>>;
}

pub struct CourseManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CourseManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find(&self, id: Uuid) -> AppResult<Course> {
        self.uow.courses().find_by_id(id).await?.ok_or_not_found("Course")
    }

    /// Load a course and check `action` against it.
    async fn authorized(&self, actor: &Actor, action: Action, id: Uuid) -> AppResult<Course> {
        let course = self.find(id).await?;
        policy::authorize_course(actor, action, &course)?;
        Ok(course)
    }

    async fn unique_slug(&self, title: &str, except: Option<Uuid>) -> AppResult<String> {
        let courses = self.uow.courses();
        first_free_slug(&slugify(title), |candidate| {
            let courses = courses.clone();
            async move { courses.slug_exists(&candidate, except).await }
        })
        .await
    }
}

/// First of `base`, `base-2`, `base-3`, ... for which `taken` is false.
pub(crate) async fn first_free_slug<F, Fut>(base: &str, mut taken: F) -> AppResult<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    for candidate in slug_candidates(base) {
        if !taken(candidate.clone()).await? {
            return Ok(candidate);
        }
    }
    Err(AppError::internal("Slug candidates exhausted"))
}

fn check_amounts(price: Option<f64>, estimated_hours: Option<f64>) -> AppResult<()> {
    if price.is_some_and(|p| p < 0.0) {
        return Err(AppError::validation("Price cannot be negative"));
    }
    if estimated_hours.is_some_and(|h| h < 0.0) {
        return Err(AppError::validation("Estimated hours cannot be negative"));
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> CourseService for CourseManager<U> {
    async fn list_published(
        &self,
        filter: CourseFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Course>, u64)> {
        self.uow.courses().list_published(&filter, &params).await
    }

    async fn get_published(&self, id: Uuid) -> AppResult<Course> {
        self.uow
            .courses()
            .find_by_id(id)
            .await?
            .filter(|c| c.is_published)
            .ok_or_not_found("Course")
    }

    async fn get_published_by_slug(&self, slug: &str) -> AppResult<Course> {
        self.uow
            .courses()
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_not_found("Course")
    }

    async fn create(&self, actor: Actor, draft: CourseDraft) -> AppResult<Course> {
        policy::authorize(&actor, Action::CreateCourse)?;
        check_amounts(Some(draft.price), Some(draft.estimated_hours))?;

        let title = draft.title.trim().to_string();
        let slug = self.unique_slug(&title, None).await?;
        let assigned_instructor = (actor.role == UserRole::Instructor).then_some(actor.id);

        let course = self
            .uow
            .courses()
            .create(NewCourse {
                title,
                slug,
                description: draft.description,
                category: draft.category.trim().to_lowercase(),
                tags: normalize_tags(&draft.tags),
                level: draft.level,
                language: draft.language,
                cover_url: draft.cover_url,
                created_by: actor.id,
                assigned_instructor,
                sections: build_sections(draft.sections),
                price: draft.price,
                estimated_hours: draft.estimated_hours,
            })
            .await?;

        tracing::info!(course_id = %course.id, slug = %course.slug, by = %actor.id, "Course created");
        Ok(course)
    }

    async fn update(&self, actor: Actor, id: Uuid, update: CourseUpdate) -> AppResult<Course> {
        let course = self.authorized(&actor, Action::EditCourse, id).await?;
        check_amounts(update.price, update.estimated_hours)?;

        let title = update.title.map(|t| t.trim().to_string());
        let slug = match &title {
            Some(t) if *t != course.title => Some(self.unique_slug(t, Some(id)).await?),
            _ => None,
        };

        let changes = CourseChanges {
            title,
            slug,
            description: update.description,
            category: update.category.map(|c| c.trim().to_lowercase()),
            tags: update.tags.map(normalize_tags),
            level: update.level,
            language: update.language,
            cover_url: update.cover_url,
            price: update.price,
            estimated_hours: update.estimated_hours,
        };

        self.uow.courses().update(id, changes).await
    }

    async fn update_structure(
        &self,
        actor: Actor,
        id: Uuid,
        sections: Vec<SectionInput>,
    ) -> AppResult<Course> {
        self.authorized(&actor, Action::EditCourse, id).await?;

        let course = self
            .uow
            .courses()
            .replace_sections(id, build_sections(sections))
            .await?;
        tracing::debug!(course_id = %id, lectures = course.lecture_count(), "Course structure replaced");
        Ok(course)
    }

    async fn set_published(&self, actor: Actor, id: Uuid, published: bool) -> AppResult<Course> {
        self.authorized(&actor, Action::EditCourse, id).await?;

        let course = self.uow.courses().set_published(id, published).await?;
        tracing::info!(course_id = %id, published, "Course publication changed");
        Ok(course)
    }

    async fn assign_instructor(
        &self,
        actor: Actor,
        id: Uuid,
        instructor_id: Uuid,
    ) -> AppResult<Course> {
        self.authorized(&actor, Action::AssignInstructor, id).await?;

        let instructor = self
            .uow
            .users()
            .find_by_id(instructor_id)
            .await?
            .ok_or_not_found("User")?;
        if instructor.role != UserRole::Instructor {
            return Err(AppError::validation("Assignee must be an instructor"));
        }

        let course = self.uow.courses().assign_instructor(id, instructor_id).await?;
        tracing::info!(course_id = %id, instructor = %instructor_id, "Instructor assigned");
        Ok(course)
    }

    async fn delete(&self, actor: Actor, id: Uuid) -> AppResult<()> {
        policy::authorize(&actor, Action::DeleteCourse)?;
        self.uow.courses().delete(id).await?;
        tracing::info!(course_id = %id, by = %actor.id, "Course deleted");
        Ok(())
    }

    async fn teaching_courses(&self, actor: Actor) -> AppResult<Vec<Course>> {
        policy::authorize(&actor, Action::ViewTeachingCourses)?;
        let courses = self.uow.courses();
        if actor.is_admin() {
            courses.list_all().await
        } else {
            courses.list_assigned_to(actor.id).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockCourseRepository, MockUserRepository};
    use crate::services::testing::{course, user, MockUow, MockedPersistence};

    fn service(mocks: MockUow) -> CourseManager<MockedPersistence> {
        CourseManager::new(mocks.build())
    }

    fn draft(title: &str) -> CourseDraft {
        CourseDraft {
            title: title.into(),
            category: "Programming".into(),
            tags: vec!["Rust".into(), "rust".into(), "Systems".into()],
            language: "en".into(),
            estimated_hours: 12.0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_instructor_becomes_assigned_instructor() {
        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let mut courses = MockCourseRepository::new();
        courses.expect_slug_exists().returning(|_, _| Ok(false));
        courses
            .expect_create()
            .withf(move |c| {
                c.assigned_instructor == Some(bob.id)
                    && c.created_by == bob.id
                    && c.slug == "intro-to-rust"
                    && c.category == "programming"
                    && c.tags.len() == 2
            })
            .times(1)
            .returning(|_| Ok(course(None)));

        let svc = service(MockUow {
            courses,
            ..Default::default()
        });
        assert!(svc.create(bob, draft("Intro to Rust")).await.is_ok());
    }

    #[tokio::test]
    async fn test_student_cannot_create_course() {
        let mut courses = MockCourseRepository::new();
        courses.expect_create().never();

        let svc = service(MockUow {
            courses,
            ..Default::default()
        });
        let student = Actor::new(Uuid::new_v4(), UserRole::Student);
        let err = svc.create(student, draft("Nope")).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_slug_collision_gets_suffix() {
        let mut courses = MockCourseRepository::new();
        courses
            .expect_slug_exists()
            .returning(|slug, _| Ok(slug == "intro-to-rust" || slug == "intro-to-rust-2"));
        courses
            .expect_create()
            .withf(|c| c.slug == "intro-to-rust-3")
            .times(1)
            .returning(|_| Ok(course(None)));

        let svc = service(MockUow {
            courses,
            ..Default::default()
        });
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        svc.create(admin, draft("Intro to Rust")).await.unwrap();
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let svc = service(MockUow::default());
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        let mut bad = draft("Paid");
        bad.price = -5.0;
        let err = svc.create(admin, bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_only_assigned_instructor_or_admin_can_edit() {
        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let carol = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        let owned = course(Some(bob.id));
        let id = owned.id;

        let mut courses = MockCourseRepository::new();
        let found = owned.clone();
        courses
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        courses
            .expect_set_published()
            .times(2)
            .returning(move |_, _| Ok(owned.clone()));

        let svc = service(MockUow {
            courses,
            ..Default::default()
        });

        let err = svc.set_published(carol, id, true).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(svc.set_published(bob, id, true).await.is_ok());
        assert!(svc.set_published(admin, id, true).await.is_ok());
    }

    #[tokio::test]
    async fn test_title_change_rederives_slug() {
        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let owned = course(Some(bob.id));
        let id = owned.id;

        let mut courses = MockCourseRepository::new();
        let found = owned.clone();
        courses
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        courses
            .expect_slug_exists()
            .withf(move |_, except| *except == Some(id))
            .returning(|_, _| Ok(false));
        courses
            .expect_update()
            .withf(|_, c| c.slug.as_deref() == Some("advanced-rust"))
            .times(1)
            .returning(move |_, _| Ok(owned.clone()));

        let svc = service(MockUow {
            courses,
            ..Default::default()
        });
        let update = CourseUpdate {
            title: Some("Advanced Rust".into()),
            ..Default::default()
        };
        svc.update(bob, id, update).await.unwrap();
    }

    #[tokio::test]
    async fn test_unpublished_course_hidden_from_catalog() {
        let mut draft_course = course(None);
        draft_course.is_published = false;

        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_by_id()
            .returning(move |_| Ok(Some(draft_course.clone())));

        let svc = service(MockUow {
            courses,
            ..Default::default()
        });
        let err = svc.get_published(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_assign_instructor_requires_instructor_target() {
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        let target = user(UserRole::Student);
        let target_id = target.id;

        let mut courses = MockCourseRepository::new();
        courses
            .expect_find_by_id()
            .returning(|_| Ok(Some(course(None))));
        courses.expect_assign_instructor().never();
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(target.clone())));

        let svc = service(MockUow {
            courses,
            users,
            ..Default::default()
        });
        let err = svc
            .assign_instructor(admin, Uuid::new_v4(), target_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_teaching_courses_scoped_by_role() {
        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);

        let mut courses = MockCourseRepository::new();
        courses
            .expect_list_assigned_to()
            .withf(move |id| *id == bob.id)
            .times(1)
            .returning(move |id| Ok(vec![course(Some(id))]));
        courses
            .expect_list_all()
            .times(1)
            .returning(|| Ok(vec![course(None), course(None)]));

        let svc = service(MockUow {
            courses,
            ..Default::default()
        });
        assert_eq!(svc.teaching_courses(bob).await.unwrap().len(), 1);
        assert_eq!(svc.teaching_courses(admin).await.unwrap().len(), 2);

        let student = Actor::new(Uuid::new_v4(), UserRole::Student);
        assert!(svc.teaching_courses(student).await.is_err());
    }
}
