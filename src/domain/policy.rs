//! Role and ownership permissions.
//!
//! Every guarded operation names an [`Action`]. [`rule`] is the permission
//! table: for each (action, role) it yields `Allow`, `Deny`, or
//! `IfAssigned`, the latter requiring the caller to be the course's assigned
//! instructor. Admins are allowed everywhere.

use uuid::Uuid;

use super::course::Course;
use super::user::UserRole;
use crate::errors::{AppError, AppResult};

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateCourse,
    EditCourse,
    DeleteCourse,
    AssignInstructor,
    ViewTeachingCourses,
    Enroll,
    TrackProgress,
    SubmitAssignment,
    ViewRecommendations,
    ManageAssignments,
    GradeSubmission,
    ManageLiveSessions,
    ManageProducts,
    ManageUsers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Allow,
    Deny,
    IfAssigned,
}

/// Permission table.
pub fn rule(action: Action, role: UserRole) -> Rule {
    use Action::*;

    match (role, action) {
        (UserRole::Admin, Enroll | TrackProgress | SubmitAssignment | ViewRecommendations) => {
            Rule::Deny
        }
        (UserRole::Admin, _) => Rule::Allow,

        (UserRole::Instructor, CreateCourse | ViewTeachingCourses) => Rule::Allow,
        (UserRole::Instructor, EditCourse | ManageAssignments | GradeSubmission | ManageLiveSessions) => {
            Rule::IfAssigned
        }
        (UserRole::Instructor, _) => Rule::Deny,

        (UserRole::Student, Enroll | TrackProgress | SubmitAssignment | ViewRecommendations) => {
            Rule::Allow
        }
        (UserRole::Student, _) => Rule::Deny,
    }
}

/// Check an action that is not scoped to a course.
pub fn authorize(actor: &Actor, action: Action) -> AppResult<()> {
    match rule(action, actor.role) {
        Rule::Allow => Ok(()),
        Rule::Deny => Err(denied(actor, action)),
        Rule::IfAssigned => Err(AppError::internal(format!(
            "{:?} requires a course to authorize",
            action
        ))),
    }
}

/// Check an action against a specific course.
pub fn authorize_course(actor: &Actor, action: Action, course: &Course) -> AppResult<()> {
    match rule(action, actor.role) {
        Rule::Allow => Ok(()),
        Rule::IfAssigned if course.is_assigned_to(actor.id) => Ok(()),
        Rule::IfAssigned => {
            tracing::debug!(
                actor = %actor.id,
                course = %course.id,
                ?action,
                "Caller is not the assigned instructor"
            );
            Err(AppError::forbidden(
                "Only the course's assigned instructor can do this",
            ))
        }
        Rule::Deny => Err(denied(actor, action)),
    }
}

fn denied(actor: &Actor, action: Action) -> AppError {
    tracing::debug!(actor = %actor.id, role = %actor.role, ?action, "Action denied for role");
    AppError::forbidden("Access denied")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::course::{CourseLevel, Rating};
    use chrono::Utc;

    fn course_assigned_to(instructor: Option<Uuid>) -> Course {
        Course {
            id: Uuid::new_v4(),
            title: "X".into(),
            slug: "x".into(),
            description: String::new(),
            category: "programming".into(),
            tags: Default::default(),
            level: CourseLevel::Beginner,
            language: "en".into(),
            cover_url: None,
            created_by: Uuid::new_v4(),
            assigned_instructor: instructor,
            sections: vec![],
            is_published: true,
            price: 0.0,
            estimated_hours: 1.0,
            enrollment_count: 0,
            rating: Rating::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_table_student_column() {
        use Action::*;
        for action in [Enroll, TrackProgress, SubmitAssignment, ViewRecommendations] {
            assert_eq!(rule(action, UserRole::Student), Rule::Allow);
        }
        for action in [
            CreateCourse,
            EditCourse,
            DeleteCourse,
            AssignInstructor,
            ViewTeachingCourses,
            ManageAssignments,
            GradeSubmission,
            ManageLiveSessions,
            ManageProducts,
            ManageUsers,
        ] {
            assert_eq!(rule(action, UserRole::Student), Rule::Deny);
        }
    }

    #[test]
    fn test_table_instructor_column() {
        use Action::*;
        assert_eq!(rule(CreateCourse, UserRole::Instructor), Rule::Allow);
        assert_eq!(rule(ViewTeachingCourses, UserRole::Instructor), Rule::Allow);
        for action in [EditCourse, ManageAssignments, GradeSubmission, ManageLiveSessions] {
            assert_eq!(rule(action, UserRole::Instructor), Rule::IfAssigned);
        }
        for action in [
            DeleteCourse,
            AssignInstructor,
            Enroll,
            TrackProgress,
            SubmitAssignment,
            ViewRecommendations,
            ManageProducts,
            ManageUsers,
        ] {
            assert_eq!(rule(action, UserRole::Instructor), Rule::Deny);
        }
    }

    #[test]
    fn test_admin_bypasses_ownership() {
        let admin = Actor::new(Uuid::new_v4(), UserRole::Admin);
        let course = course_assigned_to(Some(Uuid::new_v4()));
        assert!(authorize_course(&admin, Action::GradeSubmission, &course).is_ok());
        assert!(authorize_course(&admin, Action::EditCourse, &course).is_ok());
        assert!(authorize(&admin, Action::ManageUsers).is_ok());
    }

    #[test]
    fn test_assigned_instructor_only() {
        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let carol = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let course = course_assigned_to(Some(bob.id));

        assert!(authorize_course(&bob, Action::EditCourse, &course).is_ok());
        assert!(matches!(
            authorize_course(&carol, Action::EditCourse, &course),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_unassigned_course_denies_instructors() {
        let bob = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let course = course_assigned_to(None);
        assert!(authorize_course(&bob, Action::GradeSubmission, &course).is_err());
    }

    #[test]
    fn test_student_denied_course_writes() {
        let student = Actor::new(Uuid::new_v4(), UserRole::Student);
        let course = course_assigned_to(Some(student.id));
        assert!(matches!(
            authorize_course(&student, Action::EditCourse, &course),
            Err(AppError::Forbidden(_))
        ));
    }
}
