//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the pure rules applied to them (progress and
//! XP, recommendation scoring, permissions). Nothing here touches the
//! database or HTTP.

pub mod assignment;
pub mod course;
pub mod enrollment;
pub mod live_session;
pub mod password;
pub mod policy;
pub mod product;
pub mod recommendation;
pub mod user;

pub use assignment::{
    Assignment, Grade, NewAssignment, StudentAssignmentView, Submission, SubmissionDraft,
    SubmissionStatus,
};
pub use course::{
    Course, CourseChanges, CourseFilter, CourseLevel, Lecture, LectureInput, NewCourse, Rating,
    Section, SectionInput,
};
pub use enrollment::{CompletedLecture, Enrollment, EnrollmentWithCourse, ProgressOutcome};
pub use live_session::{
    Attendance, AttendanceStatus, HostType, LiveSession, NewLiveSession, SessionStatus,
};
pub use password::Password;
pub use policy::{Action, Actor};
pub use product::{NewProduct, Product, ProductChanges};
pub use recommendation::{Recommendations, ScoredCourse};
pub use user::{
    LearningPace, NewUser, Profile, ProfileUpdate, StudentProfile, User, UserResponse, UserRole,
    UserStatus,
};
