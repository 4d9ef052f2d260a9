//! HTTP request handlers.
//!
//! Each module exposes the routers for its resource. Paths are relative to
//! the `/api` prefix applied in [`crate::api::routes`].

pub mod admin_handler;
pub mod assignment_handler;
pub mod auth_handler;
pub mod course_handler;
pub mod enrollment_handler;
pub mod learner_handler;
pub mod live_session_handler;
pub mod product_handler;
pub mod user_handler;

pub use admin_handler::admin_routes;
pub use assignment_handler::assignment_routes;
pub use auth_handler::auth_routes;
pub use course_handler::{course_routes, public_course_routes};
pub use enrollment_handler::enrollment_routes;
pub use learner_handler::learner_routes;
pub use live_session_handler::live_session_routes;
pub use product_handler::{product_routes, public_product_routes};
pub use user_handler::user_routes;
