//! LMS API - REST backend for an e-learning platform
//!
//! Students enroll in courses, track lecture progress and earn XP, submit
//! assignments and attend live sessions. Instructors author the courses they
//! are assigned to and grade submissions. Admins manage accounts, course
//! assignment and a small product store.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities and the pure rules applied to them
//! - **services**: Use cases, permission checks and orchestration
//! - **infra**: Database, migrations, repositories and Redis
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create the bootstrap admin
//! cargo run -- admin ensure
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::{Cache, Database};
