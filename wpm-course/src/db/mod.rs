//! Database access layer for wpm-course
//!
//! Each submodule owns the queries for one table. Functions take a pool
//! reference and return `wpm_common::Result`.

pub mod achievements;
pub mod curriculum;
pub mod progress;
pub mod users;

pub use curriculum::{NewCategory, NewLesson};
pub use progress::ProgressUpdate;
