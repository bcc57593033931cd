//! # WPM Common Library
//!
//! Shared code for the WordPress Mastery course services including:
//! - Persisted model types (categories, lessons, progress, achievements, users)
//! - SQLite schema initialization and migrations
//! - Bootstrap configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
