//! Bookshelf application library
//!
//! This library provides the application modules and utilities for the bookshelf service.

pub mod modules;
pub mod utils;

/// Re-export commonly used types
pub use modules::*;
