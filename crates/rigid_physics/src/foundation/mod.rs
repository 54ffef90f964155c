//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Axis-aligned bounds
//! - Time management
//! - Logging utilities

pub mod math;
pub mod bounds;
pub mod time;
pub mod logging;
