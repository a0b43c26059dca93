//! Shared types for the restaurant owner backend
//!
//! Domain models, the unified error system and small utilities used by
//! the service and its tests.

pub mod error;
pub mod models;
pub mod util;
