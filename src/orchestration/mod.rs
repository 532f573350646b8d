//! Orchestration layer for repository publishing
//!
//! This module provides the high-level publish workflow and the advisory
//! repository lookups built on top of it.

pub mod publisher;
pub mod repositories;

// Re-export main types for convenience
pub use publisher::{Published, RepositoryPublisher};
