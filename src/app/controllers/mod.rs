//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the page:
//! - Markdown preview
//! - Comment voting

pub mod preview;
pub mod vote;
