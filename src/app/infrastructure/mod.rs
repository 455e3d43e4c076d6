//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - In-memory page model
//! - Error types
//! - Logging setup

pub mod dom;
pub mod error;
pub mod logging;
