//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Compact number formatting
//! - Markdown rendering
//! - Vote delivery
//! - Server-side widget markup

pub mod compact;
pub mod markdown;
pub mod markup;
pub mod vote_client;
