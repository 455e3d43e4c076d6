//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Comment vote state and its transitions
//! - Widget settings
//! - Message types for the event system

pub mod messages;
pub mod settings;
pub mod vote;

pub use messages::Message;
pub use settings::{IconClasses, MarkdownSettings, WidgetSettings};
pub use vote::{CommentVotes, VoteKind, VoteState};
