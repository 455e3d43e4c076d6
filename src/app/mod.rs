//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (vote state, settings, messages)
//! - `controllers/` - Orchestration (markdown preview, comment voting)
//! - `services/` - Business operations (compact counts, markdown, vote delivery, markup)
//! - `infrastructure/` - External integrations (page model, error, logging)
//! - `state.rs` - Page-level coordinator

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::preview::PreviewController;
pub use controllers::vote::{VoteController, VoteSubmission};
pub use domain::{CommentVotes, Message, VoteKind, VoteState, WidgetSettings};
pub use infrastructure::dom::{Element, Page, Selector, SubmitEvent};
pub use infrastructure::error::{AppError, Result};
pub use services::compact::{compact_int, intcompact};
pub use services::markdown::{CmarkRenderer, MarkdownRenderer};
pub use state::{EventResult, PageState};
