//! Chat session and assistant backends.
//!
//! A [`ChatSession`] owns the ordered message list and drives one
//! request/response round trip per user turn through an [`AssistantBackend`].
//! The backend is either [`HttpBackend`] (the live `/chat` endpoint) or
//! [`MockBackend`] (canned replies after a fixed delay); the session cannot
//! tell them apart.

pub mod backend;
pub mod session;

pub use backend::{AssistantBackend, HttpBackend, MockBackend};
pub use session::{ChatSession, SessionState};
