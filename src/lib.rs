//! # ragdesk
//!
//! Terminal client for a retrieval-augmented document chat service: log in,
//! manage documents and collections, and chat with an assistant over your
//! indexed documents.
//!
//! ## Overview
//!
//! ragdesk can be used in two ways:
//!
//! 1. **As a binary** - the `ragdesk` command-line client
//! 2. **As a library** - import the API client and chat session into your
//!    own Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use ragdesk::{api, ApiClient, ChatSession, MockBackend, TokenStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(TokenStore::open("/tmp/ragdesk-token".into()));
//!     let client = ApiClient::new("http://localhost:3001", store);
//!
//!     api::auth::login(&client, &ragdesk::types::LoginCredentials {
//!         username: "alice".into(),
//!         password: "secret".into(),
//!     }).await?;
//!
//!     let mut session = ChatSession::new(Arc::new(MockBackend::default()));
//!     session.send("What is RAG?").await?;
//!     for message in session.messages() {
//!         println!("{:?}: {}", message.role, message.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API client and typed endpoint wrappers
//! - [`auth`] - token persistence and the route guard
//! - [`chat`] - chat session and assistant backends (mock and HTTP)
//! - [`documents`] - document list filtering and status rendering
//! - [`cli`] - the command-line front-end
//! - [`types`] - domain types and error handling
//!
//! ## Mock mode
//!
//! Until a live backend is available, the chat session runs against
//! [`MockBackend`], which fabricates replies in-process after a fixed delay.
//! It implements the same [`chat::AssistantBackend`] trait as the HTTP
//! backend, so pointing the session at a real server is a one-line swap.

/// REST API client and typed endpoint wrappers.
pub mod api;
/// Token persistence and the route-level auth gate.
pub mod auth;
/// Chat session and assistant backends.
pub mod chat;
/// Command-line interface.
pub mod cli;
/// Document list view logic.
pub mod documents;
/// Domain types and error handling.
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use api::ApiClient;
pub use auth::{AuthGuard, GuardState, Route, TokenStore};
pub use chat::{AssistantBackend, ChatSession, HttpBackend, MockBackend, SessionState};
pub use types::{AppError, Result};
pub use utils::Config;
