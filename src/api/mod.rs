//! REST API client and typed endpoint wrappers.
//!
//! All data access goes through [`ApiClient`], which joins the configured
//! base URL with a path, attaches the bearer token when one is stored, and
//! maps failures into [`AppError`](crate::types::AppError). Domain modules
//! add one typed function per endpoint:
//!
//! - [`auth`]: `POST /auth/login` (form-encoded), `POST /auth/register`,
//!   `POST /auth/logout`, `GET /auth/me`
//! - [`documents`]: CRUD on `/documents` (multipart upload) and `/collections`
//! - [`users`]: CRUD on `/users` and `/roles`

pub mod auth;
pub mod client;
pub mod documents;
pub mod users;

pub use client::ApiClient;
