//! Authentication state: token persistence and the route gate.

pub mod guard;
pub mod store;

pub use guard::{AuthGuard, GuardState, Route};
pub use store::TokenStore;
