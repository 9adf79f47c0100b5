//! Client side of the task service: a typed HTTP client, a pure view model
//! and the session that keeps the two in step.

pub mod api;
pub mod render;
pub mod session;
pub mod view;

pub use api::{ClientError, TaskClient, TaskClientBuilder, DEFAULT_API_URL};
pub use render::{render, resolve_reference};
pub use session::SyncSession;
pub use view::{reconcile, Banner, Outcome, ViewState, BANNER_TTL};
