//! Identity module: user accounts and the client session
//!
//! `IdentityService` holds the stateless account use-cases (login,
//! registration, profile and password updates). `Session` layers the
//! anonymous/authenticated state machine on top and persists it.

pub mod service;
pub mod session;

pub use service::{demo_accounts, IdentityService};
pub use session::Session;
