//! Application layer: use-cases over the domain repositories

pub mod activity;
pub mod identity;
pub mod plants;

pub use activity::ActivityLogger;
pub use identity::{IdentityService, Session};
pub use plants::PlantService;
