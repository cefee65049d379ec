//! Plant catalogue module: gallery, display page, QR codes and authoring

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
