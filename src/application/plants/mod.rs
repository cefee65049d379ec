pub mod demo;
pub mod service;

pub use service::{PlantService, QrImage};
