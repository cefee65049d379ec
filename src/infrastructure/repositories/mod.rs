//! Repository implementations over the record store

mod log_repository;
mod plant_repository;
mod user_repository;

pub use log_repository::LogRepository;
pub use plant_repository::PlantRepository;
pub use user_repository::UserRepository;
