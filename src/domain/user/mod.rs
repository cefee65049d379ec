//! User aggregate
//!
//! Contains the User entity, its session projection and the repository interface.

pub mod model;
pub mod repository;

pub use model::{NewUser, SessionUser, UpdateProfile, User, UserRole};
pub use repository::UserRepositoryInterface;
