//! Domain layer: records, static reference data and repository interfaces.

pub mod activity;
pub mod error;
pub mod plant;
pub mod season;
pub mod session;
pub mod user;

pub use activity::{
    actions, LogEntry, LogFilter, LogRepositoryInterface, LogStats, NamedCount, NewLogEntry,
    MAX_LOG_ENTRIES,
};
pub use error::{DomainError, DomainResult};
pub use plant::{
    Author, PlantBio, PlantDetails, PlantQuery, PlantRepositoryInterface, PlantView, SaveOutcome,
};
pub use season::{IndigenousSeason, SeasonName, INDIGENOUS_SEASONS};
pub use session::SessionState;
pub use user::{NewUser, SessionUser, UpdateProfile, User, UserRepositoryInterface, UserRole};
