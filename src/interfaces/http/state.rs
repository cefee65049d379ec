//! Shared handler state

use std::sync::Arc;
use std::time::Instant;

use crate::application::{ActivityLogger, IdentityService, PlantService};
use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::{LogRepository, PlantRepository, RecordStore, UserRepository};

pub type Identity = IdentityService<UserRepository>;
pub type Plants = PlantService<PlantRepository, LogRepository>;
pub type Activity = ActivityLogger<LogRepository>;

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<Identity>,
    pub plants: Arc<Plants>,
    pub activity: Arc<Activity>,
    pub jwt_config: JwtConfig,
    pub started_at: Arc<Instant>,
}

impl AppState {
    /// Wire repositories and services over one record store.
    pub fn new(store: RecordStore, jwt_config: JwtConfig, public_base_url: impl Into<String>) -> Self {
        let users = Arc::new(UserRepository::new(store.clone()));
        let plants = Arc::new(PlantRepository::new(store.clone()));
        let logs = Arc::new(LogRepository::new(store));

        let activity = Arc::new(ActivityLogger::new(logs));
        let identity = Arc::new(IdentityService::new(users));
        let plants = Arc::new(PlantService::new(plants, activity.clone(), public_base_url));

        Self {
            identity,
            plants,
            activity,
            jwt_config,
            started_at: Arc::new(Instant::now()),
        }
    }
}
