//! Activity log DTOs

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{LogFilter, NewLogEntry};

/// A client-side event, typically a page view.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordEventRequest {
    #[validate(length(min = 1, max = 64, message = "action is required"))]
    pub action: String,
    #[validate(length(min = 1, max = 64, message = "page is required"))]
    pub page: String,
    pub plant_id: Option<String>,
    pub plant_name: Option<String>,
}

impl From<RecordEventRequest> for NewLogEntry {
    fn from(r: RecordEventRequest) -> Self {
        Self {
            plant_id: r.plant_id,
            plant_name: r.plant_name,
            ..NewLogEntry::new(r.action, r.page)
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogListParams {
    /// `all`, `page_view`, `plant_view` or `user_activity`
    #[serde(default)]
    pub filter: LogFilter,
    /// Maximum entries to return, newest first (default 100)
    pub limit: Option<usize>,
}
