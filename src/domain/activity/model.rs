use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DomainError, SessionUser};

/// Maximum number of retained log entries. Older ones are dropped on append.
pub const MAX_LOG_ENTRIES: usize = 1000;

/// Well-known action tags.
pub mod actions {
    pub const PAGE_VIEW: &str = "page_view";
    pub const PLANT_VIEW: &str = "plant_view";
    pub const USER_LOGIN: &str = "user_login";
    pub const USER_LOGOUT: &str = "user_logout";
    pub const USER_CREATED: &str = "user_created";
    pub const PLANT_CREATED: &str = "plant_created";
    pub const PLANT_UPDATED: &str = "plant_updated";
    pub const PLANT_DELETED: &str = "plant_deleted";
    pub const QR_DOWNLOADED: &str = "qr_downloaded";
    pub const PROFILE_UPDATED: &str = "profile_updated";
    pub const PASSWORD_CHANGED: &str = "password_changed";
}

/// One stored activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub action: String,
    pub page: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_name: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl LogEntry {
    /// Actor id and name, when both are known.
    pub fn actor(&self) -> Option<(&str, &str)> {
        Some((self.user_id.as_deref()?, self.user_name.as_deref()?))
    }

    /// Plant id and name, when both are known.
    pub fn plant(&self) -> Option<(&str, &str)> {
        Some((self.plant_id.as_deref()?, self.plant_name.as_deref()?))
    }
}

/// An event to record. Id and timestamp are assigned by the logger.
#[derive(Debug, Clone, Default)]
pub struct NewLogEntry {
    pub action: String,
    pub page: String,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub plant_id: Option<String>,
    pub plant_name: Option<String>,
    pub ip_address: Option<String>,
}

impl NewLogEntry {
    pub fn new(action: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            page: page.into(),
            ..Default::default()
        }
    }

    pub fn page_view(page: impl Into<String>) -> Self {
        Self::new(actions::PAGE_VIEW, page)
    }

    pub fn by(mut self, user: &SessionUser) -> Self {
        self.user_id = Some(user.id.clone());
        self.user_name = Some(user.name.clone());
        self
    }

    pub fn by_opt(self, user: Option<&SessionUser>) -> Self {
        match user {
            Some(u) => self.by(u),
            None => self,
        }
    }

    pub fn plant(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.plant_id = Some(id.into());
        self.plant_name = Some(name.into());
        self
    }

    pub fn from_ip(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }
}

/// View filter used when browsing the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LogFilter {
    #[default]
    All,
    PageView,
    PlantView,
    /// Everything that is neither a page view nor a plant view.
    UserActivity,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        match self {
            Self::All => true,
            Self::PageView => entry.action == actions::PAGE_VIEW,
            Self::PlantView => entry.action == actions::PLANT_VIEW,
            Self::UserActivity => {
                entry.action != actions::PAGE_VIEW && entry.action != actions::PLANT_VIEW
            }
        }
    }
}

impl FromStr for LogFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "page_view" => Ok(Self::PageView),
            "plant_view" => Ok(Self::PlantView),
            "user_activity" => Ok(Self::UserActivity),
            other => Err(DomainError::Validation(format!("Unknown log filter: {}", other))),
        }
    }
}

impl fmt::Display for LogFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::PageView => "page_view",
            Self::PlantView => "plant_view",
            Self::UserActivity => "user_activity",
        };
        f.write_str(s)
    }
}

/// A counter labelled with a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NamedCount {
    pub count: u64,
    pub name: String,
}

/// Aggregates over the whole retained log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    /// Page tag → number of `page_view` entries.
    pub page_views: BTreeMap<String, u64>,
    /// Plant id → `plant_view` count and plant name.
    pub plant_views: BTreeMap<String, NamedCount>,
    /// User id → non-page-view action count and user name.
    pub student_activity: BTreeMap<String, NamedCount>,
    pub total_logs: usize,
}

impl LogStats {
    /// Single pass over `entries`.
    ///
    /// The name attached to a plant or user is the one seen first, which for
    /// a newest-first log is the most recent.
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut stats = LogStats {
            total_logs: entries.len(),
            ..Default::default()
        };

        for entry in entries {
            if entry.action == actions::PAGE_VIEW {
                *stats.page_views.entry(entry.page.clone()).or_insert(0) += 1;
            }

            if entry.action == actions::PLANT_VIEW {
                if let Some((id, name)) = entry.plant() {
                    bump(&mut stats.plant_views, id, name);
                }
            }

            if entry.action != actions::PAGE_VIEW {
                if let Some((id, name)) = entry.actor() {
                    bump(&mut stats.student_activity, id, name);
                }
            }
        }

        stats
    }
}

fn bump(map: &mut BTreeMap<String, NamedCount>, id: &str, name: &str) {
    map.entry(id.to_string())
        .or_insert_with(|| NamedCount {
            count: 0,
            name: name.to_string(),
        })
        .count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(action: &str, page: &str) -> LogEntry {
        LogEntry {
            id: format!("log-{}-{}", action, page),
            user_id: None,
            user_name: None,
            action: action.into(),
            page: page.into(),
            plant_id: None,
            plant_name: None,
            timestamp: Utc::now(),
            ip_address: None,
        }
    }

    fn with_actor(mut e: LogEntry, id: &str, name: &str) -> LogEntry {
        e.user_id = Some(id.into());
        e.user_name = Some(name.into());
        e
    }

    fn with_plant(mut e: LogEntry, id: Option<&str>, name: Option<&str>) -> LogEntry {
        e.plant_id = id.map(String::from);
        e.plant_name = name.map(String::from);
        e
    }

    #[test]
    fn page_views_are_counted_per_page() {
        let mut entries = Vec::new();
        for _ in 0..3 {
            entries.push(entry("page_view", "home"));
        }
        for _ in 0..2 {
            entries.push(entry("page_view", "about"));
        }
        entries.push(entry("plant_view", "plant_display"));

        let stats = LogStats::from_entries(&entries);
        assert_eq!(stats.page_views.len(), 2);
        assert_eq!(stats.page_views["home"], 3);
        assert_eq!(stats.page_views["about"], 2);
        assert_eq!(stats.total_logs, 6);
    }

    #[test]
    fn plant_views_need_both_id_and_name() {
        let entries = vec![
            with_plant(entry("plant_view", "plant_display"), Some("p1"), Some("Waratah")),
            with_plant(entry("plant_view", "plant_display"), Some("p1"), Some("Waratah")),
            with_plant(entry("plant_view", "plant_display"), Some("p2"), None),
            with_plant(entry("plant_created", "plant_form"), Some("p3"), Some("Banksia")),
        ];

        let stats = LogStats::from_entries(&entries);
        assert_eq!(stats.plant_views.len(), 1);
        assert_eq!(
            stats.plant_views["p1"],
            NamedCount {
                count: 2,
                name: "Waratah".into()
            }
        );
    }

    #[test]
    fn user_activity_skips_page_views_and_anonymous_entries() {
        let entries = vec![
            with_actor(entry("page_view", "dashboard"), "u1", "Sam"),
            with_actor(entry("plant_created", "plant_form"), "u1", "Sam"),
            with_actor(entry("user_login", "login"), "u1", "Sam"),
            entry("plant_view", "plant_display"),
        ];

        let stats = LogStats::from_entries(&entries);
        assert_eq!(stats.student_activity.len(), 1);
        assert_eq!(stats.student_activity["u1"].count, 2);
        assert_eq!(stats.student_activity["u1"].name, "Sam");
    }

    #[test]
    fn empty_log_has_empty_stats() {
        assert_eq!(LogStats::from_entries(&[]), LogStats::default());
    }

    #[test]
    fn filters_partition_the_log() {
        let view = entry("page_view", "home");
        let plant = entry("plant_view", "plant_display");
        let login = entry("user_login", "login");

        assert!(LogFilter::All.matches(&login));
        assert!(LogFilter::PageView.matches(&view));
        assert!(!LogFilter::PageView.matches(&plant));
        assert!(LogFilter::PlantView.matches(&plant));
        assert!(LogFilter::UserActivity.matches(&login));
        assert!(!LogFilter::UserActivity.matches(&view));
        assert!(!LogFilter::UserActivity.matches(&plant));
    }

    #[test]
    fn stored_entry_omits_absent_fields() {
        let json = serde_json::to_value(entry("page_view", "home")).unwrap();
        assert!(json.get("userId").is_none());
        assert!(json.get("ipAddress").is_none());
        assert_eq!(json["page"], "home");
    }
}
