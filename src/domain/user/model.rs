use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "student" => Ok(Self::Student),
            other => Err(DomainError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Stored user record, as kept in the `users` collection.
///
/// `password` is the plaintext credential secret. The service runs in a
/// demo posture and never hashes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// A user without the credential secret. This is what a session holds and
/// what gets persisted under `currentUser`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins may act on anything; students only on what they authored.
    pub fn can_manage(&self, owner_id: &str) -> bool {
        self.is_admin() || self.id == owner_id
    }
}

impl From<&User> for SessionUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            email: u.email.clone(),
            name: u.name.clone(),
            role: u.role,
            created_at: u.created_at,
        }
    }
}

impl From<User> for SessionUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

/// Registration input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
}

/// Partial profile update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateProfile {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Merge into any record that carries a name and an email.
    pub fn apply(&self, name: &mut String, email: &mut String) {
        if let Some(n) = &self.name {
            *name = n.clone();
        }
        if let Some(e) = &self.email {
            *email = e.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "student-demo-1".into(),
            email: "student@kangan.edu.au".into(),
            password: "student123".into(),
            name: "Demo Student".into(),
            role: UserRole::Student,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn session_user_drops_the_secret() {
        let session = SessionUser::from(&sample_user());
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"role\":\"student\""));
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("student".parse::<UserRole>().unwrap(), UserRole::Student);
        assert!("teacher".parse::<UserRole>().is_err());
    }

    #[test]
    fn students_manage_only_their_own_records() {
        let student = SessionUser::from(sample_user());
        assert!(student.can_manage("student-demo-1"));
        assert!(!student.can_manage("someone-else"));

        let mut admin = student.clone();
        admin.role = UserRole::Admin;
        assert!(admin.can_manage("someone-else"));
    }

    #[test]
    fn profile_update_merges_only_given_fields() {
        let mut user = sample_user();
        let update = UpdateProfile {
            name: Some("Renamed".into()),
            email: None,
        };
        update.apply(&mut user.name, &mut user.email);
        assert_eq!(user.name, "Renamed");
        assert_eq!(user.email, "student@kangan.edu.au");
    }
}
