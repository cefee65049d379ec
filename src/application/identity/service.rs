//! User management service: application-layer orchestration
//!
//! HTTP handlers and the session object are thin wrappers that delegate
//! here.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tracing::{info, warn};

use crate::domain::{
    DomainError, DomainResult, NewUser, SessionUser, UpdateProfile, User, UserRepositoryInterface,
    UserRole,
};

/// The two accounts seeded into an empty user collection.
pub fn demo_accounts() -> Vec<User> {
    vec![
        User {
            id: "admin-demo-1".into(),
            email: "admin@kangan.edu.au".into(),
            password: "admin123".into(),
            name: "Admin User".into(),
            role: UserRole::Admin,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).single().unwrap_or_else(Utc::now),
        },
        User {
            id: "student-demo-1".into(),
            email: "student@kangan.edu.au".into(),
            password: "student123".into(),
            name: "Demo Student".into(),
            role: UserRole::Student,
            created_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).single().unwrap_or_else(Utc::now),
        },
    ]
}

/// Identity service: orchestrates the account use-cases.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer.
pub struct IdentityService<R: UserRepositoryInterface> {
    repo: Arc<R>,
}

impl<R: UserRepositoryInterface> IdentityService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Exact, case-sensitive email and secret match.
    ///
    /// Unknown email and wrong secret fail identically.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<User> {
        match self.repo.get_user_by_email(email).await? {
            Some(user) if user.password == password => {
                info!(user_id = %user.id, "User logged in");
                Ok(user)
            }
            _ => {
                warn!("Rejected login attempt");
                Err(DomainError::InvalidCredentials)
            }
        }
    }

    // ── Registration ────────────────────────────────────────────

    /// Append a new account on behalf of `actor`, who must be an admin.
    /// The caller stays whoever it was before.
    pub async fn register_as(&self, actor: &SessionUser, new_user: NewUser) -> DomainResult<User> {
        if !actor.is_admin() {
            warn!(actor_id = %actor.id, "Non-admin tried to register a user");
            return Err(DomainError::Forbidden("only admins can register users".into()));
        }

        let user = User {
            id: format!("user-{}", uuid::Uuid::new_v4()),
            email: new_user.email,
            password: new_user.password,
            name: new_user.name,
            role: new_user.role,
            created_at: Utc::now(),
        };

        self.repo.create_user(user.clone()).await?;

        info!(user_id = %user.id, role = %user.role, "New user registered");
        Ok(user)
    }

    /// Seed the demo admin and student when no users exist yet.
    pub async fn seed_demo_accounts(&self) -> DomainResult<bool> {
        let seeded = self.repo.seed_if_empty(demo_accounts()).await?;
        if seeded {
            info!("Seeded demo accounts");
        }
        Ok(seeded)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(&self, role: Option<UserRole>) -> DomainResult<Vec<User>> {
        let users = self.repo.list_users().await?;
        Ok(match role {
            Some(role) => users.into_iter().filter(|u| u.role == role).collect(),
            None => users,
        })
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Merge name/email into the stored record.
    ///
    /// Moving to an email some other account already uses fails with
    /// `DuplicateEmail`. Fields the update leaves out keep their latest
    /// stored value.
    pub async fn update_profile(&self, user_id: &str, update: &UpdateProfile) -> DomainResult<User> {
        let user = self
            .repo
            .update_user(user_id, |user| {
                update.apply(&mut user.name, &mut user.email);
                Ok(())
            })
            .await?;

        info!(user_id, "Profile updated");
        Ok(user)
    }

    /// Replace the secret after checking the current one.
    ///
    /// Strength rules for `new_password` belong to the caller.
    pub async fn update_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let result = self
            .repo
            .update_user(user_id, |user| {
                if user.password != current_password {
                    return Err(DomainError::IncorrectPassword);
                }
                user.password = new_password.to_string();
                Ok(())
            })
            .await;

        match result {
            Ok(_) => {
                info!(user_id, "Password changed");
                Ok(())
            }
            Err(DomainError::NotFound { .. }) => Err(DomainError::IncorrectPassword),
            Err(e) => Err(e),
        }
    }
}
