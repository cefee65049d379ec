//! Client session: anonymous or authenticated, persisted under `currentUser`

use std::sync::Arc;

use tracing::{info, warn};

use super::IdentityService;
use crate::domain::{
    DomainError, DomainResult, NewUser, SessionState, SessionUser, UpdateProfile, User,
    UserRepositoryInterface,
};
use crate::infrastructure::storage::{keys, RecordStore};

/// One client's authentication context.
///
/// Each instance is independent; tests and the CLI build their own from a
/// store handle instead of sharing a global.
pub struct Session<R: UserRepositoryInterface> {
    identity: Arc<IdentityService<R>>,
    store: RecordStore,
    state: SessionState,
}

impl<R: UserRepositoryInterface> Session<R> {
    /// Seed the demo accounts if needed, then pick up a persisted session.
    ///
    /// The persisted user is trusted as-is; credentials are not checked again.
    pub async fn restore(identity: Arc<IdentityService<R>>, store: RecordStore) -> DomainResult<Self> {
        identity.seed_demo_accounts().await?;

        let state = match store.get_value::<SessionUser>(keys::CURRENT_USER).await {
            Ok(Some(user)) => {
                info!(user_id = %user.id, "Session restored");
                SessionState::Authenticated(user)
            }
            Ok(None) => SessionState::Anonymous,
            Err(DomainError::Storage(reason)) => {
                warn!(%reason, "Discarding unreadable persisted session");
                store.remove_value(keys::CURRENT_USER).await?;
                SessionState::Anonymous
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            identity,
            store,
            state,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current(&self) -> Option<&SessionUser> {
        self.state.user()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> DomainResult<SessionUser> {
        let user = SessionUser::from(self.identity.login(email, password).await?);
        self.store.set_value(keys::CURRENT_USER, &user).await?;
        self.state = SessionState::Authenticated(user.clone());
        Ok(user)
    }

    /// Always ends anonymous, even if clearing the persisted copy fails.
    pub async fn logout(&mut self) -> DomainResult<()> {
        self.state = SessionState::Anonymous;
        self.store.remove_value(keys::CURRENT_USER).await
    }

    /// Create an account. Only an authenticated admin may do this.
    pub async fn register(&self, new_user: NewUser) -> DomainResult<User> {
        let actor = self.current().ok_or(DomainError::NotAuthenticated)?;
        self.identity.register_as(actor, new_user).await
    }

    /// Merge into the current user and its stored record. Does nothing
    /// (and returns `None`) when anonymous.
    pub async fn update_profile(&mut self, update: &UpdateProfile) -> DomainResult<Option<SessionUser>> {
        let Some(current) = self.state.user() else {
            return Ok(None);
        };
        let mut user = current.clone();

        match self.identity.update_profile(&user.id, update).await {
            Ok(_) => {}
            // A session whose account is gone still gets its own copy updated.
            Err(DomainError::NotFound { .. }) => {
                warn!(user_id = %user.id, "Session user missing from store")
            }
            Err(e) => return Err(e),
        }

        update.apply(&mut user.name, &mut user.email);
        self.store.set_value(keys::CURRENT_USER, &user).await?;
        self.state = SessionState::Authenticated(user.clone());
        Ok(Some(user))
    }

    pub async fn update_password(&self, current_password: &str, new_password: &str) -> DomainResult<()> {
        let user = self.current().ok_or(DomainError::NotAuthenticated)?;
        self.identity
            .update_password(&user.id, current_password, new_password)
            .await
    }
}
