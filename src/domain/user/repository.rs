use async_trait::async_trait;

use super::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Append a new user. Fails with `DuplicateEmail` when the email is taken.
    async fn create_user(&self, user: User) -> DomainResult<()>;
    /// Apply `edit` to the stored user with this id and write it back in one
    /// versioned step. `edit` sees the latest record and may run more than once.
    ///
    /// Fails with `NotFound` for an unknown id, with whatever `edit` returns,
    /// or with `DuplicateEmail` when the edited email belongs to another user.
    async fn update_user<F>(&self, id: &str, edit: F) -> DomainResult<User>
    where
        F: FnMut(&mut User) -> DomainResult<()> + Send;
    /// Seed the collection only if it holds no users yet. Returns whether it seeded.
    async fn seed_if_empty(&self, users: Vec<User>) -> DomainResult<bool>;
}
