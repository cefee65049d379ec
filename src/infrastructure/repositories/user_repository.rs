use async_trait::async_trait;

use crate::domain::{DomainError, DomainResult, User, UserRepositoryInterface};
use crate::infrastructure::storage::{keys, RecordStore};

pub struct UserRepository {
    store: RecordStore,
}

impl UserRepository {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.store.get_collection(keys::USERS).await
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let users: Vec<User> = self.store.get_collection(keys::USERS).await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    async fn create_user(&self, user: User) -> DomainResult<()> {
        self.store
            .modify(keys::USERS, |users: &mut Vec<User>| {
                if users.iter().any(|u| u.email == user.email) {
                    return Err(DomainError::DuplicateEmail(user.email.clone()));
                }
                users.push(user.clone());
                Ok(())
            })
            .await
    }

    async fn update_user<F>(&self, id: &str, mut edit: F) -> DomainResult<User>
    where
        F: FnMut(&mut User) -> DomainResult<()> + Send,
    {
        self.store
            .modify(keys::USERS, |users: &mut Vec<User>| {
                let index = users
                    .iter()
                    .position(|u| u.id == id)
                    .ok_or_else(|| DomainError::user_not_found(id))?;

                let mut edited = users[index].clone();
                edit(&mut edited)?;
                edited.id = id.to_string();

                if users.iter().any(|u| u.id != id && u.email == edited.email) {
                    return Err(DomainError::DuplicateEmail(edited.email));
                }
                users[index] = edited.clone();
                Ok(edited)
            })
            .await
    }

    async fn seed_if_empty(&self, seed: Vec<User>) -> DomainResult<bool> {
        self.store
            .modify(keys::USERS, |users: &mut Vec<User>| {
                if !users.is_empty() {
                    return Ok(false);
                }
                users.extend(seed.iter().cloned());
                Ok(true)
            })
            .await
    }
}
