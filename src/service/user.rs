//! User business logic

use crate::domain::{NewUser, User};
use crate::error::{AppError, Result};
use crate::repository::UserRepository;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.repo.find_all().await
    }

    pub async fn get(&self, id: i32) -> Result<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Lookup that treats a missing row as a normal outcome
    pub async fn find(&self, id: i32) -> Result<Option<User>> {
        self.repo.find_by_id(id).await
    }

    pub async fn create(&self, input: NewUser) -> Result<User> {
        input.validate()?;

        let mut user = User::from(input);
        self.repo.save(&mut user).await?;

        info!(id = user.id, "User created");
        Ok(user)
    }

    /// Fetch the stored row, overwrite its fields, write it back
    pub async fn update(&self, id: i32, name: String, email: String) -> Result<User> {
        let mut user = self.get(id).await?;
        user.name = name;
        user.email = email;
        user.validate()?;

        self.repo.update(&user).await?;

        info!(id, "User updated");
        Ok(user)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.repo.delete(id).await?;
        info!(id, "User deleted");
        Ok(())
    }

    /// Validate every input first, then persist the lot in a single transaction
    pub async fn import(&self, inputs: Vec<NewUser>) -> Result<Vec<User>> {
        for (index, input) in inputs.iter().enumerate() {
            input
                .validate()
                .map_err(|e| AppError::Validation(format!("record {}: {}", index, e)))?;
        }

        let mut users: Vec<User> = inputs.into_iter().map(User::from).collect();
        self.repo.save_all(&mut users).await?;

        info!(count = users.len(), "Users imported");
        Ok(users)
    }

    pub async fn count(&self) -> Result<i64> {
        self.repo.count().await
    }
}
