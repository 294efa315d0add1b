//! User management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get all users
    pub async fn get_all(&self) -> AppResult<Vec<User>> {
        self.repository.users.get_all().await
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Register a new user
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.users.create(&user).await
    }

    /// Partially update a user; omitted fields keep their value
    pub async fn update_user(&self, id: i64, patch: UpdateUser) -> AppResult<User> {
        patch
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut user = self.repository.users.get_by_id(id).await?;
        patch.apply(&mut user);
        self.repository.users.update(&user).await
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.repository.users.get_by_id(id).await?;
        self.repository.users.delete(id).await
    }
}
