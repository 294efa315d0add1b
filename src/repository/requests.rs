//! Item requests repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::request::{ItemRequest, RequestAnswer},
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<ItemRequest> {
        sqlx::query_as::<_, ItemRequest>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// Create a new request
    pub async fn create(&self, requester_id: i64, description: &str) -> AppResult<ItemRequest> {
        sqlx::query_as::<_, ItemRequest>(
            r#"
            INSERT INTO requests (description, requester_id)
            VALUES ($1, $2)
            RETURNING id, description, requester_id, created
            "#,
        )
        .bind(description)
        .bind(requester_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    /// Own requests, newest first
    pub async fn find_by_requester(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            "SELECT * FROM requests WHERE requester_id = $1 ORDER BY created DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Other users' requests, newest first
    pub async fn find_by_other_requesters(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            "SELECT * FROM requests WHERE requester_id != $1 ORDER BY created DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Items created in answer to a request
    pub async fn find_answers(&self, request_id: i64) -> AppResult<Vec<RequestAnswer>> {
        let answers = sqlx::query_as::<_, RequestAnswer>(
            r#"
            SELECT id as item_id, name, owner_id
            FROM items
            WHERE request_id = $1
            ORDER BY id
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }
}
