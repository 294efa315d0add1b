//! Items repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::item::{CreateItem, Item},
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// Get all items of an owner
    pub async fn find_by_owner(&self, owner_id: i64) -> AppResult<Vec<Item>> {
        let items =
            sqlx::query_as::<_, Item>("SELECT * FROM items WHERE owner_id = $1 ORDER BY id")
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(items)
    }

    /// Create a new item
    pub async fn create(
        &self,
        owner_id: i64,
        item: &CreateItem,
        request_id: Option<i64>,
    ) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, description, available, owner_id, request_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, available, owner_id, request_id
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .bind(owner_id)
        .bind(request_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    /// Persist an updated item. Owner and originating request are immutable.
    pub async fn update(&self, item: &Item) -> AppResult<Item> {
        sqlx::query("UPDATE items SET name = $1, description = $2, available = $3 WHERE id = $4")
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.available)
            .bind(item.id)
            .execute(&self.pool)
            .await?;

        Ok(item.clone())
    }

    /// Case-insensitive substring search over name and description,
    /// available items only
    pub async fn search(&self, text: &str) -> AppResult<Vec<Item>> {
        let pattern = format!("%{}%", text);

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT * FROM items
            WHERE available = TRUE
              AND (name ILIKE $1 OR description ILIKE $1)
            ORDER BY id
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
