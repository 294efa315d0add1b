//! Comments repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::comment::{Comment, CommentDetails},
};

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a new comment
    pub async fn create(
        &self,
        item_id: i64,
        author_id: i64,
        text: &str,
        created: DateTime<Utc>,
    ) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (item_id, author_id, text, created)
            VALUES ($1, $2, $3, $4)
            RETURNING id, item_id, author_id, text, created
            "#,
        )
        .bind(item_id)
        .bind(author_id)
        .bind(text)
        .bind(created)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    /// Comments on an item with author names, oldest first
    pub async fn find_by_item(&self, item_id: i64) -> AppResult<Vec<CommentDetails>> {
        let comments = sqlx::query_as::<_, CommentDetails>(
            r#"
            SELECT c.id, c.text, u.name as author_name, c.created
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.item_id = $1
            ORDER BY c.created
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
