//! Item request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Item request model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub requester_id: i64,
    pub created: DateTime<Utc>,
}

/// Item created in answer to a request
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RequestAnswer {
    pub item_id: i64,
    pub name: String,
    pub owner_id: i64,
}

/// Request with its answers, for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestDetails {
    #[serde(flatten)]
    pub request: ItemRequest,
    pub items: Vec<RequestAnswer>,
}

/// Create request payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    #[validate(length(min = 1, message = "description must not be blank"))]
    pub description: String,
}
