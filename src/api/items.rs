//! Item management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{
        comment::{CommentDetails, CreateComment},
        item::{CreateItem, Item, ItemDetails, UpdateItem},
    },
};

use super::SharerId;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub text: String,
}

/// List the calling owner's items with booking windows and comments
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Owner user ID")
    ),
    responses(
        (status = 200, description = "Owner's items", body = Vec<ItemDetails>),
        (status = 404, description = "Owner not found")
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
) -> AppResult<Json<Vec<ItemDetails>>> {
    let items = state.services.items.get_owner_items(owner_id).await?;
    Ok(Json(items))
}

/// Get item details with comments (and the booking window for the owner)
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Viewer user ID")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDetails),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    SharerId(viewer_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemDetails>> {
    let item = state.services.items.get_item(viewer_id, id).await?;
    Ok(Json(item))
}

/// List a new item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Owner user ID")
    ),
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Owner not found")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Json(item): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let created = state.services.items.create_item(owner_id, item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update an item (owner only)
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Owner user ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 404, description = "Item not found or not owned by caller")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Path(id): Path<i64>,
    Json(patch): Json<UpdateItem>,
) -> AppResult<Json<Item>> {
    let updated = state.services.items.update_item(owner_id, id, patch).await?;
    Ok(Json(updated))
}

/// Search available items by text
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(
        ("text" = String, Query, description = "Search text")
    ),
    responses(
        (status = 200, description = "Matching available items", body = Vec<Item>)
    )
)]
pub async fn search_items(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Item>>> {
    let items = state.services.items.search_items(&query.text).await?;
    Ok(Json(items))
}

/// Comment on an item after a completed rental
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Author user ID")
    ),
    request_body = CreateComment,
    responses(
        (status = 200, description = "Comment created", body = CommentDetails),
        (status = 400, description = "Author has not completed a rental of this item"),
        (status = 404, description = "Item or author not found")
    )
)]
pub async fn create_comment(
    State(state): State<crate::AppState>,
    SharerId(author_id): SharerId,
    Path(id): Path<i64>,
    Json(comment): Json<CreateComment>,
) -> AppResult<Json<CommentDetails>> {
    let created = state
        .services
        .items
        .create_comment(author_id, id, comment)
        .await?;
    Ok(Json(created))
}
