//! Item request endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::request::{CreateRequest, ItemRequest, RequestDetails},
};

use super::SharerId;

/// Create an item request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Requester user ID")
    ),
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = ItemRequest),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Requester not found")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    SharerId(requester_id): SharerId,
    Json(request): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<ItemRequest>)> {
    let created = state
        .services
        .requests
        .create_request(requester_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the caller's requests with the items answering them
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Requester user ID")
    ),
    responses(
        (status = 200, description = "Own requests, newest first", body = Vec<RequestDetails>),
        (status = 404, description = "Requester not found")
    )
)]
pub async fn list_own_requests(
    State(state): State<crate::AppState>,
    SharerId(requester_id): SharerId,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state.services.requests.get_own_requests(requester_id).await?;
    Ok(Json(requests))
}

/// List other users' requests
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Viewer user ID")
    ),
    responses(
        (status = 200, description = "Other users' requests, newest first", body = Vec<ItemRequest>),
        (status = 404, description = "Viewer not found")
    )
)]
pub async fn list_other_requests(
    State(state): State<crate::AppState>,
    SharerId(requester_id): SharerId,
) -> AppResult<Json<Vec<ItemRequest>>> {
    let requests = state
        .services
        .requests
        .get_other_requests(requester_id)
        .await?;
    Ok(Json(requests))
}

/// Get a request by ID with its answers
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i64, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request details", body = RequestDetails),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RequestDetails>> {
    let request = state.services.requests.get_request(id).await?;
    Ok(Json(request))
}
