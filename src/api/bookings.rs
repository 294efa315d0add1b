//! Booking lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::booking::{BookingDetails, BookingState, CreateBooking},
    repository::bookings::BookingRole,
};

use super::SharerId;

#[derive(Deserialize)]
pub struct DecisionQuery {
    pub approved: bool,
}

#[derive(Deserialize)]
pub struct StateQuery {
    pub state: Option<String>,
}

impl StateQuery {
    /// Parse the state filter, defaulting to ALL
    fn booking_state(&self) -> AppResult<BookingState> {
        match self.state {
            Some(ref s) => s.parse().map_err(AppError::Validation),
            None => Ok(BookingState::All),
        }
    }
}

/// Request to book an item for a time window
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Booker user ID")
    ),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created in WAITING state", body = BookingDetails),
        (status = 400, description = "Invalid window, unavailable item or self-booking"),
        (status = 404, description = "Booker or item not found"),
        (status = 409, description = "Window overlaps an approved booking")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    SharerId(booker_id): SharerId,
    Json(request): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<BookingDetails>)> {
    let booking = state
        .services
        .bookings
        .create_booking(booker_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Approve or reject a waiting booking (item owner only)
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("approved" = bool, Query, description = "true to approve, false to reject"),
        ("X-Sharer-User-Id" = i64, Header, description = "Owner user ID")
    ),
    responses(
        (status = 200, description = "Booking decided", body = BookingDetails),
        (status = 400, description = "Booking already decided"),
        (status = 403, description = "Caller does not own the item"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Approval would overlap another approved booking")
    )
)]
pub async fn decide_booking(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Path(id): Path<i64>,
    Query(query): Query<DecisionQuery>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state
        .services
        .bookings
        .decide(owner_id, id, query.approved)
        .await?;
    Ok(Json(booking))
}

/// Cancel a waiting or approved booking (booker only)
#[utoipa::path(
    patch,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Booker user ID")
    ),
    responses(
        (status = 200, description = "Booking canceled", body = BookingDetails),
        (status = 400, description = "Booking is in a terminal state"),
        (status = 403, description = "Caller is not the booker"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    SharerId(booker_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state.services.bookings.cancel(booker_id, id).await?;
    Ok(Json(booking))
}

/// Get a booking (booker or item owner only)
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Viewer user ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingDetails),
        (status = 403, description = "Caller is neither booker nor owner"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    SharerId(viewer_id): SharerId,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state.services.bookings.get_booking(viewer_id, id).await?;
    Ok(Json(booking))
}

/// List the caller's bookings as booker, newest start first
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        ("state" = Option<String>, Query, description = "ALL | CURRENT | PAST | FUTURE | WAITING | REJECTED"),
        ("X-Sharer-User-Id" = i64, Header, description = "Booker user ID")
    ),
    responses(
        (status = 200, description = "Bookings made by the caller", body = Vec<BookingDetails>),
        (status = 400, description = "Unknown state filter"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    SharerId(booker_id): SharerId,
    Query(query): Query<StateQuery>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let filter = query.booking_state()?;
    let bookings = state
        .services
        .bookings
        .list_bookings(booker_id, BookingRole::Booker, filter)
        .await?;
    Ok(Json(bookings))
}

/// List bookings on the caller's items, newest start first
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        ("state" = Option<String>, Query, description = "ALL | CURRENT | PAST | FUTURE | WAITING | REJECTED"),
        ("X-Sharer-User-Id" = i64, Header, description = "Owner user ID")
    ),
    responses(
        (status = 200, description = "Bookings on the caller's items", body = Vec<BookingDetails>),
        (status = 400, description = "Unknown state filter"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_owner_bookings(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Query(query): Query<StateQuery>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let filter = query.booking_state()?;
    let bookings = state
        .services
        .bookings
        .list_bookings(owner_id, BookingRole::Owner, filter)
        .await?;
    Ok(Json(bookings))
}
