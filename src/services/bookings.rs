//! Booking lifecycle service
//!
//! Owns the booking state machine: creation against availability and
//! overlap rules, owner approval/rejection, booker cancellation, and
//! authorization for every transition.

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::booking::{BookingDetails, BookingState, BookingStatus, CreateBooking},
    repository::{bookings::BookingRole, Repository},
};

/// Reject empty, inverted, and retroactive windows. Bookings reserve the
/// future; a window touching the past is refused outright.
fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> AppResult<()> {
    if start >= end {
        return Err(AppError::Validation(
            "Booking end must be after its start".to_string(),
        ));
    }
    if start < now || end < now {
        return Err(AppError::Validation(
            "Booking window must not be in the past".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a booking in WAITING state.
    ///
    /// Only APPROVED bookings reserve the calendar: an overlapping WAITING
    /// request is accepted here and fails later at approval time instead.
    pub async fn create_booking(
        &self,
        booker_id: i64,
        request: CreateBooking,
    ) -> AppResult<BookingDetails> {
        self.repository.users.get_by_id(booker_id).await?;
        let item = self.repository.items.get_by_id(request.item_id).await?;

        validate_window(request.start, request.end, Utc::now())?;

        if item.owner_id == booker_id {
            return Err(AppError::Validation(
                "Owner cannot book their own item".to_string(),
            ));
        }
        if !item.available {
            return Err(AppError::Validation(format!(
                "Item {} is not available for booking",
                item.id
            )));
        }

        if self
            .repository
            .bookings
            .has_approved_overlap(item.id, request.start, request.end)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Item {} already has an approved booking in that window",
                item.id
            )));
        }

        let id = self
            .repository
            .bookings
            .create(booker_id, item.id, request.start, request.end)
            .await?;

        tracing::info!(booking_id = id, item_id = item.id, booker_id, "Booking created");

        self.repository.bookings.get_details(id).await
    }

    /// Approve or reject a WAITING booking. Only the item's owner may
    /// decide; the decision itself is serialized per item in the repository.
    pub async fn decide(
        &self,
        owner_id: i64,
        booking_id: i64,
        approve: bool,
    ) -> AppResult<BookingDetails> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;
        let item = self.repository.items.get_by_id(booking.item_id).await?;

        if item.owner_id != owner_id {
            return Err(AppError::Forbidden(format!(
                "User {} does not own item {}",
                owner_id, item.id
            )));
        }
        if booking.status != BookingStatus::Waiting {
            return Err(AppError::Validation(format!(
                "Booking {} is already decided ({})",
                booking_id, booking.status
            )));
        }

        self.repository
            .bookings
            .decide(booking_id, item.id, approve)
            .await?;

        tracing::info!(booking_id, owner_id, approve, "Booking decided");

        self.repository.bookings.get_details(booking_id).await
    }

    /// Cancel a WAITING or APPROVED booking. Only the booker may cancel.
    pub async fn cancel(&self, booker_id: i64, booking_id: i64) -> AppResult<BookingDetails> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;

        if booking.booker_id != booker_id {
            return Err(AppError::Forbidden(format!(
                "User {} is not the booker of booking {}",
                booker_id, booking_id
            )));
        }
        if !booking.status.can_transition_to(BookingStatus::Canceled) {
            return Err(AppError::Validation(format!(
                "Booking {} cannot be canceled from {}",
                booking_id, booking.status
            )));
        }

        self.repository
            .bookings
            .update_status(booking_id, booking.status, BookingStatus::Canceled)
            .await?;

        tracing::info!(booking_id, booker_id, "Booking canceled");

        self.repository.bookings.get_details(booking_id).await
    }

    /// Get a booking, readable only by its booker or the item's owner
    pub async fn get_booking(&self, viewer_id: i64, booking_id: i64) -> AppResult<BookingDetails> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;
        let item = self.repository.items.get_by_id(booking.item_id).await?;

        if booking.booker_id != viewer_id && item.owner_id != viewer_id {
            return Err(AppError::Forbidden(format!(
                "User {} may not view booking {}",
                viewer_id, booking_id
            )));
        }

        self.repository.bookings.get_details(booking_id).await
    }

    /// List bookings for a user as booker or owner, by state category
    pub async fn list_bookings(
        &self,
        user_id: i64,
        role: BookingRole,
        state: BookingState,
    ) -> AppResult<Vec<BookingDetails>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository
            .bookings
            .find_for_user(user_id, role, state)
            .await
    }
}
