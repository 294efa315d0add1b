//! Bookings repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingDetails, BookingState, BookingStatus, BookingWindow},
        item::ItemShort,
        user::UserShort,
    },
};

/// Listing role: bookings made by the user, or bookings on the user's items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingRole {
    Booker,
    Owner,
}

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }

    /// Get booking with booker and item attached
    pub async fn get_details(&self, id: i64) -> AppResult<BookingDetails> {
        let row = sqlx::query(
            r#"
            SELECT b.id, b.start_date, b.end_date, b.status,
                   u.id as booker_id, u.name as booker_name,
                   i.id as item_id, i.name as item_name
            FROM bookings b
            JOIN users u ON b.booker_id = u.id
            JOIN items i ON b.item_id = i.id
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))?;

        Ok(BookingDetails {
            id: row.get("id"),
            start: row.get("start_date"),
            end: row.get("end_date"),
            status: row.get("status"),
            booker: UserShort {
                id: row.get("booker_id"),
                name: row.get("booker_name"),
            },
            item: ItemShort {
                id: row.get("item_id"),
                name: row.get("item_name"),
            },
        })
    }

    /// Create a new booking in WAITING state
    pub async fn create(
        &self,
        booker_id: i64,
        item_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO bookings (item_id, booker_id, start_date, end_date, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(item_id)
        .bind(booker_id)
        .bind(start)
        .bind(end)
        .bind(BookingStatus::Waiting)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Check whether any APPROVED booking on the item intersects
    /// [start, end). Advisory only outside a transaction; the binding check
    /// happens again in [`decide`](Self::decide) under the item row lock.
    pub async fn has_approved_overlap(
        &self,
        item_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<bool> {
        let overlap: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE item_id = $1 AND status = 'APPROVED'
                  AND start_date < $3 AND end_date > $2
            )
            "#,
        )
        .bind(item_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(overlap)
    }

    /// Decide a WAITING booking. Approvals on the same item are serialized
    /// through a `FOR UPDATE` lock on the item row, so the overlap check
    /// observes a consistent snapshot of APPROVED bookings: two overlapping
    /// WAITING bookings can never both reach APPROVED.
    pub async fn decide(&self, booking_id: i64, item_id: i64, approve: bool) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM items WHERE id = $1 FOR UPDATE")
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;

        // Re-read the booking under its own row lock: a concurrent decision
        // or cancellation may have landed between the caller's load and our
        // lock acquisition, and cancel does not take the item lock.
        let booking =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
                .bind(booking_id)
                .fetch_one(&mut *tx)
                .await?;

        if booking.status != BookingStatus::Waiting {
            return Err(AppError::Validation(format!(
                "Booking {} is already decided ({})",
                booking_id, booking.status
            )));
        }

        if approve {
            let overlap: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM bookings
                    WHERE item_id = $1 AND status = 'APPROVED'
                      AND start_date < $3 AND end_date > $2
                )
                "#,
            )
            .bind(item_id)
            .bind(booking.start_date)
            .bind(booking.end_date)
            .fetch_one(&mut *tx)
            .await?;

            if overlap {
                return Err(AppError::Conflict(format!(
                    "Booking {} overlaps an approved booking on item {}",
                    booking_id, item_id
                )));
            }
        }

        let status = if approve {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };

        // Current status is part of the predicate, as in update_status
        let result =
            sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2 AND status = 'WAITING'")
                .bind(status)
                .bind(booking_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Validation(format!(
                "Booking {} is no longer WAITING",
                booking_id
            )));
        }

        tx.commit().await?;

        Ok(Booking { status, ..booking })
    }

    /// Transition a booking out of `expected` into `status`. The current
    /// status is part of the predicate, so a concurrent transition makes
    /// this a no-op instead of clobbering it.
    pub async fn update_status(
        &self,
        booking_id: i64,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2 AND status = $3")
            .bind(status)
            .bind(booking_id)
            .bind(expected)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Validation(format!(
                "Booking {} is no longer {}",
                booking_id, expected
            )));
        }

        Ok(())
    }

    /// List bookings where the user is the booker or the items' owner,
    /// filtered by state category, newest start first
    pub async fn find_for_user(
        &self,
        user_id: i64,
        role: BookingRole,
        state: BookingState,
    ) -> AppResult<Vec<BookingDetails>> {
        let user_condition = match role {
            BookingRole::Booker => "b.booker_id = $1",
            BookingRole::Owner => "i.owner_id = $1",
        };

        let state_condition = match state {
            BookingState::All => "",
            BookingState::Current => " AND b.start_date <= $2 AND b.end_date >= $2",
            BookingState::Past => " AND b.end_date < $2",
            BookingState::Future => " AND b.start_date > $2",
            BookingState::Waiting => " AND b.status = 'WAITING'",
            BookingState::Rejected => " AND b.status = 'REJECTED'",
        };

        let query = format!(
            r#"
            SELECT b.id, b.start_date, b.end_date, b.status,
                   u.id as booker_id, u.name as booker_name,
                   i.id as item_id, i.name as item_name
            FROM bookings b
            JOIN users u ON b.booker_id = u.id
            JOIN items i ON b.item_id = i.id
            WHERE {}{}
            ORDER BY b.start_date DESC
            "#,
            user_condition, state_condition
        );

        let mut builder = sqlx::query(&query).bind(user_id);
        if matches!(
            state,
            BookingState::Current | BookingState::Past | BookingState::Future
        ) {
            builder = builder.bind(Utc::now());
        }

        let rows = builder.fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|row| BookingDetails {
                id: row.get("id"),
                start: row.get("start_date"),
                end: row.get("end_date"),
                status: row.get("status"),
                booker: UserShort {
                    id: row.get("booker_id"),
                    name: row.get("booker_name"),
                },
                item: ItemShort {
                    id: row.get("item_id"),
                    name: row.get("item_name"),
                },
            })
            .collect())
    }

    /// True when the user has an APPROVED booking of the item that ended
    /// before `at` (comment eligibility)
    pub async fn has_completed_booking(
        &self,
        booker_id: i64,
        item_id: i64,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE booker_id = $1 AND item_id = $2
                  AND status = 'APPROVED' AND end_date < $3
            )
            "#,
        )
        .bind(booker_id)
        .bind(item_id)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Last finished and next upcoming APPROVED windows around `at`
    pub async fn booking_window(&self, item_id: i64, at: DateTime<Utc>) -> AppResult<BookingWindow> {
        let last_booking: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            SELECT MAX(end_date) FROM bookings
            WHERE item_id = $1 AND status = 'APPROVED' AND end_date < $2
            "#,
        )
        .bind(item_id)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        let next_booking: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            SELECT MIN(start_date) FROM bookings
            WHERE item_id = $1 AND status = 'APPROVED' AND start_date > $2
            "#,
        )
        .bind(item_id)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;

        Ok(BookingWindow {
            last_booking,
            next_booking,
        })
    }
}
