//! Booking model, lifecycle status and time-window helpers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use super::item::ItemShort;
use super::user::UserShort;

/// Lifecycle status of a booking.
///
/// A booking starts in `Waiting`. The item's owner decides it
/// (`Waiting -> Approved` or `Waiting -> Rejected`); the booker may cancel
/// it while it is still pending or after approval
/// (`Waiting -> Canceled`, `Approved -> Canceled`). `Rejected` and
/// `Canceled` are terminal. No other transition exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
        }
    }

    /// Single source of truth for legal status transitions.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Waiting, BookingStatus::Approved)
                | (BookingStatus::Waiting, BookingStatus::Rejected)
                | (BookingStatus::Waiting, BookingStatus::Canceled)
                | (BookingStatus::Approved, BookingStatus::Canceled)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELED" => Ok(BookingStatus::Canceled),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

// SQLx conversion for BookingStatus (stored as text)
impl sqlx::Type<Postgres> for BookingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// State category used when listing bookings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl std::str::FromStr for BookingState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(format!("Unknown state: {}", s)),
        }
    }
}

/// True when two half-open windows [a_start, a_end) and [b_start, b_end)
/// share at least one instant.
pub fn windows_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Booking model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub item_id: i64,
    pub booker_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BookingStatus,
}

/// Booking with booker and item attached, for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDetails {
    pub id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub booker: UserShort,
    pub item: ItemShort,
}

/// Create booking request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBooking {
    pub item_id: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Earliest/latest approved windows around a point in time, shown on an
/// item's detail view for its owner
#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
pub struct BookingWindow {
    /// End of the most recently finished approved booking
    pub last_booking: Option<DateTime<Utc>>,
    /// Start of the next upcoming approved booking
    pub next_booking: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn waiting_can_be_decided_or_canceled() {
        assert!(BookingStatus::Waiting.can_transition_to(BookingStatus::Approved));
        assert!(BookingStatus::Waiting.can_transition_to(BookingStatus::Rejected));
        assert!(BookingStatus::Waiting.can_transition_to(BookingStatus::Canceled));
    }

    #[test]
    fn approved_can_only_be_canceled() {
        assert!(BookingStatus::Approved.can_transition_to(BookingStatus::Canceled));
        assert!(!BookingStatus::Approved.can_transition_to(BookingStatus::Approved));
        assert!(!BookingStatus::Approved.can_transition_to(BookingStatus::Rejected));
        assert!(!BookingStatus::Approved.can_transition_to(BookingStatus::Waiting));
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        for terminal in [BookingStatus::Rejected, BookingStatus::Canceled] {
            for next in [
                BookingStatus::Waiting,
                BookingStatus::Approved,
                BookingStatus::Rejected,
                BookingStatus::Canceled,
            ] {
                assert!(!terminal.can_transition_to(next), "{terminal} -> {next}");
            }
        }
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            BookingStatus::Waiting,
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("PENDING".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn state_filter_parses_case_insensitively() {
        assert_eq!("future".parse::<BookingState>().unwrap(), BookingState::Future);
        assert_eq!("ALL".parse::<BookingState>().unwrap(), BookingState::All);
        assert!("SOON".parse::<BookingState>().is_err());
    }

    #[test]
    fn overlap_is_half_open() {
        // [10, 12) and [12, 14) only touch at the boundary
        assert!(!windows_overlap(ts(10), ts(12), ts(12), ts(14)));
        assert!(windows_overlap(ts(10), ts(12), ts(11), ts(14)));
        assert!(windows_overlap(ts(10), ts(14), ts(11), ts(12)));
        assert!(windows_overlap(ts(11), ts(12), ts(10), ts(14)));
        assert!(!windows_overlap(ts(10), ts(11), ts(12), ts(13)));
    }
}
