//! API handlers for ShareIt REST endpoints

pub mod bookings;
pub mod health;
pub mod items;
pub mod openapi;
pub mod requests;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::{error::AppError, AppState};

/// Header carrying the id of the user making the request
pub const SHARER_USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// Extractor for the calling user's id from the X-Sharer-User-Id header
pub struct SharerId(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for SharerId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SHARER_USER_ID_HEADER)
            .ok_or_else(|| {
                AppError::Validation(format!("Missing {} header", SHARER_USER_ID_HEADER))
            })?;

        let id = value
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                AppError::Validation(format!("Invalid {} header", SHARER_USER_ID_HEADER))
            })?;

        Ok(SharerId(id))
    }
}
