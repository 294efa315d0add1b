//! ShareIt Item Sharing Service
//!
//! A Rust implementation of the ShareIt peer-to-peer item sharing server:
//! users list items, other users book them for a time window, owners approve
//! or reject the bookings, and past borrowers leave comments.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
