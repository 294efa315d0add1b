//! Item model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::booking::BookingWindow;
use super::comment::CommentDetails;

/// Item model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Owner-controlled "listed" flag, independent of booking state
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

/// Short item reference embedded in booking views
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ItemShort {
    pub id: i64,
    pub name: String,
}

/// Item with booking window and comments, for detail views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemDetails {
    #[serde(flatten)]
    pub item: Item,
    pub last_booking: Option<chrono::DateTime<chrono::Utc>>,
    pub next_booking: Option<chrono::DateTime<chrono::Utc>>,
    pub comments: Vec<CommentDetails>,
}

impl ItemDetails {
    pub fn new(item: Item, window: BookingWindow, comments: Vec<CommentDetails>) -> Self {
        Self {
            item,
            last_booking: window.last_booking,
            next_booking: window.next_booking,
            comments,
        }
    }
}

/// Create item request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be blank"))]
    pub description: String,
    pub available: bool,
    /// Request this item answers, if any
    pub request_id: Option<i64>,
}

/// Partial item update, owner only. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "description must not be blank"))]
    pub description: Option<String>,
    pub available: Option<bool>,
}

impl UpdateItem {
    /// Apply the patch to an existing item
    pub fn apply(&self, item: &mut Item) {
        if let Some(ref name) = self.name {
            item.name = name.clone();
        }
        if let Some(ref description) = self.description {
            item.description = description.clone();
        }
        if let Some(available) = self.available {
            item.available = available;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        Item {
            id: 3,
            name: "Drill".to_string(),
            description: "Cordless drill".to_string(),
            available: true,
            owner_id: 1,
            request_id: None,
        }
    }

    #[test]
    fn patch_flips_availability_without_touching_text() {
        let mut it = item();
        let patch = UpdateItem {
            available: Some(false),
            ..Default::default()
        };
        patch.apply(&mut it);

        assert!(!it.available);
        assert_eq!(it.name, "Drill");
        assert_eq!(it.description, "Cordless drill");
    }

    #[test]
    fn patch_never_changes_owner() {
        let mut it = item();
        let patch = UpdateItem {
            name: Some("Hammer drill".to_string()),
            description: Some("SDS drill".to_string()),
            available: Some(true),
        };
        patch.apply(&mut it);

        assert_eq!(it.owner_id, 1);
        assert_eq!(it.name, "Hammer drill");
    }
}
