//! Item management service
//!
//! Item CRUD and search, plus the two read-model concerns that hang off an
//! item: the last/next approved booking window shown to the owner, and
//! comment creation gated by rental eligibility.

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::BookingWindow,
        comment::{CommentDetails, CreateComment},
        item::{CreateItem, Item, ItemDetails, UpdateItem},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new item. A dangling request reference is tolerated: the
    /// link is dropped rather than failing the creation.
    pub async fn create_item(&self, owner_id: i64, item: CreateItem) -> AppResult<Item> {
        item.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.users.get_by_id(owner_id).await?;

        let request_id = match item.request_id {
            Some(id) => match self.repository.requests.get_by_id(id).await {
                Ok(request) => Some(request.id),
                Err(AppError::NotFound(_)) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };

        self.repository.items.create(owner_id, &item, request_id).await
    }

    /// Update an item. Non-owners get NotFound, not Forbidden: the item's
    /// existence is not revealed to them.
    pub async fn update_item(
        &self,
        owner_id: i64,
        item_id: i64,
        patch: UpdateItem,
    ) -> AppResult<Item> {
        patch
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.users.get_by_id(owner_id).await?;
        let mut item = self.repository.items.get_by_id(item_id).await?;

        if item.owner_id != owner_id {
            return Err(AppError::NotFound(format!(
                "Item with id {} not found",
                item_id
            )));
        }

        patch.apply(&mut item);
        self.repository.items.update(&item).await
    }

    /// Item detail view. The approved-booking window is only revealed to
    /// the owner; comments are visible to everyone.
    pub async fn get_item(&self, viewer_id: i64, item_id: i64) -> AppResult<ItemDetails> {
        let item = self.repository.items.get_by_id(item_id).await?;
        let window = if item.owner_id == viewer_id {
            self.load_window(item_id).await
        } else {
            BookingWindow::default()
        };
        let comments = self.repository.comments.find_by_item(item_id).await?;

        Ok(ItemDetails::new(item, window, comments))
    }

    /// All items of an owner, each with booking window and comments
    pub async fn get_owner_items(&self, owner_id: i64) -> AppResult<Vec<ItemDetails>> {
        self.repository.users.get_by_id(owner_id).await?;
        let items = self.repository.items.find_by_owner(owner_id).await?;

        let mut result = Vec::with_capacity(items.len());
        for item in items {
            let window = self.load_window(item.id).await;
            let comments = self.repository.comments.find_by_item(item.id).await?;
            result.push(ItemDetails::new(item, window, comments));
        }

        Ok(result)
    }

    /// Search available items by text; blank text yields an empty list
    pub async fn search_items(&self, text: &str) -> AppResult<Vec<Item>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.repository.items.search(text).await
    }

    /// Create a comment. The author must have completed an approved
    /// rental of the item (approved booking that ended in the past).
    pub async fn create_comment(
        &self,
        author_id: i64,
        item_id: i64,
        comment: CreateComment,
    ) -> AppResult<CommentDetails> {
        comment
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let author = self.repository.users.get_by_id(author_id).await?;
        let item = self.repository.items.get_by_id(item_id).await?;

        let now = Utc::now();
        if !self
            .repository
            .bookings
            .has_completed_booking(author_id, item.id, now)
            .await?
        {
            return Err(AppError::Validation(format!(
                "User {} has not completed a rental of item {}",
                author_id, item.id
            )));
        }

        let created = self
            .repository
            .comments
            .create(item.id, author_id, &comment.text, now)
            .await?;

        Ok(CommentDetails {
            id: created.id,
            text: created.text,
            author_name: author.name,
            created: created.created,
        })
    }

    /// Display-only aggregation: a failed window lookup degrades to an
    /// empty window instead of failing the whole view.
    async fn load_window(&self, item_id: i64) -> BookingWindow {
        match self
            .repository
            .bookings
            .booking_window(item_id, Utc::now())
            .await
        {
            Ok(window) => window,
            Err(e) => {
                tracing::warn!(item_id, "Failed to load booking window: {}", e);
                BookingWindow::default()
            }
        }
    }
}
