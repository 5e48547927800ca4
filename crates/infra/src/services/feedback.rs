use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use storefront_core::{CommentId, ItemId, UserId};
use storefront_inventory::{Comment, Item, Rating, average_rating};

use crate::locks::ItemLocks;
use crate::store::StoreHandles;

use super::{ServiceError, ServiceResult, not_found_on_missing};

/// Ratings and comments attached to items.
#[derive(Debug, Clone)]
pub struct FeedbackService {
    stores: StoreHandles,
    locks: Arc<ItemLocks>,
}

impl FeedbackService {
    pub fn new(stores: StoreHandles, locks: Arc<ItemLocks>) -> Self {
        Self { stores, locks }
    }

    /// Record (or replace) `user_id`'s score for an item and refresh the item's
    /// stored average.
    #[instrument(skip(self), fields(user_id = %user_id, item_id = %item_id), err)]
    pub fn rate_item(&self, user_id: UserId, item_id: ItemId, score: i32) -> ServiceResult<Item> {
        let rating = Rating::new(user_id, item_id, score)?;

        // Held so two raters cannot interleave the average recompute and the write.
        let slot = self.locks.slot(item_id)?;
        let _held = ItemLocks::acquire(&slot)?;

        let item = self
            .stores
            .items
            .get(item_id)?
            .ok_or_else(|| ServiceError::not_found(format!("item {item_id}")))?;
        self.stores.ratings.upsert(rating)?;

        let ratings = self.stores.ratings.list_for_item(item_id)?;
        let rated = item.with_rating(average_rating(&ratings));
        self.stores
            .items
            .update(rated.clone())
            .map_err(not_found_on_missing)?;
        Ok(rated)
    }

    /// Arithmetic mean of every score for the item; 0 when unrated.
    pub fn average_rating(&self, item_id: ItemId) -> ServiceResult<f64> {
        let ratings = self.stores.ratings.list_for_item(item_id)?;
        Ok(average_rating(&ratings))
    }

    #[instrument(skip(self, text), fields(user_id = %user_id, item_id = %item_id), err)]
    pub fn add_comment(
        &self,
        user_id: UserId,
        item_id: ItemId,
        text: impl Into<String>,
    ) -> ServiceResult<Comment> {
        if self.stores.items.get(item_id)?.is_none() {
            return Err(ServiceError::not_found(format!("item {item_id}")));
        }
        let comment = Comment::on_item(CommentId::new(), user_id, item_id, text, Utc::now());
        self.stores.comments.insert(comment.clone())?;
        Ok(comment)
    }

    /// Reply to an existing comment; the reply is filed under the parent's item.
    #[instrument(skip(self, text), fields(user_id = %user_id, parent_id = %parent_id), err)]
    pub fn reply_to_comment(
        &self,
        user_id: UserId,
        parent_id: CommentId,
        text: impl Into<String>,
    ) -> ServiceResult<Comment> {
        let parent = self
            .stores
            .comments
            .get(parent_id)?
            .ok_or_else(|| ServiceError::not_found(format!("comment {parent_id}")))?;
        let reply = Comment::reply_to(&parent, CommentId::new(), user_id, text, Utc::now());
        self.stores.comments.insert(reply.clone())?;
        Ok(reply)
    }

    pub fn item_comments(&self, item_id: ItemId) -> ServiceResult<Vec<Comment>> {
        Ok(self.stores.comments.list_for_item(item_id)?)
    }

    pub fn comment_replies(&self, parent_id: CommentId) -> ServiceResult<Vec<Comment>> {
        Ok(self.stores.comments.replies_to(parent_id)?)
    }
}
