use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CommentId, Entity, ItemId, UserId};

/// A shopper comment on an item, optionally replying to another comment.
/// Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub item_id: ItemId,
    pub user_id: UserId,
    pub text: String,
    pub parent_id: Option<CommentId>,
    /// Placeholder; never incremented.
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn on_item(
        id: CommentId,
        user_id: UserId,
        item_id: ItemId,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            item_id,
            user_id,
            text: text.into(),
            parent_id: None,
            score: 0,
            created_at,
        }
    }

    /// A reply lives on the same item as its parent.
    pub fn reply_to(
        parent: &Comment,
        id: CommentId,
        user_id: UserId,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            item_id: parent.item_id,
            user_id,
            text: text.into(),
            parent_id: Some(parent.id),
            score: 0,
            created_at,
        }
    }
}

impl Entity for Comment {
    type Id = CommentId;
    const KIND: &'static str = "comment";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
