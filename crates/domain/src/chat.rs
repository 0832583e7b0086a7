//! The chat document linking the two parties of a post.

use common::{ChatId, PostId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A chat as stored in the `chats` collection.
///
/// Order creation ensures exactly one chat exists per (post, buyer,
/// seller); everything beyond that (the messages themselves) belongs to
/// another subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    /// The chat's own id, mirrored into the body as stored.
    pub chat_id: ChatId,
    pub post_id: PostId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// The two parties, buyer first.
    pub participants: Vec<UserId>,
}

impl Chat {
    /// Builds a fresh chat between a buyer and a seller over a post.
    pub fn new(
        chat_id: ChatId,
        post_id: PostId,
        buyer: UserId,
        seller: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            chat_id,
            post_id,
            created_at: now,
            updated_at: now,
            participants: vec![buyer, seller],
        }
    }
}
