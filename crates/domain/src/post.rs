//! The post (listing) document, as far as orders read it.

use common::UserId;
use serde::{Deserialize, Serialize};

use crate::{PostStatus, Price};

/// A post as stored in the `posts` collection.
///
/// Posts are owned by another subsystem; only the fields the order flow
/// reads are modeled, everything else in the stored document is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    pub price: Price,
    pub status: PostStatus,
    /// The owner, who becomes the seller of any order on this post.
    pub user_id: UserId,
    /// Image URLs in display order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Post {
    /// The image shown in order summaries: the first one, or an empty
    /// string when the post has none.
    pub fn preview_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_image_is_first_or_empty() {
        let mut post: Post = serde_json::from_value(serde_json::json!({
            "title": "Bike",
            "price": 4500,
            "status": "open",
            "userId": "seller-1",
            "images": ["a.jpg", "b.jpg"],
        }))
        .unwrap();
        assert_eq!(post.preview_image(), "a.jpg");

        post.images.clear();
        assert_eq!(post.preview_image(), "");
    }

    #[test]
    fn test_extra_stored_fields_are_ignored() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "title": "Sofa",
            "price": 900,
            "status": "hold",
            "userId": "seller-2",
            "description": "three seats",
            "category": "furniture",
        }))
        .unwrap();
        assert_eq!(post.status, PostStatus::Hold);
        assert!(post.images.is_empty());
    }
}
