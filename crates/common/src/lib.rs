//! Shared types for the marketplace backend.
//!
//! Every collection-crossing reference (users, posts, orders, chats, pickup
//! points) gets its own newtype so ids from different collections cannot be
//! mixed up, plus the epoch-millisecond [`Timestamp`] used throughout the
//! stored documents.

pub mod ids;
pub mod time;

pub use ids::{ChatId, OrderId, PointId, PostId, UserId};
pub use time::Timestamp;
