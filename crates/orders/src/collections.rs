//! Collection names in the document store.

pub const ORDERS: &str = "orders";
pub const POSTS: &str = "posts";
pub const CHATS: &str = "chats";
pub const PICKUP_POINTS: &str = "pickup_points";
