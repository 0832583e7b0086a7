pub mod chat;
pub mod messages;
pub mod milestone;
pub mod order;
pub mod pickup;
pub mod post;
pub mod price;
pub mod profile;
pub mod state;
pub mod status;

pub use chat::Chat;
pub use messages::{MessageKey, OrderMessages, resolve_order_messages};
pub use milestone::Milestone;
pub use order::Order;
pub use pickup::{GeoPoint, PickupPoint};
pub use post::Post;
pub use price::Price;
pub use profile::UserProfile;
pub use state::{HistoryEntry, MilestoneHistory, MilestoneState};
pub use status::{OrderStatus, PostStatus};
