//! Status vocabularies for posts and orders.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a post (the listing an order is placed against).
///
/// Stored values outside the canonical set deserialize to `Unknown`
/// instead of failing; an unknown status never accepts orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Listed and accepting orders.
    Open,
    /// Reserved while an approved order runs its course.
    Hold,
    /// No longer for sale.
    Closed,
    /// Deserialization-only catch-all for foreign stored values.
    Unknown,
}

impl PostStatus {
    /// Maps a stored status string to the vocabulary, `Unknown` for
    /// anything outside it.
    pub fn parse(value: &str) -> Self {
        match value {
            "open" => PostStatus::Open,
            "hold" => PostStatus::Hold,
            "closed" => PostStatus::Closed,
            _ => PostStatus::Unknown,
        }
    }

    /// Returns true if orders can be placed against the post.
    pub fn accepts_orders(&self) -> bool {
        matches!(self, PostStatus::Open)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Open => "open",
            PostStatus::Hold => "hold",
            PostStatus::Closed => "closed",
            PostStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for PostStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(PostStatus::parse(&value))
    }
}

/// Lifecycle status of an order.
///
/// `Active` is the only status this subsystem assigns; `Canceled` and
/// `Completed` arrive from outside it. Stored values outside the canonical
/// set deserialize to `Unknown` and resolve to the unknown-status messages
/// rather than failing the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order in progress, milestones advancing.
    #[default]
    Active,
    /// Canceled before completion (terminal).
    Canceled,
    /// Fulfilled (terminal).
    Completed,
    /// Deserialization-only catch-all for foreign stored values.
    Unknown,
}

impl OrderStatus {
    /// Maps a stored status string to the vocabulary, `Unknown` for
    /// anything outside it.
    pub fn parse(value: &str) -> Self {
        match value {
            "active" => OrderStatus::Active,
            "canceled" => OrderStatus::Canceled,
            "completed" => OrderStatus::Completed,
            _ => OrderStatus::Unknown,
        }
    }

    /// Returns true for the three canonical statuses.
    pub fn is_known(&self) -> bool {
        !matches!(self, OrderStatus::Unknown)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "active",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Completed => "completed",
            OrderStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(OrderStatus::parse(&value))
    }
}
