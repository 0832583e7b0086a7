//! The fulfillment milestone vocabulary.

/// A fulfillment milestone of an order.
///
/// The declaration order is the fixed evaluation order used by the message
/// resolver: the first unmet milestone decides what each party sees next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    /// Seller accepted the order.
    Approved,
    /// Buyer paid.
    Paid,
    /// Seller handed the item to delivery.
    Delivered,
    /// Buyer picked the item up.
    Sold,
    /// Seller received the money.
    PaymentReceived,
}

impl Milestone {
    /// All milestones in evaluation order.
    pub const ALL: [Milestone; 5] = [
        Milestone::Approved,
        Milestone::Paid,
        Milestone::Delivered,
        Milestone::Sold,
        Milestone::PaymentReceived,
    ];

    /// The document field key for this milestone.
    pub fn key(&self) -> &'static str {
        match self {
            Milestone::Approved => "isApproved",
            Milestone::Paid => "isPaid",
            Milestone::Delivered => "isDelivered",
            Milestone::Sold => "isSold",
            Milestone::PaymentReceived => "isPaymentReceived",
        }
    }

    /// Maps a document field key back to its milestone.
    ///
    /// Returns `None` for unrecognized keys; callers decide whether that is
    /// an error or an ignored entry.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "isApproved" => Some(Milestone::Approved),
            "isPaid" => Some(Milestone::Paid),
            "isDelivered" => Some(Milestone::Delivered),
            "isSold" => Some(Milestone::Sold),
            "isPaymentReceived" => Some(Milestone::PaymentReceived),
            _ => None,
        }
    }
}

impl std::fmt::Display for Milestone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_order() {
        assert_eq!(
            Milestone::ALL,
            [
                Milestone::Approved,
                Milestone::Paid,
                Milestone::Delivered,
                Milestone::Sold,
                Milestone::PaymentReceived,
            ]
        );
    }

    #[test]
    fn test_key_roundtrip() {
        for milestone in Milestone::ALL {
            assert_eq!(Milestone::from_key(milestone.key()), Some(milestone));
        }
    }

    #[test]
    fn test_unrecognized_keys_map_to_none() {
        assert_eq!(Milestone::from_key("isShipped"), None);
        assert_eq!(Milestone::from_key("approved"), None);
        assert_eq!(Milestone::from_key(""), None);
    }

    #[test]
    fn test_display_uses_document_key() {
        assert_eq!(Milestone::PaymentReceived.to_string(), "isPaymentReceived");
    }
}
