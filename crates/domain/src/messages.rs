//! Status-dependent progress messages for the two parties of an order.

use serde::{Deserialize, Serialize};

use crate::{Milestone, MilestoneState, OrderStatus};

/// Localization keys for order progress messages.
///
/// Clients translate these; the backend never renders display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKey {
    WaitingForApproval,
    NeedToApprove,
    NeedToPay,
    WaitingForPayment,
    WaitingForDelivery,
    NeedToDeliver,
    NeedToReceiveOrder,
    WaitingForPickup,
    OrderReceived,
    WaitingForMoney,
    SuccessfulPurchase,
    SuccessfulSale,
    NeedToReturnOrder,
    NeedToReturnMoney,
    NeedToReceiveYourMoney,
    NeedToReceiveYourOrder,
    SuccessfullyCanceled,
    SuccessfullyCompleted,
    UnknownStatus,
}

impl MessageKey {
    /// Returns the key as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::WaitingForApproval => "waiting_for_approval",
            MessageKey::NeedToApprove => "need_to_approve",
            MessageKey::NeedToPay => "need_to_pay",
            MessageKey::WaitingForPayment => "waiting_for_payment",
            MessageKey::WaitingForDelivery => "waiting_for_delivery",
            MessageKey::NeedToDeliver => "need_to_deliver",
            MessageKey::NeedToReceiveOrder => "need_to_receive_order",
            MessageKey::WaitingForPickup => "waiting_for_pickup",
            MessageKey::OrderReceived => "order_received",
            MessageKey::WaitingForMoney => "waiting_for_money",
            MessageKey::SuccessfulPurchase => "successful_purchase",
            MessageKey::SuccessfulSale => "successful_sale",
            MessageKey::NeedToReturnOrder => "need_to_return_order",
            MessageKey::NeedToReturnMoney => "need_to_return_money",
            MessageKey::NeedToReceiveYourMoney => "need_to_receive_your_money",
            MessageKey::NeedToReceiveYourOrder => "need_to_receive_your_order",
            MessageKey::SuccessfullyCanceled => "successfully_canceled",
            MessageKey::SuccessfullyCompleted => "successfully_completed",
            MessageKey::UnknownStatus => "unknown_status",
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The message pair shown to the two parties of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMessages {
    pub buyer: MessageKey,
    pub seller: MessageKey,
}

impl OrderMessages {
    fn both(key: MessageKey) -> Self {
        Self {
            buyer: key,
            seller: key,
        }
    }
}

/// Resolves the progress messages for an order from its status and
/// milestone state.
///
/// Pure and total: every `(status, state)` combination maps to a message
/// pair, including foreign statuses, which degrade to `unknown_status`.
pub fn resolve_order_messages(status: OrderStatus, state: &MilestoneState) -> OrderMessages {
    match status {
        OrderStatus::Active => resolve_active(state),
        OrderStatus::Canceled => resolve_canceled(state),
        OrderStatus::Completed => OrderMessages::both(MessageKey::SuccessfullyCompleted),
        OrderStatus::Unknown => OrderMessages::both(MessageKey::UnknownStatus),
    }
}

/// Active orders: the first unmet milestone in evaluation order decides
/// what each party should do next.
fn resolve_active(state: &MilestoneState) -> OrderMessages {
    use MessageKey::*;

    let (buyer, seller) = match state.first_unmet() {
        Some(Milestone::Approved) => (WaitingForApproval, NeedToApprove),
        Some(Milestone::Paid) => (NeedToPay, WaitingForPayment),
        Some(Milestone::Delivered) => (WaitingForDelivery, NeedToDeliver),
        Some(Milestone::Sold) => (NeedToReceiveOrder, WaitingForPickup),
        Some(Milestone::PaymentReceived) => (OrderReceived, WaitingForMoney),
        None => (SuccessfulPurchase, SuccessfulSale),
    };
    OrderMessages { buyer, seller }
}

/// Canceled orders: only what was paid and what was shipped matters for
/// who still owes whom.
fn resolve_canceled(state: &MilestoneState) -> OrderMessages {
    use MessageKey::*;

    let (buyer, seller) = match (state.is_paid, state.is_delivered) {
        (true, true) => (NeedToReturnOrder, NeedToReturnMoney),
        (true, false) => (NeedToReceiveYourMoney, SuccessfullyCanceled),
        (false, true) => (SuccessfullyCanceled, NeedToReceiveYourOrder),
        (false, false) => (SuccessfullyCanceled, SuccessfullyCanceled),
    };
    OrderMessages { buyer, seller }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_met() -> MilestoneState {
        let mut state = MilestoneState::default();
        for milestone in Milestone::ALL {
            state.set(milestone, true);
        }
        state
    }

    /// Every state combination for exhaustive checks.
    fn all_states() -> Vec<MilestoneState> {
        (0..32u8)
            .map(|bits| {
                let mut state = MilestoneState::default();
                for (index, milestone) in Milestone::ALL.into_iter().enumerate() {
                    state.set(milestone, bits & (1 << index) != 0);
                }
                state
            })
            .collect()
    }

    #[test]
    fn test_active_all_false_awaits_approval() {
        let messages = resolve_order_messages(OrderStatus::Active, &MilestoneState::default());
        assert_eq!(messages.buyer, MessageKey::WaitingForApproval);
        assert_eq!(messages.seller, MessageKey::NeedToApprove);
    }

    #[test]
    fn test_active_walks_milestones_in_order() {
        let mut state = MilestoneState::default();

        state.set(Milestone::Approved, true);
        let messages = resolve_order_messages(OrderStatus::Active, &state);
        assert_eq!(messages.buyer, MessageKey::NeedToPay);
        assert_eq!(messages.seller, MessageKey::WaitingForPayment);

        state.set(Milestone::Paid, true);
        let messages = resolve_order_messages(OrderStatus::Active, &state);
        assert_eq!(messages.buyer, MessageKey::WaitingForDelivery);
        assert_eq!(messages.seller, MessageKey::NeedToDeliver);

        state.set(Milestone::Delivered, true);
        let messages = resolve_order_messages(OrderStatus::Active, &state);
        assert_eq!(messages.buyer, MessageKey::NeedToReceiveOrder);
        assert_eq!(messages.seller, MessageKey::WaitingForPickup);

        state.set(Milestone::Sold, true);
        let messages = resolve_order_messages(OrderStatus::Active, &state);
        assert_eq!(messages.buyer, MessageKey::OrderReceived);
        assert_eq!(messages.seller, MessageKey::WaitingForMoney);
    }

    #[test]
    fn test_active_all_met_is_a_successful_deal() {
        let messages = resolve_order_messages(OrderStatus::Active, &all_met());
        assert_eq!(messages.buyer, MessageKey::SuccessfulPurchase);
        assert_eq!(messages.seller, MessageKey::SuccessfulSale);
    }

    #[test]
    fn test_canceled_depends_only_on_paid_and_delivered() {
        let paid_only = MilestoneState::default().with(Milestone::Paid, true);
        let messages = resolve_order_messages(OrderStatus::Canceled, &paid_only);
        assert_eq!(messages.buyer, MessageKey::NeedToReceiveYourMoney);
        assert_eq!(messages.seller, MessageKey::SuccessfullyCanceled);

        let delivered_only = MilestoneState::default().with(Milestone::Delivered, true);
        let messages = resolve_order_messages(OrderStatus::Canceled, &delivered_only);
        assert_eq!(messages.buyer, MessageKey::SuccessfullyCanceled);
        assert_eq!(messages.seller, MessageKey::NeedToReceiveYourOrder);

        let both = MilestoneState::default()
            .with(Milestone::Paid, true)
            .with(Milestone::Delivered, true);
        let messages = resolve_order_messages(OrderStatus::Canceled, &both);
        assert_eq!(messages.buyer, MessageKey::NeedToReturnOrder);
        assert_eq!(messages.seller, MessageKey::NeedToReturnMoney);

        let neither = MilestoneState::default();
        let messages = resolve_order_messages(OrderStatus::Canceled, &neither);
        assert_eq!(messages.buyer, MessageKey::SuccessfullyCanceled);
        assert_eq!(messages.seller, MessageKey::SuccessfullyCanceled);

        // The other three milestones do not influence the canceled branch.
        let noisy = MilestoneState::default()
            .with(Milestone::Approved, true)
            .with(Milestone::Sold, true)
            .with(Milestone::PaymentReceived, true);
        let messages = resolve_order_messages(OrderStatus::Canceled, &noisy);
        assert_eq!(messages.buyer, MessageKey::SuccessfullyCanceled);
        assert_eq!(messages.seller, MessageKey::SuccessfullyCanceled);
    }

    #[test]
    fn test_completed_ignores_milestones() {
        for state in all_states() {
            let messages = resolve_order_messages(OrderStatus::Completed, &state);
            assert_eq!(messages.buyer, MessageKey::SuccessfullyCompleted);
            assert_eq!(messages.seller, MessageKey::SuccessfullyCompleted);
        }
    }

    #[test]
    fn test_unknown_status_degrades_instead_of_failing() {
        let status = OrderStatus::parse("bogus_status");
        for state in all_states() {
            let messages = resolve_order_messages(status, &state);
            assert_eq!(messages.buyer, MessageKey::UnknownStatus);
            assert_eq!(messages.seller, MessageKey::UnknownStatus);
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        for status in [
            OrderStatus::Active,
            OrderStatus::Canceled,
            OrderStatus::Completed,
            OrderStatus::Unknown,
        ] {
            for state in all_states() {
                let first = resolve_order_messages(status, &state);
                let second = resolve_order_messages(status, &state);
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn test_message_keys_serialize_to_snake_case() {
        let json = serde_json::to_string(&MessageKey::WaitingForApproval).unwrap();
        assert_eq!(json, "\"waiting_for_approval\"");
        assert_eq!(
            serde_json::to_string(&MessageKey::NeedToReceiveYourMoney).unwrap(),
            "\"need_to_receive_your_money\""
        );

        let messages = OrderMessages {
            buyer: MessageKey::SuccessfulPurchase,
            seller: MessageKey::SuccessfulSale,
        };
        assert_eq!(
            serde_json::to_value(&messages).unwrap(),
            serde_json::json!({"buyer": "successful_purchase", "seller": "successful_sale"})
        );
    }

    #[test]
    fn test_as_str_matches_serde_rendering() {
        for key in [
            MessageKey::WaitingForApproval,
            MessageKey::NeedToApprove,
            MessageKey::NeedToPay,
            MessageKey::WaitingForPayment,
            MessageKey::WaitingForDelivery,
            MessageKey::NeedToDeliver,
            MessageKey::NeedToReceiveOrder,
            MessageKey::WaitingForPickup,
            MessageKey::OrderReceived,
            MessageKey::WaitingForMoney,
            MessageKey::SuccessfulPurchase,
            MessageKey::SuccessfulSale,
            MessageKey::NeedToReturnOrder,
            MessageKey::NeedToReturnMoney,
            MessageKey::NeedToReceiveYourMoney,
            MessageKey::NeedToReceiveYourOrder,
            MessageKey::SuccessfullyCanceled,
            MessageKey::SuccessfullyCompleted,
            MessageKey::UnknownStatus,
        ] {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }
}
