//! Milestone state and the per-milestone history ledger.

use common::{Timestamp, UserId};
use serde::{Deserialize, Serialize};

use crate::Milestone;

/// The five milestone booleans of an order.
///
/// Absent keys in a stored document read as `false`, so orders written
/// before a milestone existed still load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MilestoneState {
    pub is_approved: bool,
    pub is_paid: bool,
    pub is_delivered: bool,
    pub is_sold: bool,
    pub is_payment_received: bool,
}

impl MilestoneState {
    /// Reads one milestone flag.
    pub fn get(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::Approved => self.is_approved,
            Milestone::Paid => self.is_paid,
            Milestone::Delivered => self.is_delivered,
            Milestone::Sold => self.is_sold,
            Milestone::PaymentReceived => self.is_payment_received,
        }
    }

    /// Writes one milestone flag.
    pub fn set(&mut self, milestone: Milestone, value: bool) {
        match milestone {
            Milestone::Approved => self.is_approved = value,
            Milestone::Paid => self.is_paid = value,
            Milestone::Delivered => self.is_delivered = value,
            Milestone::Sold => self.is_sold = value,
            Milestone::PaymentReceived => self.is_payment_received = value,
        }
    }

    /// Writes one milestone flag, builder-style.
    pub fn with(mut self, milestone: Milestone, value: bool) -> Self {
        self.set(milestone, value);
        self
    }

    /// The first milestone still `false` in evaluation order, or `None`
    /// when all five are met.
    pub fn first_unmet(&self) -> Option<Milestone> {
        Milestone::ALL
            .into_iter()
            .find(|milestone| !self.get(*milestone))
    }

    /// Returns true when every milestone is met.
    pub fn all_met(&self) -> bool {
        self.first_unmet().is_none()
    }
}

/// One history ledger entry: who set a milestone, when, and to what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Epoch milliseconds of the write.
    pub time: Timestamp,
    /// The caller who performed the write.
    pub user: UserId,
    /// The value the milestone was set to.
    pub value: bool,
}

impl HistoryEntry {
    /// Creates an entry for a milestone write.
    pub fn new(time: Timestamp, user: UserId, value: bool) -> Self {
        Self { time, user, value }
    }
}

/// Per-milestone history, last write wins per key.
///
/// A key is present only once its milestone has been explicitly written;
/// there is no entry for the initial all-false state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MilestoneHistory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_delivered: Option<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_sold: Option<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_payment_received: Option<HistoryEntry>,
}

impl MilestoneHistory {
    /// Reads the ledger entry for a milestone, if any write happened.
    pub fn entry(&self, milestone: Milestone) -> Option<&HistoryEntry> {
        match milestone {
            Milestone::Approved => self.is_approved.as_ref(),
            Milestone::Paid => self.is_paid.as_ref(),
            Milestone::Delivered => self.is_delivered.as_ref(),
            Milestone::Sold => self.is_sold.as_ref(),
            Milestone::PaymentReceived => self.is_payment_received.as_ref(),
        }
    }

    /// Records a write, replacing any earlier entry for the milestone.
    pub fn record(&mut self, milestone: Milestone, entry: HistoryEntry) {
        let slot = match milestone {
            Milestone::Approved => &mut self.is_approved,
            Milestone::Paid => &mut self.is_paid,
            Milestone::Delivered => &mut self.is_delivered,
            Milestone::Sold => &mut self.is_sold,
            Milestone::PaymentReceived => &mut self.is_payment_received,
        };
        *slot = Some(entry);
    }
}
