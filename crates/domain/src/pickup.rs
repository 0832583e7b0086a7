//! Pickup point documents.

use serde::{Deserialize, Serialize};

/// Geographic coordinates of a pickup point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A pickup point as stored in the `pickup_points` collection.
///
/// Read-only for this subsystem: orders reference one by id and responses
/// attach it for display. Fields are defaulted because the documents are
/// maintained elsewhere and may be sparse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickupPoint {
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPoint>,
    pub working_hours: String,
}
