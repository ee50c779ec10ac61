use serde::{Deserialize, Serialize};

/// Purchase record stored in redb, keyed by (user id, video id).
/// Append-only; there is no update or delete operation on entitlements
/// other than the cascade when a video is removed from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// When the purchase was made (Unix timestamp)
    pub created_at: i64,
}
