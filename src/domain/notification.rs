//! App Store server notification (version 1) wire records.
//!
//! https://developer.apple.com/documentation/appstoreservernotifications/responsebody

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::{DisplayFromStr, TimestampMilliSeconds, serde_as, skip_serializing_none};

use crate::domain::receipt::{Environment, ExpirationIntent, LatestReceiptInfo, PendingRenewalInfo};
use crate::domain::value::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Subscription or refund event that triggered a notification.
pub enum NotificationType {
    /// Customer support canceled the subscription or the customer upgraded.
    Cancel,
    /// A plan change that takes effect at the next renewal.
    DidChangeRenewalPref,
    DidChangeRenewalStatus,
    /// Renewal failed because of a billing issue.
    DidFailToRenew,
    /// An expired subscription that previously failed to renew was recovered.
    DidRecover,
    DidRenew,
    InitialBuy,
    InteractiveRenewal,
    PriceIncreaseConsent,
    Refund,

    #[serde(untagged)]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Environment value used by notifications, which spells production `PROD`.
pub enum NotificationEnvironment {
    Sandbox,
    #[serde(rename = "PROD")]
    Production,

    #[serde(untagged)]
    Unknown(String),
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Most recent in-app purchase transactions for the app (`unified_receipt`).
pub struct UnifiedReceipt {
    pub environment: Option<Environment>,
    #[serde_as(as = "Option<Base64>")]
    pub latest_receipt: Option<Vec<u8>>,
    /// Latest 100 transactions, in the same shape as the verification response.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub latest_receipt_info: Vec<LatestReceiptInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_renewal_info: Vec<PendingRenewalInfo>,
    /// `0` when the notification is valid.
    pub status: Option<StatusCode>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Server-to-server notification body.
///
/// Which fields are present depends on `notification_type`.
pub struct Notification {
    /// Identifier of the subscription being renewed. Treat as a 64-bit integer.
    pub auto_renew_adam_id: Option<String>,
    pub auto_renew_product_id: Option<String>,
    /// `true` or `false` on the wire, unlike the receipt's `0`/`1`.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub auto_renew_status: Option<bool>,
    pub auto_renew_status_change_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub auto_renew_status_change_date_ms: Option<DateTime<Utc>>,
    pub auto_renew_status_change_date_pst: Option<String>,
    pub environment: Option<NotificationEnvironment>,
    pub expiration_intent: Option<ExpirationIntent>,
    pub notification_type: Option<NotificationType>,
    /// Echo of the shared secret submitted when verifying receipts.
    pub password: Option<String>,
    pub unified_receipt: Option<UnifiedReceipt>,
    /// App bundle id.
    pub bid: Option<String>,
    /// App bundle version.
    pub bvrs: Option<String>,
}
