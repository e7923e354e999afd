//! Wire records returned by `verifyReceipt`.
//!
//! These types carry no behavior. Field names match the JSON keys, absent keys
//! stay `None`, and string-coded values that this crate does not recognize are
//! kept verbatim in `Unknown` variants so that re-serializing is lossless.
//!
//! https://developer.apple.com/documentation/appstorereceipts/responsebody

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, TimestampMilliSeconds, serde_as, skip_serializing_none};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Environment that generated a receipt.
pub enum Environment {
    Sandbox,
    Production,

    #[serde(untagged)]
    Unknown(String),
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sandbox => "Sandbox",
            Self::Production => "Production",
            Self::Unknown(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Whether a transaction belongs to the purchaser or a Family Sharing member.
pub enum InAppOwnershipType {
    FamilyShared,
    Purchased,

    #[serde(untagged)]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Renewal status of an auto-renewable subscription.
///
/// Not the subscription's state; a customer with renewal off may still be
/// inside a paid period.
pub enum AutoRenewStatus {
    /// The customer turned off automatic renewal.
    #[serde(rename = "0")]
    Off,
    /// The subscription renews at the end of the current period.
    #[serde(rename = "1")]
    On,

    #[serde(untagged)]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Whether the App Store is still trying to renew an expired subscription.
pub enum BillingRetryStatus {
    #[serde(rename = "0")]
    StoppedAttemptingRenewal,
    #[serde(rename = "1")]
    AttemptingRenewal,

    #[serde(untagged)]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Reason a subscription expired.
pub enum ExpirationIntent {
    #[serde(rename = "1")]
    VoluntarilyCancelled,
    /// For example, the payment method is no longer valid.
    #[serde(rename = "2")]
    BillingIssue,
    #[serde(rename = "3")]
    DidNotAcceptPriceIncrease,
    #[serde(rename = "4")]
    ProductNotAvailable,
    #[serde(rename = "5")]
    Other,

    #[serde(untagged)]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Customer consent to a subscription price increase.
///
/// The key is absent when the App Store has not asked for consent.
pub enum PriceConsentStatus {
    #[serde(rename = "0")]
    AwaitingConsent,
    #[serde(rename = "1")]
    Consented,

    #[serde(untagged)]
    Unknown(String),
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Decoded app receipt (`receipt`).
pub struct Receipt {
    /// `receipt_type`, e.g. `Production` or `ProductionSandbox`.
    pub receipt_type: Option<String>,
    pub app_item_id: Option<u64>,
    /// The app's bundle identifier (`CFBundleIdentifier`).
    pub bundle_id: Option<String>,
    /// The app's version number (`CFBundleVersion` on iOS).
    pub application_version: Option<String>,
    /// In-app purchase receipts found in the submitted receipt data.
    ///
    /// An empty list is a valid receipt. Consumables disappear once the app
    /// finishes their transaction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub in_app: Vec<InAppPurchaseReceipt>,
    /// Version of the app that was originally purchased. Always `1.0` in the
    /// sandbox.
    pub original_application_version: Option<String>,
    pub original_purchase_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub original_purchase_date_ms: Option<DateTime<Utc>>,
    pub creation_date: Option<String>,
    pub receipt_creation_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub receipt_creation_date_ms: Option<DateTime<Utc>>,
    pub request_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub request_date_ms: Option<DateTime<Utc>>,
    /// Present only for Volume Purchase Program apps.
    pub expiration_date: Option<String>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// One in-app purchase transaction inside [`Receipt::in_app`].
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt/in_app
pub struct InAppPurchaseReceipt {
    /// Refund or upgrade time. Present only for refunded transactions.
    pub cancellation_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub cancellation_date_ms: Option<DateTime<Utc>>,
    pub cancellation_date_pst: Option<String>,
    /// `1` for an issue within the app, `0` for any other reason.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub cancellation_reason: Option<u8>,
    pub expires_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub expires_date_ms: Option<DateTime<Utc>>,
    pub expires_date_pst: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub is_in_intro_offer_period: Option<bool>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub is_trial_period: Option<bool>,
    /// Present only for upgrade transactions.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub is_upgraded: Option<bool>,
    pub offer_code_ref_name: Option<String>,
    pub original_purchase_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub original_purchase_date_ms: Option<DateTime<Utc>>,
    pub original_purchase_date_pst: Option<String>,
    pub original_transaction_id: Option<String>,
    pub product_id: Option<String>,
    pub promotional_offer_id: Option<String>,
    pub purchase_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub purchase_date_ms: Option<DateTime<Utc>>,
    pub purchase_date_pst: Option<String>,
    /// Number of consumables purchased, at most 10.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub quantity: Option<u32>,
    pub subscription_group_identifier: Option<String>,
    pub transaction_id: Option<String>,
    pub web_order_line_item_id: Option<String>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Transaction entry of `latest_receipt_info`.
///
/// Finished consumables are excluded.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody/latest_receipt_info
pub struct LatestReceiptInfo {
    pub cancellation_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub cancellation_date_ms: Option<DateTime<Utc>>,
    pub cancellation_date_pst: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub cancellation_reason: Option<u8>,
    pub expires_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub expires_date_ms: Option<DateTime<Utc>>,
    pub expires_date_pst: Option<String>,
    pub in_app_ownership_type: Option<InAppOwnershipType>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub is_in_intro_offer_period: Option<bool>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub is_trial_period: Option<bool>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub is_upgraded: Option<bool>,
    pub offer_code_ref_name: Option<String>,
    pub original_purchase_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub original_purchase_date_ms: Option<DateTime<Utc>>,
    pub original_purchase_date_pst: Option<String>,
    pub original_transaction_id: Option<String>,
    pub product_id: Option<String>,
    pub promotional_offer_id: Option<String>,
    pub purchase_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub purchase_date_ms: Option<DateTime<Utc>>,
    pub purchase_date_pst: Option<String>,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub quantity: Option<u32>,
    pub subscription_group_identifier: Option<String>,
    pub transaction_id: Option<String>,
    /// Primary key for purchase events across devices, including renewals.
    pub web_order_line_item_id: Option<String>,
}

#[serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Open or previously failed renewal of an auto-renewable subscription.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody/pending_renewal_info
pub struct PendingRenewalInfo {
    /// Product the subscription renews to. Differs from `product_id` after a
    /// downgrade or crossgrade.
    pub auto_renew_product_id: Option<String>,
    pub auto_renew_status: Option<AutoRenewStatus>,
    pub expiration_intent: Option<ExpirationIntent>,
    pub grace_period_expires_date: Option<String>,
    #[serde_as(as = "Option<TimestampMilliSeconds<String>>")]
    pub grace_period_expires_date_ms: Option<DateTime<Utc>>,
    pub grace_period_expires_date_pst: Option<String>,
    pub is_in_billing_retry_period: Option<BillingRetryStatus>,
    pub offer_code_ref_name: Option<String>,
    pub original_transaction_id: Option<String>,
    pub price_consent_status: Option<PriceConsentStatus>,
    pub product_id: Option<String>,
}
