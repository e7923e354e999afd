//! Typed Rust client for App Store receipt verification.
//!
//! The crate is split into a domain layer of strong types, a transport layer
//! for the `verifyReceipt` wire format, and a small client layer that posts
//! receipts and resubmits once when Apple reports the wrong environment.
//!
//! ```rust,no_run
//! use storekit_verify::{
//!     CancellationToken, ReceiptData, SharedSecret, VerificationClient, VerificationRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), storekit_verify::VerifyError> {
//!     let mut client = VerificationClient::new();
//!     let request = VerificationRequest::new(ReceiptData::new("...")?)
//!         .with_shared_secret(SharedSecret::new("...")?);
//!     let response = client.verify(&request, &CancellationToken::new()).await?;
//!     println!("status: {}", response.status);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{VerificationClient, VerificationClientBuilder, VerifyError, parse_notification};
pub use domain::{
    AutoRenewStatus, BillingRetryStatus, Endpoint, Environment, ExpirationIntent,
    InAppOwnershipType, InAppPurchaseReceipt, KnownStatusCode, LatestReceiptInfo, Notification,
    NotificationEnvironment, NotificationType, PendingRenewalInfo, PriceConsentStatus, Receipt,
    ReceiptData, SharedSecret, StatusCode, UnifiedReceipt, ValidationError, VerificationRequest,
    VerificationResponse,
};
pub use tokio_util::sync::CancellationToken;
