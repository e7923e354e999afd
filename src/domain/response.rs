use crate::domain::receipt::{
    Environment, InAppPurchaseReceipt, LatestReceiptInfo, PendingRenewalInfo, Receipt,
};
use crate::domain::value::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Decoded `verifyReceipt` response.
///
/// Any status is a successful decode, including the `21100..=21199` band. Acting
/// on `is_retryable` is up to the caller.
pub struct VerificationResponse {
    pub status: StatusCode,
    pub environment: Option<Environment>,
    pub receipt: Option<Receipt>,
    /// Latest app receipt, only for receipts with auto-renewable subscriptions.
    pub latest_receipt: Option<Vec<u8>>,
    pub latest_receipt_info: Vec<LatestReceiptInfo>,
    /// iOS 6 style transaction receipts only.
    pub latest_expired_receipt_info: Option<InAppPurchaseReceipt>,
    pub pending_renewal_info: Vec<PendingRenewalInfo>,
    pub is_retryable: bool,
    /// The body exactly as received.
    pub raw_body: Vec<u8>,
}
