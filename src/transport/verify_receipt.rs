use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;

use crate::domain::{
    Environment, InAppPurchaseReceipt, LatestReceiptInfo, PendingRenewalInfo, Receipt,
    StatusCode, VerificationRequest, VerificationResponse,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct VerifyReceiptJsonRequest<'a> {
    #[serde(rename = "receipt-data")]
    receipt_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(rename = "exclude-old-transactions")]
    exclude_old_transactions: bool,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct VerifyReceiptJsonResponse {
    status: i32,
    #[serde(default)]
    environment: Option<Environment>,
    #[serde(default)]
    receipt: Option<Receipt>,
    #[serde_as(as = "Option<Base64>")]
    latest_receipt: Option<Vec<u8>>,
    #[serde(default)]
    latest_receipt_info: Vec<LatestReceiptInfo>,
    #[serde(default)]
    latest_expired_receipt_info: Option<InAppPurchaseReceipt>,
    #[serde(default)]
    pending_renewal_info: Vec<PendingRenewalInfo>,
    #[serde(rename = "is-retryable", default)]
    is_retryable: bool,
}

pub fn encode_verify_receipt_json(
    request: &VerificationRequest,
) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&VerifyReceiptJsonRequest {
        receipt_data: request.receipt_data().to_base64(),
        password: request.shared_secret().map(|secret| secret.as_str()),
        exclude_old_transactions: request.excludes_old_transactions(),
    })
}

pub fn decode_verify_receipt_json_response(
    body: Vec<u8>,
) -> Result<VerificationResponse, TransportError> {
    let parsed: VerifyReceiptJsonResponse = serde_json::from_slice(&body)?;

    Ok(VerificationResponse {
        status: StatusCode::new(parsed.status),
        environment: parsed.environment,
        receipt: parsed.receipt,
        latest_receipt: parsed.latest_receipt,
        latest_receipt_info: parsed.latest_receipt_info,
        latest_expired_receipt_info: parsed.latest_expired_receipt_info,
        pending_renewal_info: parsed.pending_renewal_info,
        is_retryable: parsed.is_retryable,
        raw_body: body,
    })
}
