//! Domain layer: strong types with validation and invariants (no I/O).

mod notification;
mod receipt;
mod request;
mod response;
mod validation;
mod value;

pub use notification::{Notification, NotificationEnvironment, NotificationType, UnifiedReceipt};
pub use receipt::{
    AutoRenewStatus, BillingRetryStatus, Environment, ExpirationIntent, InAppOwnershipType,
    InAppPurchaseReceipt, LatestReceiptInfo, PendingRenewalInfo, PriceConsentStatus, Receipt,
};
pub use request::VerificationRequest;
pub use response::VerificationResponse;
pub use validation::ValidationError;
pub use value::{Endpoint, KnownStatusCode, ReceiptData, SharedSecret, StatusCode};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_data_rejects_empty() {
        assert!(matches!(
            ReceiptData::new(""),
            Err(ValidationError::Empty {
                field: ReceiptData::FIELD
            })
        ));
    }

    #[test]
    fn shared_secret_rejects_empty() {
        assert!(matches!(
            SharedSecret::new(" "),
            Err(ValidationError::Empty {
                field: SharedSecret::FIELD
            })
        ));
    }

    #[test]
    fn request_defaults_to_no_secret_and_all_transactions() {
        let request = VerificationRequest::new(ReceiptData::new("abc123").unwrap());
        assert_eq!(request.receipt_data().as_bytes(), b"abc123");
        assert!(request.shared_secret().is_none());
        assert!(!request.excludes_old_transactions());
    }

    #[test]
    fn request_builder_methods_apply() {
        let request = VerificationRequest::from_base64("YWJjMTIz")
            .unwrap()
            .with_shared_secret(SharedSecret::new("secret").unwrap())
            .exclude_old_transactions(true);
        assert_eq!(request.receipt_data().as_bytes(), b"abc123");
        assert_eq!(request.shared_secret().map(SharedSecret::as_str), Some("secret"));
        assert!(request.excludes_old_transactions());
    }

    #[test]
    fn request_from_base64_rejects_garbage() {
        let err = VerificationRequest::from_base64("%%%").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBase64 { .. }));
    }

    #[test]
    fn status_code_known_mapping() {
        let code = StatusCode::new(21007);
        assert_eq!(
            code.known(),
            Some(KnownStatusCode::SandboxReceiptSentToProduction)
        );

        let unknown = StatusCode::new(21_150);
        assert_eq!(unknown.known(), None);
        assert!(unknown.is_internal_data_access_error());
    }
}
