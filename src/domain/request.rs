use crate::domain::validation::ValidationError;
use crate::domain::value::{ReceiptData, SharedSecret};

#[derive(Debug, Clone)]
/// A receipt to submit for verification.
///
/// Immutable once built. The client only borrows it, including when it
/// resubmits to the other environment.
pub struct VerificationRequest {
    receipt_data: ReceiptData,
    shared_secret: Option<SharedSecret>,
    exclude_old_transactions: bool,
}

impl VerificationRequest {
    pub fn new(receipt_data: ReceiptData) -> Self {
        Self {
            receipt_data,
            shared_secret: None,
            exclude_old_transactions: false,
        }
    }

    /// Build a request from the Base64 receipt string an app uploads.
    pub fn from_base64(encoded: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(ReceiptData::from_base64(encoded)?))
    }

    /// Attach the app's shared secret. Required for auto-renewable subscriptions.
    pub fn with_shared_secret(mut self, shared_secret: SharedSecret) -> Self {
        self.shared_secret = Some(shared_secret);
        self
    }

    /// Ask for only the latest renewal transaction of each subscription.
    pub fn exclude_old_transactions(mut self, exclude: bool) -> Self {
        self.exclude_old_transactions = exclude;
        self
    }

    pub fn receipt_data(&self) -> &ReceiptData {
        &self.receipt_data
    }

    pub fn shared_secret(&self) -> Option<&SharedSecret> {
        self.shared_secret.as_ref()
    }

    pub fn excludes_old_transactions(&self) -> bool {
        self.exclude_old_transactions
    }
}
