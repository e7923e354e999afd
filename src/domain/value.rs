use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Receipt bytes as issued by the device (`receipt-data`).
///
/// Invariant: non-empty. The bytes are Base64-encoded on the wire.
pub struct ReceiptData(Vec<u8>);

impl ReceiptData {
    /// JSON field name used by the verification endpoint (`receipt-data`).
    pub const FIELD: &'static str = "receipt-data";

    /// Create validated [`ReceiptData`] from raw receipt bytes.
    pub fn new(value: impl Into<Vec<u8>>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Decode the Base64 string an app reads from its receipt URL.
    ///
    /// Surrounding whitespace is ignored.
    pub fn from_base64(encoded: &str) -> Result<Self, ValidationError> {
        let bytes =
            STANDARD
                .decode(encoded.trim())
                .map_err(|err| ValidationError::InvalidBase64 {
                    field: Self::FIELD,
                    reason: err.to_string(),
                })?;
        Self::new(bytes)
    }

    /// Borrow the raw receipt bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encode the receipt as standard padded Base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// App-specific shared secret (`password`).
///
/// Invariant: non-empty after trimming. Only receipts with auto-renewable
/// subscriptions need one.
pub struct SharedSecret(String);

impl SharedSecret {
    /// JSON field name used by the verification endpoint (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`SharedSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated secret.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Verification backend a client posts receipts to.
pub enum Endpoint {
    #[default]
    Production,
    Sandbox,
}

impl Endpoint {
    /// The backend on the other side of a mismatch.
    pub fn other(self) -> Self {
        match self {
            Self::Production => Self::Sandbox,
            Self::Sandbox => Self::Production,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            _ => Err(ValidationError::UnknownEndpoint {
                input: value.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Receipt verification status code (`status`).
///
/// This value is preserved as-is even when the code is unknown to this crate.
pub struct StatusCode(i32);

impl StatusCode {
    /// Internal data access errors occupy this inclusive range.
    pub const INTERNAL_DATA_ACCESS_ERRORS: std::ops::RangeInclusive<i32> = 21100..=21199;

    /// Construct a status code from its integer representation.
    pub fn new(code: i32) -> Self {
        Self(code)
    }

    /// Get the integer code as returned by the endpoint.
    pub fn as_i32(self) -> i32 {
        self.0
    }

    /// Map this code to a known status code variant, if one exists.
    pub fn known(self) -> Option<KnownStatusCode> {
        KnownStatusCode::from_code(self.0)
    }

    /// Returns `true` for status `0`.
    pub fn is_valid(self) -> bool {
        self.known() == Some(KnownStatusCode::Valid)
    }

    /// Returns `true` for `21007` and `21008`.
    pub fn is_environment_mismatch(self) -> bool {
        matches!(
            self.known(),
            Some(
                KnownStatusCode::SandboxReceiptSentToProduction
                    | KnownStatusCode::ProductionReceiptSentToSandbox
            )
        )
    }

    /// Returns `true` for the `21100..=21199` band.
    ///
    /// Pair this with `is_retryable` on the response; the client never retries
    /// these codes by itself.
    pub fn is_internal_data_access_error(self) -> bool {
        Self::INTERNAL_DATA_ACCESS_ERRORS.contains(&self.0)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Documented receipt verification status codes.
///
/// Unknown codes are preserved as [`StatusCode`] and return `None` from [`KnownStatusCode::from_code`].
pub enum KnownStatusCode {
    /// Undocumented, but returned in practice.
    Unknown,
    Valid,
    AppStoreCannotRead,
    NoLongerSent,
    DataMalformed,
    NotAuthenticated,
    SharedSecretMismatch,
    ReceiptServerUnavailable,
    ValidButSubscriptionExpired,
    SandboxReceiptSentToProduction,
    ProductionReceiptSentToSandbox,
    InternalDataAccessError,
    CouldNotBeAuthorized,
}

impl KnownStatusCode {
    /// Convert a raw integer status into a known variant.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            -1 => Self::Unknown,
            0 => Self::Valid,
            21000 => Self::AppStoreCannotRead,
            21001 => Self::NoLongerSent,
            21002 => Self::DataMalformed,
            21003 => Self::NotAuthenticated,
            21004 => Self::SharedSecretMismatch,
            21005 => Self::ReceiptServerUnavailable,
            21006 => Self::ValidButSubscriptionExpired,
            21007 => Self::SandboxReceiptSentToProduction,
            21008 => Self::ProductionReceiptSentToSandbox,
            21009 => Self::InternalDataAccessError,
            21010 => Self::CouldNotBeAuthorized,
            _ => return None,
        })
    }

    /// The integer code for this variant.
    pub fn code(self) -> i32 {
        match self {
            Self::Unknown => -1,
            Self::Valid => 0,
            Self::AppStoreCannotRead => 21000,
            Self::NoLongerSent => 21001,
            Self::DataMalformed => 21002,
            Self::NotAuthenticated => 21003,
            Self::SharedSecretMismatch => 21004,
            Self::ReceiptServerUnavailable => 21005,
            Self::ValidButSubscriptionExpired => 21006,
            Self::SandboxReceiptSentToProduction => 21007,
            Self::ProductionReceiptSentToSandbox => 21008,
            Self::InternalDataAccessError => 21009,
            Self::CouldNotBeAuthorized => 21010,
        }
    }
}

impl From<KnownStatusCode> for StatusCode {
    fn from(value: KnownStatusCode) -> Self {
        Self(value.code())
    }
}
