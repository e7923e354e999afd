use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidBase64 { field: &'static str, reason: String },
    InvalidUrl { field: &'static str, input: String },
    UnknownEndpoint { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidBase64 { field, reason } => {
                write!(f, "{field} is not valid base64: {reason}")
            }
            Self::InvalidUrl { field, input } => write!(f, "{field} is not a valid URL: {input}"),
            Self::UnknownEndpoint { input } => write!(
                f,
                "unknown endpoint: {input} (expected `production` or `sandbox`)"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
