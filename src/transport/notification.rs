use crate::domain::Notification;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid notification JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn decode_notification_json(json: &str) -> Result<Notification, TransportError> {
    Ok(serde_json::from_str(json)?)
}
