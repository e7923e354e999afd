//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod notification;
mod verify_receipt;

pub use notification::decode_notification_json;
pub use verify_receipt::{decode_verify_receipt_json_response, encode_verify_receipt_json};
