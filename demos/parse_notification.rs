use std::io::{self, Read};

use storekit_verify::parse_notification;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut body = String::new();
    io::stdin().read_to_string(&mut body)?;

    let notification = parse_notification(&body)?;

    println!(
        "type: {:?}, environment: {:?}, bundle: {:?}",
        notification.notification_type, notification.environment, notification.bid
    );
    if let Some(unified) = &notification.unified_receipt {
        println!(
            "status: {:?}, transactions: {}, pending renewals: {}",
            unified.status,
            unified.latest_receipt_info.len(),
            unified.pending_renewal_info.len()
        );
    }

    Ok(())
}
