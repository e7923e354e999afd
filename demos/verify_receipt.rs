use std::io;

use storekit_verify::{
    CancellationToken, SharedSecret, VerificationClientBuilder, VerificationRequest,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let receipt = std::env::var("STOREKIT_RECEIPT").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "STOREKIT_RECEIPT environment variable is required (base64 receipt)",
        )
    })?;

    let mut request = VerificationRequest::from_base64(&receipt)?;
    if let Ok(secret) = std::env::var("STOREKIT_SHARED_SECRET") {
        request = request.with_shared_secret(SharedSecret::new(secret)?);
    }
    if std::env::var("STOREKIT_EXCLUDE_OLD").is_ok_and(|value| value == "1") {
        request = request.exclude_old_transactions(true);
    }

    let mut client = VerificationClientBuilder::from_env()?.build()?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let response = client.verify(&request, &cancel).await?;

    println!(
        "status: {} ({:?}), environment: {:?}, endpoint now: {}",
        response.status,
        response.status.known(),
        response.environment,
        client.endpoint()
    );
    for info in &response.latest_receipt_info {
        println!(
            "product: {:?}, transaction: {:?}, expires: {:?}",
            info.product_id, info.transaction_id, info.expires_date_ms
        );
    }

    Ok(())
}
