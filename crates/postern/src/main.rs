//! postern — the delivery binary.

use std::process::ExitCode;

use postern::deliver;
use postern_core::inputs::DeliveryInputs;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let inputs = match DeliveryInputs::from_env() {
        Ok(inputs) => inputs,
        Err(e) => {
            tracing::error!(error = %e, "invalid workflow inputs");
            return ExitCode::FAILURE;
        }
    };

    // The single termination decision: clean response-stream end exits
    // zero, any stage failure exits non-zero.
    match deliver(inputs).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "delivery failed");
            ExitCode::FAILURE
        }
    }
}
