use custody_common::error::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Script step {step} failed: {source}")]
    Step { step: usize, source: LedgerError },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
