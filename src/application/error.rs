use thiserror::Error;

use crate::domain::LedgerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No account is open. Use 'open <owner> <amount>' first")]
    NoAccount,

    #[error("{0}")]
    Ledger(#[from] LedgerError),

    #[error("Export error: {0}")]
    Export(#[from] anyhow::Error),
}
