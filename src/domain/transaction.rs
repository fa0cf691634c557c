use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type TransactionId = Uuid;

/// Share counts are signed so arithmetic against balances stays in one
/// integer domain; the ledger never stores a non-positive count.
pub type Quantity = i64;

/// One completed ledger operation. Records are immutable once appended and
/// ordered by their sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Position in the account's history, assigned on append (0-based).
    pub sequence: u64,
    /// When the ledger recorded the operation.
    pub recorded_at: DateTime<Utc>,
    pub kind: TransactionKind,
}

/// The four operations a ledger can record, each carrying only the fields
/// relevant to that kind. Buy/sell prices are frozen execution prices, never
/// re-quoted after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit {
        amount_cents: Cents,
    },
    Withdraw {
        amount_cents: Cents,
    },
    Buy {
        symbol: String,
        quantity: Quantity,
        unit_price_cents: Cents,
    },
    Sell {
        symbol: String,
        quantity: Quantity,
        unit_price_cents: Cents,
    },
}

impl Transaction {
    /// Create a record for the given kind. The sequence number is assigned
    /// by the account when the record is appended.
    pub(crate) fn new(sequence: u64, kind: TransactionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            recorded_at: Utc::now(),
            kind,
        }
    }

    /// Signed effect of this record on the cash balance.
    pub fn cash_delta(&self) -> Cents {
        match &self.kind {
            TransactionKind::Deposit { amount_cents } => *amount_cents,
            TransactionKind::Withdraw { amount_cents } => -amount_cents,
            TransactionKind::Buy {
                quantity,
                unit_price_cents,
                ..
            } => -(unit_price_cents * quantity),
            TransactionKind::Sell {
                quantity,
                unit_price_cents,
                ..
            } => unit_price_cents * quantity,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            TransactionKind::Deposit { .. } => "deposit",
            TransactionKind::Withdraw { .. } => "withdraw",
            TransactionKind::Buy { .. } => "buy",
            TransactionKind::Sell { .. } => "sell",
        }
    }
}
