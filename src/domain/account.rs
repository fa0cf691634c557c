use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Cents, PriceSource, Quantity, Transaction, TransactionKind, format_cents};

pub type AccountId = Uuid;

/// A single brokerage account: cash, share positions, and an append-only
/// transaction log. State is private; every mutation goes through an
/// operation that validates first and either fully applies or leaves the
/// account untouched.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    id: AccountId,
    owner_id: String,
    created_at: DateTime<Utc>,
    cash_balance_cents: Cents,
    /// Profit/loss baseline, fixed at creation.
    initial_deposit_cents: Cents,
    /// Symbol -> share count. Never holds an entry with count <= 0.
    holdings: HashMap<String, Quantity>,
    transactions: Vec<Transaction>,
}

impl Account {
    /// Open an account funded with an initial deposit. The deposit becomes
    /// both the starting balance and the profit/loss baseline; it is not
    /// recorded as a transaction.
    pub fn open(
        owner_id: impl Into<String>,
        initial_deposit_cents: Cents,
    ) -> Result<Self, LedgerError> {
        if initial_deposit_cents <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            created_at: Utc::now(),
            cash_balance_cents: initial_deposit_cents,
            initial_deposit_cents,
            holdings: HashMap::new(),
            transactions: Vec::new(),
        })
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn cash_balance(&self) -> Cents {
        self.cash_balance_cents
    }

    pub fn initial_deposit(&self) -> Cents {
        self.initial_deposit_cents
    }

    /// Shares held for a symbol, 0 if none.
    pub fn position(&self, symbol: &str) -> Quantity {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn holdings(&self) -> &HashMap<String, Quantity> {
        &self.holdings
    }

    /// Owned copy of the holdings map; mutating it cannot touch the ledger.
    pub fn holdings_snapshot(&self) -> HashMap<String, Quantity> {
        self.holdings.clone()
    }

    /// All recorded transactions, oldest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Add cash to the account. Returns the updated balance.
    pub fn deposit(&mut self, amount_cents: Cents) -> Result<Cents, LedgerError> {
        if amount_cents <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        self.cash_balance_cents += amount_cents;
        self.record(TransactionKind::Deposit { amount_cents });
        Ok(self.cash_balance_cents)
    }

    /// Remove cash from the account. Returns the updated balance.
    pub fn withdraw(&mut self, amount_cents: Cents) -> Result<Cents, LedgerError> {
        if amount_cents <= 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if amount_cents > self.cash_balance_cents {
            return Err(LedgerError::InsufficientFunds {
                available: self.cash_balance_cents,
                required: amount_cents,
            });
        }

        self.cash_balance_cents -= amount_cents;
        self.record(TransactionKind::Withdraw { amount_cents });
        Ok(self.cash_balance_cents)
    }

    /// Buy shares at the source's current price. Returns the updated balance.
    pub fn buy(
        &mut self,
        prices: &dyn PriceSource,
        symbol: &str,
        quantity: Quantity,
    ) -> Result<Cents, LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity);
        }

        let unit_price_cents = prices.price_of(symbol);
        // A quantity large enough to overflow cents is not a real order.
        let total = unit_price_cents
            .checked_mul(quantity)
            .ok_or(LedgerError::InvalidQuantity)?;
        if total > self.cash_balance_cents {
            return Err(LedgerError::InsufficientFunds {
                available: self.cash_balance_cents,
                required: total,
            });
        }

        self.cash_balance_cents -= total;
        *self.holdings.entry(symbol.to_string()).or_insert(0) += quantity;
        self.record(TransactionKind::Buy {
            symbol: symbol.to_string(),
            quantity,
            unit_price_cents,
        });
        Ok(self.cash_balance_cents)
    }

    /// Sell held shares at the source's current price. Returns the updated
    /// balance. A position sold down to zero is removed entirely.
    pub fn sell(
        &mut self,
        prices: &dyn PriceSource,
        symbol: &str,
        quantity: Quantity,
    ) -> Result<Cents, LedgerError> {
        if quantity <= 0 {
            return Err(LedgerError::InvalidQuantity);
        }

        let held = self.position(symbol);
        if quantity > held {
            return Err(LedgerError::InsufficientShares {
                symbol: symbol.to_string(),
                held,
                requested: quantity,
            });
        }

        let unit_price_cents = prices.price_of(symbol);
        self.cash_balance_cents += unit_price_cents * quantity;
        if held == quantity {
            self.holdings.remove(symbol);
        } else {
            self.holdings.insert(symbol.to_string(), held - quantity);
        }
        self.record(TransactionKind::Sell {
            symbol: symbol.to_string(),
            quantity,
            unit_price_cents,
        });
        Ok(self.cash_balance_cents)
    }

    /// Market value of the held shares alone, at current prices.
    pub fn holdings_value(&self, prices: &dyn PriceSource) -> Cents {
        self.holdings
            .iter()
            .map(|(symbol, quantity)| prices.price_of(symbol) * quantity)
            .sum()
    }

    /// Cash plus the market value of all holdings. Prices are re-queried on
    /// every call.
    pub fn portfolio_value(&self, prices: &dyn PriceSource) -> Cents {
        self.cash_balance_cents + self.holdings_value(prices)
    }

    /// Net gain or loss against the initial deposit baseline.
    pub fn profit_or_loss(&self, prices: &dyn PriceSource) -> Cents {
        self.portfolio_value(prices) - self.initial_deposit_cents
    }

    fn record(&mut self, kind: TransactionKind) {
        let sequence = self.transactions.len() as u64;
        self.transactions.push(Transaction::new(sequence, kind));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Non-positive deposit or withdrawal amount.
    InvalidAmount,
    /// Non-positive buy or sell quantity.
    InvalidQuantity,
    InsufficientFunds {
        available: Cents,
        required: Cents,
    },
    InsufficientShares {
        symbol: String,
        held: Quantity,
        requested: Quantity,
    },
}

// Display is the text the presentation layer shows verbatim.
impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidAmount => write!(f, "Amount must be positive"),
            LedgerError::InvalidQuantity => {
                write!(f, "Quantity must be a positive number of shares")
            }
            LedgerError::InsufficientFunds {
                available,
                required,
            } => {
                write!(
                    f,
                    "Insufficient funds: balance {}, required {}",
                    format_cents(*available),
                    format_cents(*required)
                )
            }
            LedgerError::InsufficientShares {
                symbol,
                held,
                requested,
            } => {
                write!(
                    f,
                    "Insufficient shares of {}: held {}, requested {}",
                    symbol, held, requested
                )
            }
        }
    }
}

impl std::error::Error for LedgerError {}
