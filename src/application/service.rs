use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{
    Account, AccountId, Cents, PriceSource, Quantity, StaticPriceTable, Transaction,
};

use super::{AppError, PortfolioReport, ProfitReport, build_portfolio_report, build_profit_report};

/// Session facade over one brokerage account. This is the surface any client
/// (shell, TUI, API) consumes: it owns the currently open account and the
/// price source, and hands out results or typed failures for rendering.
///
/// One account is live at a time; opening another replaces it and discards
/// all prior state. Callers sharing a service across threads must wrap it in
/// a mutex - operations are atomic but not synchronized.
pub struct BrokerageService {
    account: Option<Account>,
    prices: Box<dyn PriceSource>,
}

/// Result of opening an account
pub struct AccountOpened {
    pub account_id: AccountId,
    pub owner_id: String,
    pub balance_cents: Cents,
    pub opened_at: DateTime<Utc>,
    /// True when opening discarded a previously open account.
    pub replaced_previous: bool,
}

/// Result of a deposit or withdrawal
#[derive(Debug)]
pub struct CashOutcome {
    pub transaction: Transaction,
    pub balance_cents: Cents,
}

/// Result of a buy or sell
#[derive(Debug)]
pub struct TradeOutcome {
    pub transaction: Transaction,
    pub balance_cents: Cents,
    /// Shares held in the traded symbol after the operation.
    pub position: Quantity,
}

impl BrokerageService {
    pub fn new(prices: Box<dyn PriceSource>) -> Self {
        Self {
            account: None,
            prices,
        }
    }

    /// Service backed by the fixed reference listings.
    pub fn with_default_listings() -> Self {
        Self::new(Box::new(StaticPriceTable::default()))
    }

    /// Open a fresh account, replacing any existing one.
    pub fn open_account(
        &mut self,
        owner_id: &str,
        initial_deposit_cents: Cents,
    ) -> Result<AccountOpened, AppError> {
        let account = Account::open(owner_id, initial_deposit_cents)?;
        let opened = AccountOpened {
            account_id: account.id(),
            owner_id: account.owner_id().to_string(),
            balance_cents: account.cash_balance(),
            opened_at: account.created_at(),
            replaced_previous: self.account.is_some(),
        };
        self.account = Some(account);
        Ok(opened)
    }

    /// The open account, if any. Read-only; mutations go through operations.
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn deposit(&mut self, amount_cents: Cents) -> Result<CashOutcome, AppError> {
        let account = self.account.as_mut().ok_or(AppError::NoAccount)?;
        let balance_cents = account.deposit(amount_cents)?;
        Ok(CashOutcome {
            transaction: last_record(account),
            balance_cents,
        })
    }

    pub fn withdraw(&mut self, amount_cents: Cents) -> Result<CashOutcome, AppError> {
        let account = self.account.as_mut().ok_or(AppError::NoAccount)?;
        let balance_cents = account.withdraw(amount_cents)?;
        Ok(CashOutcome {
            transaction: last_record(account),
            balance_cents,
        })
    }

    pub fn buy(&mut self, symbol: &str, quantity: Quantity) -> Result<TradeOutcome, AppError> {
        let account = self.account.as_mut().ok_or(AppError::NoAccount)?;
        let balance_cents = account.buy(self.prices.as_ref(), symbol, quantity)?;
        Ok(TradeOutcome {
            transaction: last_record(account),
            balance_cents,
            position: account.position(symbol),
        })
    }

    pub fn sell(&mut self, symbol: &str, quantity: Quantity) -> Result<TradeOutcome, AppError> {
        let account = self.account.as_mut().ok_or(AppError::NoAccount)?;
        let balance_cents = account.sell(self.prices.as_ref(), symbol, quantity)?;
        Ok(TradeOutcome {
            transaction: last_record(account),
            balance_cents,
            position: account.position(symbol),
        })
    }

    pub fn portfolio(&self) -> Result<PortfolioReport, AppError> {
        let account = self.account.as_ref().ok_or(AppError::NoAccount)?;
        Ok(build_portfolio_report(account, self.prices.as_ref()))
    }

    pub fn profit_or_loss(&self) -> Result<ProfitReport, AppError> {
        let account = self.account.as_ref().ok_or(AppError::NoAccount)?;
        Ok(build_profit_report(account, self.prices.as_ref()))
    }

    /// Detached copy of the holdings map.
    pub fn holdings(&self) -> Result<HashMap<String, Quantity>, AppError> {
        let account = self.account.as_ref().ok_or(AppError::NoAccount)?;
        Ok(account.holdings_snapshot())
    }

    /// All transactions, oldest first.
    pub fn history(&self) -> Result<Vec<Transaction>, AppError> {
        let account = self.account.as_ref().ok_or(AppError::NoAccount)?;
        Ok(account.transactions().to_vec())
    }

    /// Current unit price for a symbol; 0 when unlisted.
    pub fn quote(&self, symbol: &str) -> Cents {
        self.prices.price_of(symbol)
    }
}

fn last_record(account: &Account) -> Transaction {
    account
        .transactions()
        .last()
        .cloned()
        .expect("successful operation always appends a record")
}
