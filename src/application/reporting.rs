use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Account, Cents, PriceSource, Quantity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub as_of: DateTime<Utc>,
    pub cash_balance_cents: Cents,
    pub holdings_value_cents: Cents,
    pub total_value_cents: Cents,
    pub positions: Vec<PositionLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionLine {
    pub symbol: String,
    pub quantity: Quantity,
    pub unit_price_cents: Cents,
    pub market_value_cents: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitReport {
    pub as_of: DateTime<Utc>,
    pub initial_deposit_cents: Cents,
    pub total_value_cents: Cents,
    pub profit_or_loss_cents: Cents,
}

/// Value every position at current prices. Lines are sorted by symbol so
/// repeated reports render identically.
pub fn build_portfolio_report(account: &Account, prices: &dyn PriceSource) -> PortfolioReport {
    let mut positions: Vec<PositionLine> = account
        .holdings()
        .iter()
        .map(|(symbol, &quantity)| {
            let unit_price_cents = prices.price_of(symbol);
            PositionLine {
                symbol: symbol.clone(),
                quantity,
                unit_price_cents,
                market_value_cents: unit_price_cents * quantity,
            }
        })
        .collect();
    positions.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    let holdings_value_cents = account.holdings_value(prices);

    PortfolioReport {
        as_of: Utc::now(),
        cash_balance_cents: account.cash_balance(),
        holdings_value_cents,
        total_value_cents: account.cash_balance() + holdings_value_cents,
        positions,
    }
}

pub fn build_profit_report(account: &Account, prices: &dyn PriceSource) -> ProfitReport {
    ProfitReport {
        as_of: Utc::now(),
        initial_deposit_cents: account.initial_deposit(),
        total_value_cents: account.portfolio_value(prices),
        profit_or_loss_cents: account.profit_or_loss(prices),
    }
}
