mod common;

use anyhow::Result;
use common::{AAPL_PRICE, TSLA_PRICE, funded_service};

#[test]
fn test_portfolio_report_values_positions_at_current_prices() -> Result<()> {
    let mut service = funded_service(1_000_000);
    service.buy("AAPL", 2)?;
    service.buy("TSLA", 1)?;

    let report = service.portfolio()?;

    assert_eq!(
        report.cash_balance_cents,
        1_000_000 - 2 * AAPL_PRICE - TSLA_PRICE
    );
    assert_eq!(report.holdings_value_cents, 2 * AAPL_PRICE + TSLA_PRICE);
    assert_eq!(report.total_value_cents, 1_000_000);

    let symbols: Vec<&str> = report.positions.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAPL", "TSLA"], "Positions sorted by symbol");
    Ok(())
}

#[test]
fn test_reads_are_idempotent_without_mutation() -> Result<()> {
    let mut service = funded_service(500_000);
    service.buy("AAPL", 3)?;

    let first = service.portfolio()?;
    let second = service.portfolio()?;
    assert_eq!(first.cash_balance_cents, second.cash_balance_cents);
    assert_eq!(first.holdings_value_cents, second.holdings_value_cents);
    assert_eq!(first.total_value_cents, second.total_value_cents);
    assert_eq!(first.positions.len(), second.positions.len());

    assert_eq!(service.holdings()?, service.holdings()?);
    assert_eq!(
        service.profit_or_loss()?.profit_or_loss_cents,
        service.profit_or_loss()?.profit_or_loss_cents
    );
    Ok(())
}

#[test]
fn test_profit_is_zero_right_after_trading_at_static_prices() -> Result<()> {
    // With a static price source, trading moves value between cash and
    // shares without creating gain or loss.
    let mut service = funded_service(1_000_000);
    service.buy("TSLA", 2)?;

    let report = service.profit_or_loss()?;

    assert_eq!(report.total_value_cents, 1_000_000);
    assert_eq!(report.profit_or_loss_cents, 0);
    Ok(())
}

#[test]
fn test_profit_baseline_ignores_later_deposits_and_withdrawals() -> Result<()> {
    let mut service = funded_service(100_000);

    service.deposit(50_000)?;
    assert_eq!(service.profit_or_loss()?.profit_or_loss_cents, 50_000);

    service.withdraw(80_000)?;
    assert_eq!(service.profit_or_loss()?.profit_or_loss_cents, -30_000);
    Ok(())
}

#[test]
fn test_history_preserves_insertion_order() -> Result<()> {
    let mut service = funded_service(1_000_000);
    service.deposit(1000)?;
    service.buy("AAPL", 1)?;
    service.withdraw(500)?;
    service.sell("AAPL", 1)?;

    let history = service.history()?;

    let labels: Vec<&str> = history.iter().map(|tx| tx.kind_label()).collect();
    assert_eq!(labels, vec!["deposit", "buy", "withdraw", "sell"]);

    let sequences: Vec<u64> = history.iter().map(|tx| tx.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2, 3]);
    Ok(())
}

#[test]
fn test_history_copy_is_detached_from_the_ledger() -> Result<()> {
    let mut service = funded_service(100_000);
    service.deposit(1000)?;

    let mut copy = service.history()?;
    copy.clear();

    assert_eq!(service.history()?.len(), 1);
    Ok(())
}

#[test]
fn test_quotes_expose_the_price_source() {
    let service = funded_service(100_000);

    assert_eq!(service.quote("AAPL"), AAPL_PRICE);
    assert_eq!(service.quote("TSLA"), TSLA_PRICE);
    assert_eq!(service.quote("ZZZZ"), 0);
}
