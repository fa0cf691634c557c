use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::BrokerageService;
use crate::domain::{Account, TransactionKind};

/// Full account state for JSON export
#[derive(Debug, Clone, Serialize)]
pub struct AccountSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub account: Account,
}

/// Exporter for converting session data to durable formats
pub struct Exporter<'a> {
    service: &'a BrokerageService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a BrokerageService) -> Self {
        Self { service }
    }

    /// Export transaction history to CSV format
    pub fn export_history_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.history()?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record([
            "id",
            "sequence",
            "recorded_at",
            "kind",
            "symbol",
            "quantity",
            "unit_price_cents",
            "amount_cents",
            "cash_delta_cents",
        ])?;

        let mut count = 0;
        for tx in &transactions {
            let (symbol, quantity, unit_price, amount) = match &tx.kind {
                TransactionKind::Deposit { amount_cents }
                | TransactionKind::Withdraw { amount_cents } => {
                    (String::new(), String::new(), String::new(), amount_cents.to_string())
                }
                TransactionKind::Buy {
                    symbol,
                    quantity,
                    unit_price_cents,
                }
                | TransactionKind::Sell {
                    symbol,
                    quantity,
                    unit_price_cents,
                } => (
                    symbol.clone(),
                    quantity.to_string(),
                    unit_price_cents.to_string(),
                    String::new(),
                ),
            };

            csv_writer.write_record([
                tx.id.to_string(),
                tx.sequence.to_string(),
                tx.recorded_at.to_rfc3339(),
                tx.kind_label().to_string(),
                symbol,
                quantity,
                unit_price,
                amount,
                tx.cash_delta().to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export transaction history as a JSON array
    pub fn export_history_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let transactions = self.service.history()?;
        let json = serde_json::to_string_pretty(&transactions)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        Ok(transactions.len())
    }

    /// Export the full account state as a JSON snapshot
    pub fn export_snapshot_json<W: Write>(&self, mut writer: W) -> Result<AccountSnapshot> {
        let account = self
            .service
            .account()
            .ok_or(crate::application::AppError::NoAccount)?;

        let snapshot = AccountSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            account: account.clone(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
