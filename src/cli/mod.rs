use std::fs::File;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::BrokerageService;
use crate::domain::{Quantity, TransactionKind, format_cents, parse_cents};
use crate::io::Exporter;

/// Bursa - Brokerage Account Shell
#[derive(Parser)]
#[command(name = "bursa")]
#[command(about = "An interactive shell for a single-account brokerage ledger")]
#[command(version)]
pub struct Cli {
    /// Read commands from a file instead of stdin
    #[arg(short, long)]
    pub file: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// One shell line, parsed as a command. Multicall mode makes the command
/// name the first word of the line rather than the binary name.
#[derive(Parser)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Open a fresh account, replacing any open one
    Open {
        /// Owner identifier
        owner: String,

        /// Initial deposit (e.g., "1000.00" or "1000")
        initial_deposit: String,
    },

    /// Deposit cash into the account
    Deposit {
        /// Amount to deposit
        amount: String,
    },

    /// Withdraw cash from the account
    Withdraw {
        /// Amount to withdraw
        amount: String,
    },

    /// Buy shares at the current price
    Buy {
        /// Stock symbol (e.g., AAPL)
        symbol: String,

        /// Number of shares
        quantity: Quantity,
    },

    /// Sell held shares at the current price
    Sell {
        /// Stock symbol (e.g., AAPL)
        symbol: String,

        /// Number of shares
        quantity: Quantity,
    },

    /// Show cash, positions, and total portfolio value
    Portfolio,

    /// Show profit or loss against the initial deposit
    Pnl,

    /// Show current holdings
    Holdings,

    /// Show transaction history, oldest first
    History,

    /// Show the current price for a symbol
    Quote {
        /// Stock symbol
        symbol: String,
    },

    /// Export session data
    Export {
        /// What to export: history, snapshot
        target: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format for history: csv, json (snapshot is always json)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// End the session
    Quit,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut service = BrokerageService::with_default_listings();

        match &self.file {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read command file '{}'", path))?;
                for line in content.lines() {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if self.verbose {
                        eprintln!("> {}", line);
                    }
                    if !self.execute_line(&mut service, line)? {
                        break;
                    }
                }
            }
            None => {
                let stdin = io::stdin();
                let mut lines = stdin.lock().lines();
                loop {
                    print!("bursa> ");
                    io::stdout().flush()?;
                    let Some(line) = lines.next() else { break };
                    let line = line?;
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if !self.execute_line(&mut service, line)? {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Run one shell line. Returns false when the session should end;
    /// rejected operations print their reason and keep the session alive.
    fn execute_line(&self, service: &mut BrokerageService, line: &str) -> Result<bool> {
        let shell = match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(shell) => shell,
            Err(err) => {
                // Usage/help text from clap, e.g. for a mistyped command.
                err.print().context("Failed to write parse error")?;
                return Ok(true);
            }
        };

        if matches!(shell.command, ShellCommand::Quit) {
            println!("Goodbye.");
            return Ok(false);
        }

        if let Err(err) = run_command(service, shell.command, self.verbose) {
            println!("{err:#}");
        }
        Ok(true)
    }
}

fn run_command(service: &mut BrokerageService, command: ShellCommand, verbose: bool) -> Result<()> {
    match command {
        ShellCommand::Open {
            owner,
            initial_deposit,
        } => {
            let amount_cents = parse_cents(&initial_deposit)
                .context("Invalid amount format. Use '1000.00' or '1000'")?;
            let opened = service.open_account(&owner, amount_cents)?;

            if opened.replaced_previous {
                println!("Discarded the previously open account.");
            }
            println!(
                "Account opened for {} with an initial deposit of {}",
                opened.owner_id,
                format_cents(opened.balance_cents)
            );
            if verbose {
                eprintln!("[account {}]", opened.account_id);
            }
        }

        ShellCommand::Deposit { amount } => {
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
            let outcome = service.deposit(amount_cents)?;

            println!(
                "Deposited {}. Current balance: {}",
                format_cents(amount_cents),
                format_cents(outcome.balance_cents)
            );
            if verbose {
                eprintln!("[tx {}]", outcome.transaction.id);
            }
        }

        ShellCommand::Withdraw { amount } => {
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
            let outcome = service.withdraw(amount_cents)?;

            println!(
                "Withdrew {}. Current balance: {}",
                format_cents(amount_cents),
                format_cents(outcome.balance_cents)
            );
            if verbose {
                eprintln!("[tx {}]", outcome.transaction.id);
            }
        }

        ShellCommand::Buy { symbol, quantity } => {
            let outcome = service.buy(&symbol, quantity)?;

            if let TransactionKind::Buy {
                unit_price_cents, ..
            } = outcome.transaction.kind
            {
                println!(
                    "Bought {} shares of {} at {} each. Current balance: {}",
                    quantity,
                    symbol,
                    format_cents(unit_price_cents),
                    format_cents(outcome.balance_cents)
                );
            }
            if verbose {
                eprintln!("[tx {}] position now {}", outcome.transaction.id, outcome.position);
            }
        }

        ShellCommand::Sell { symbol, quantity } => {
            let outcome = service.sell(&symbol, quantity)?;

            if let TransactionKind::Sell {
                unit_price_cents, ..
            } = outcome.transaction.kind
            {
                println!(
                    "Sold {} shares of {} at {} each. Current balance: {}",
                    quantity,
                    symbol,
                    format_cents(unit_price_cents),
                    format_cents(outcome.balance_cents)
                );
            }
            if outcome.position == 0 {
                println!("Position in {} closed.", symbol);
            }
            if verbose {
                eprintln!("[tx {}] position now {}", outcome.transaction.id, outcome.position);
            }
        }

        ShellCommand::Portfolio => run_portfolio_command(service)?,

        ShellCommand::Pnl => {
            let report = service.profit_or_loss()?;
            println!("Initial deposit: {}", format_cents(report.initial_deposit_cents));
            println!("Portfolio value: {}", format_cents(report.total_value_cents));
            println!("Profit/Loss:     {}", format_cents(report.profit_or_loss_cents));
        }

        ShellCommand::Holdings => {
            let holdings = service.holdings()?;
            if holdings.is_empty() {
                println!("No holdings.");
            } else {
                let mut positions: Vec<(String, Quantity)> = holdings.into_iter().collect();
                positions.sort();
                println!("{:<8} {:>10}", "SYMBOL", "SHARES");
                println!("{}", "-".repeat(19));
                for (symbol, quantity) in positions {
                    println!("{:<8} {:>10}", symbol, quantity);
                }
            }
        }

        ShellCommand::History => {
            let transactions = service.history()?;
            if transactions.is_empty() {
                println!("No transactions.");
            } else {
                println!("{:<5} {:<20} {:<9} DETAIL", "SEQ", "RECORDED", "KIND");
                println!("{}", "-".repeat(60));
                for tx in &transactions {
                    println!(
                        "{:<5} {:<20} {:<9} {}",
                        tx.sequence,
                        tx.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                        tx.kind_label(),
                        describe_kind(&tx.kind)
                    );
                }
            }
        }

        ShellCommand::Quote { symbol } => {
            let price = service.quote(&symbol);
            if price == 0 {
                println!("{}: {} (unlisted)", symbol, format_cents(price));
            } else {
                println!("{}: {}", symbol, format_cents(price));
            }
        }

        ShellCommand::Export {
            target,
            output,
            format,
        } => run_export_command(service, &target, output.as_deref(), &format)?,

        // Handled in execute_line before dispatch.
        ShellCommand::Quit => {}
    }

    Ok(())
}

fn run_portfolio_command(service: &BrokerageService) -> Result<()> {
    let report = service.portfolio()?;

    if report.positions.is_empty() {
        println!("No holdings.");
    } else {
        println!(
            "{:<8} {:>10} {:>12} {:>14}",
            "SYMBOL", "SHARES", "PRICE", "VALUE"
        );
        println!("{}", "-".repeat(47));
        for line in &report.positions {
            println!(
                "{:<8} {:>10} {:>12} {:>14}",
                line.symbol,
                line.quantity,
                format_cents(line.unit_price_cents),
                format_cents(line.market_value_cents)
            );
        }
    }
    println!();
    println!("Cash balance:    {}", format_cents(report.cash_balance_cents));
    println!("Holdings value:  {}", format_cents(report.holdings_value_cents));
    println!("Total value:     {}", format_cents(report.total_value_cents));

    Ok(())
}

fn run_export_command(
    service: &BrokerageService,
    target: &str,
    output: Option<&str>,
    format: &str,
) -> Result<()> {
    let exporter = Exporter::new(service);

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create '{}'", path))?,
        ),
        None => Box::new(io::stdout()),
    };

    match (target, format) {
        ("history", "csv") => {
            let count = exporter.export_history_csv(&mut writer)?;
            report_export(count, output);
        }
        ("history", "json") => {
            let count = exporter.export_history_json(&mut writer)?;
            report_export(count, output);
        }
        ("history", other) => {
            anyhow::bail!("Unknown format '{}'. Valid formats: csv, json", other)
        }
        ("snapshot", _) => {
            exporter.export_snapshot_json(&mut writer)?;
            if let Some(path) = output {
                println!("Exported account snapshot to {}", path);
            }
        }
        (other, _) => {
            anyhow::bail!("Unknown export target '{}'. Valid targets: history, snapshot", other)
        }
    }

    Ok(())
}

fn report_export(count: usize, output: Option<&str>) {
    if let Some(path) = output {
        println!("Exported {} transaction(s) to {}", count, path);
    }
}

fn describe_kind(kind: &TransactionKind) -> String {
    match kind {
        TransactionKind::Deposit { amount_cents } | TransactionKind::Withdraw { amount_cents } => {
            format_cents(*amount_cents)
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
        } => {
            format!(
                "{} x {} @ {}",
                quantity,
                symbol,
                format_cents(*unit_price_cents)
            )
        }
    }
}
