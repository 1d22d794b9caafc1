use std::io::Write;

use chrono::NaiveDate;
use colored::Colorize;

use crate::{
    config::{Config, ConfigManager},
    core::services::{CalendarService, SummaryService, TransactionService},
    currency::CurrencyFormat,
    ledger::{is_suggested, CategoryKind, DateWindow, Transaction, TransactionType},
    storage::{CsvLedgerStore, TransactionStore},
};

use super::{CliError, Command, EntryArgs, Invocation, USAGE};

/// Resolves config and ledger location, then runs one command against the store.
pub fn execute(invocation: Invocation, out: &mut dyn Write) -> Result<(), CliError> {
    if invocation.command == Command::Help {
        writeln!(out, "{USAGE}")?;
        return Ok(());
    }

    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let path = invocation
        .ledger_file
        .unwrap_or_else(|| manager.ledger_path(&config));
    let store = CsvLedgerStore::open(&path, config.type_labels.clone())?;
    tracing::debug!(path = %path.display(), command = ?invocation.command, "running command");

    let ctx = Context {
        store: &store,
        config: &config,
        out,
    };
    ctx.run(invocation.command)
}

struct Context<'a> {
    store: &'a CsvLedgerStore,
    config: &'a Config,
    out: &'a mut dyn Write,
}

impl Context<'_> {
    fn run(mut self, command: Command) -> Result<(), CliError> {
        match command {
            Command::Init => {
                writeln!(self.out, "Ledger ready at {}", self.store.path().display())?;
            }
            Command::Add(entry) => self.add(entry)?,
            Command::List { from, to } => self.list(from, to)?,
            Command::Balance { from, to } => self.balance(from, to)?,
            Command::Stats(filter) => self.stats(filter)?,
            Command::Month { year, month } => self.month(year, month)?,
            Command::Day(date) => self.day(date)?,
            Command::Calendar { year, month } => self.calendar(year, month)?,
            Command::Update { index, entry } => {
                let txn = build_transaction(entry)?;
                let previous = TransactionService::update_at(self.store, index, txn.clone())?;
                writeln!(self.out, "{} #{index}", "Updated".green().bold())?;
                writeln!(self.out, "  was: {previous}")?;
                writeln!(self.out, "  now: {txn}")?;
            }
            Command::Delete(index) => {
                let removed = TransactionService::delete_at(self.store, index)?;
                writeln!(self.out, "{} {removed}", "Deleted".yellow().bold())?;
            }
            Command::Clear => {
                TransactionService::clear(self.store)?;
                writeln!(self.out, "{}", "All transactions deleted.".yellow().bold())?;
            }
            Command::Categories(filter) => self.categories(filter)?,
            Command::Help => writeln!(self.out, "{USAGE}")?,
        }
        Ok(())
    }

    fn currency(&self) -> &CurrencyFormat {
        &self.config.currency
    }

    fn add(&mut self, entry: EntryArgs) -> Result<(), CliError> {
        let txn = build_transaction(entry)?;
        TransactionService::record(self.store, &txn)?;
        writeln!(self.out, "{} {txn}", "Added".green().bold())?;
        if !is_suggested(txn.category(), txn.transaction_type()) {
            writeln!(
                self.out,
                "{}",
                format!("note: `{}` is not a suggested category", txn.category()).dimmed()
            )?;
        }
        Ok(())
    }

    fn list(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(), CliError> {
        if from.is_none() && to.is_none() {
            let report = self.store.load_with_report()?;
            for (index, txn) in report.transactions.iter().enumerate() {
                writeln!(self.out, "{:>4}  {}", index, colorize(txn))?;
            }
            for warning in &report.warnings {
                writeln!(self.out, "{} {warning}", "skipped".yellow())?;
            }
            writeln!(self.out, "{} transaction(s)", report.transactions.len())?;
            return Ok(());
        }
        let transactions = self.load_range(from, to)?;
        for txn in &transactions {
            writeln!(self.out, "      {}", colorize(txn))?;
        }
        writeln!(self.out, "{} transaction(s)", transactions.len())?;
        Ok(())
    }

    fn balance(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(), CliError> {
        let transactions = match (from, to) {
            (None, None) => self.store.load_all()?,
            _ => self.load_range(from, to)?,
        };
        let totals = SummaryService::calculate_balance(&transactions);
        let fmt = self.currency().clone();
        writeln!(self.out, "Income:  {}", fmt.format(totals.income).green())?;
        writeln!(self.out, "Expense: {}", fmt.format(totals.expense).red())?;
        writeln!(self.out, "Balance: {}", fmt.format(totals.balance).bold())?;
        Ok(())
    }

    fn stats(&mut self, filter: Option<TransactionType>) -> Result<(), CliError> {
        let transactions = self.store.load_all()?;
        let stats = SummaryService::category_statistics(&transactions, filter);
        if stats.is_empty() {
            writeln!(self.out, "No transactions.")?;
            return Ok(());
        }
        let fmt = self.currency().clone();
        for entry in &stats {
            writeln!(self.out, "{:<12} {:>16}", entry.category, fmt.format(entry.amount))?;
        }
        writeln!(self.out, "{:<12} {:>16}", "Total".bold(), fmt.format(stats.total()))?;
        Ok(())
    }

    fn month(&mut self, year: i32, month: u32) -> Result<(), CliError> {
        let summary = SummaryService::monthly_summary(self.store, year, month)?;
        let fmt = self.currency().clone();
        writeln!(self.out, "{}", format!("=== {year}-{month:02} ===").bold())?;
        writeln!(self.out, "Income:  {}", fmt.format(summary.total_income).green())?;
        writeln!(self.out, "Expense: {}", fmt.format(summary.total_expense).red())?;
        writeln!(self.out, "Balance: {}", fmt.format(summary.balance).bold())?;
        writeln!(self.out, "Transactions: {}", summary.transaction_count)?;
        for (label, stats) in [
            ("Income by category", &summary.income_by_category),
            ("Expense by category", &summary.expense_by_category),
        ] {
            if stats.is_empty() {
                continue;
            }
            writeln!(self.out, "{label}:")?;
            for entry in stats {
                writeln!(self.out, "  {:<12} {:>16}", entry.category, fmt.format(entry.amount))?;
            }
        }
        Ok(())
    }

    fn day(&mut self, date: NaiveDate) -> Result<(), CliError> {
        let transactions = SummaryService::daily_transactions(self.store, date)?;
        if transactions.is_empty() {
            writeln!(self.out, "No transactions on {date}.")?;
        }
        for txn in &transactions {
            writeln!(self.out, "{}", colorize(txn))?;
        }
        Ok(())
    }

    fn calendar(&mut self, year: i32, month: u32) -> Result<(), CliError> {
        let transactions = self.store.load_by_month(year, month)?;
        let events = CalendarService::from_config(self.config).events(&transactions);
        for event in &events {
            writeln!(
                self.out,
                "{}  {:<9} {}  {}",
                event.date,
                format!("{:?}", event.kind),
                event.color,
                event.title
            )?;
        }
        writeln!(self.out, "{} event(s)", events.len())?;
        Ok(())
    }

    fn categories(&mut self, filter: Option<TransactionType>) -> Result<(), CliError> {
        let kinds = match filter {
            Some(kind) => vec![CategoryKind::from(kind)],
            None => vec![CategoryKind::Income, CategoryKind::Expense],
        };
        for kind in kinds {
            writeln!(self.out, "{}", format!("{kind:?}:").bold())?;
            writeln!(self.out, "  {}", kind.suggestions().join(", "))?;
        }
        Ok(())
    }

    fn load_range(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Transaction>, CliError> {
        let window = DateWindow::between_dates(
            from.unwrap_or(NaiveDate::MIN),
            to.unwrap_or(NaiveDate::MAX),
        )?;
        Ok(self.store.load_window(&window)?)
    }
}

fn build_transaction(entry: EntryArgs) -> Result<Transaction, CliError> {
    Ok(Transaction::new(
        entry.date,
        entry.category,
        entry.amount,
        entry.transaction_type,
        entry.description,
    )?)
}

fn colorize(txn: &Transaction) -> colored::ColoredString {
    let line = txn.to_string();
    if txn.is_income() {
        line.green()
    } else {
        line.red()
    }
}
