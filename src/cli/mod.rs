//! Command runner behind `ledger_core_cli`.
//!
//! Usage: `ledger_core_cli [--file PATH] <command> [args...]`

mod handlers;

use std::{
    env,
    io::{self, Write},
    path::PathBuf,
};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    core::services::ServiceError,
    errors::{LedgerError, ValidationError},
    ledger::{parse_amount, parse_date, TransactionType, TypeLabels},
};

pub use handlers::execute;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Output failed: {0}")]
    Output(#[from] io::Error),
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Core(err.into())
    }
}

/// Field values for a new or replacement entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryArgs {
    pub transaction_type: TransactionType,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init,
    Add(EntryArgs),
    List {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    Balance {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    Stats(Option<TransactionType>),
    Month {
        year: i32,
        month: u32,
    },
    Day(NaiveDate),
    Calendar {
        year: i32,
        month: u32,
    },
    Update {
        index: usize,
        entry: EntryArgs,
    },
    Delete(usize),
    Clear,
    Categories(Option<TransactionType>),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub ledger_file: Option<PathBuf>,
    pub command: Command,
}

pub const USAGE: &str = "\
usage: ledger_core_cli [--file PATH] <command>

commands:
  init                                         create the ledger file
  add <income|expense> <date> <category> <amount> [description]
  list [--from DATE] [--to DATE]               show entries
  balance [--from DATE] [--to DATE]            income, expense and balance
  stats [income|expense]                       per-category totals
  month <year> <month>                         monthly summary
  day <date>                                   entries on one day
  calendar <year> <month>                      calendar events for a month
  update <index> <income|expense> <date> <category> <amount> [description]
  delete <index>                               remove one entry
  clear                                        remove every entry
  categories [income|expense]                  suggested categories";

/// Entry point used by the binary.
pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = parse_args(&args)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(invocation, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn parse_args(args: &[String]) -> Result<Invocation, CliError> {
    let mut ledger_file = None;
    let mut rest = args;
    while let Some(first) = rest.first() {
        match first.as_str() {
            "--file" | "-f" => {
                let path = rest
                    .get(1)
                    .ok_or_else(|| CliError::Input("--file needs a path".into()))?;
                ledger_file = Some(PathBuf::from(path));
                rest = &rest[2..];
            }
            _ => break,
        }
    }
    let command = parse_command(rest)?;
    Ok(Invocation {
        ledger_file,
        command,
    })
}

fn parse_command(args: &[String]) -> Result<Command, CliError> {
    let Some((name, params)) = args.split_first() else {
        return Ok(Command::Help);
    };
    let command = match name.as_str() {
        "init" => Command::Init,
        "add" => Command::Add(parse_entry(params)?),
        "list" => {
            let (from, to) = parse_range_flags(params)?;
            Command::List { from, to }
        }
        "balance" => {
            let (from, to) = parse_range_flags(params)?;
            Command::Balance { from, to }
        }
        "stats" => Command::Stats(parse_optional_type(params)?),
        "month" => {
            let (year, month) = parse_year_month(params)?;
            Command::Month { year, month }
        }
        "day" => Command::Day(parse_date(arg(params, 0, "date")?)?),
        "calendar" => {
            let (year, month) = parse_year_month(params)?;
            Command::Calendar { year, month }
        }
        "update" => {
            let index = parse_index(arg(params, 0, "index")?)?;
            Command::Update {
                index,
                entry: parse_entry(&params[1..])?,
            }
        }
        "delete" => Command::Delete(parse_index(arg(params, 0, "index")?)?),
        "clear" => Command::Clear,
        "categories" => Command::Categories(parse_optional_type(params)?),
        "help" | "--help" | "-h" => Command::Help,
        other => return Err(CliError::Input(format!("unknown command `{other}`"))),
    };
    Ok(command)
}

fn arg<'a>(params: &'a [String], index: usize, name: &str) -> Result<&'a str, CliError> {
    params
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| CliError::Input(format!("missing <{name}>")))
}

fn parse_entry(params: &[String]) -> Result<EntryArgs, CliError> {
    let transaction_type = TransactionType::parse(arg(params, 0, "type")?, &TypeLabels::default())?;
    let date = parse_date(arg(params, 1, "date")?)?;
    let category = arg(params, 2, "category")?.to_string();
    let amount = parse_amount(arg(params, 3, "amount")?)?;
    if amount <= Decimal::ZERO {
        return Err(CliError::Input("amount must be greater than zero".into()));
    }
    let description = params.get(4..).map(|words| words.join(" ")).unwrap_or_default();
    Ok(EntryArgs {
        transaction_type,
        date,
        category,
        amount,
        description,
    })
}

fn parse_range_flags(params: &[String]) -> Result<(Option<NaiveDate>, Option<NaiveDate>), CliError> {
    let mut from = None;
    let mut to = None;
    let mut iter = params.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| CliError::Input(format!("{flag} needs a date")))?;
        match flag.as_str() {
            "--from" => from = Some(parse_date(value)?),
            "--to" => to = Some(parse_date(value)?),
            other => return Err(CliError::Input(format!("unknown flag `{other}`"))),
        }
    }
    Ok((from, to))
}

fn parse_optional_type(params: &[String]) -> Result<Option<TransactionType>, CliError> {
    params
        .first()
        .map(|value| TransactionType::parse(value, &TypeLabels::default()))
        .transpose()
        .map_err(CliError::from)
}

fn parse_year_month(params: &[String]) -> Result<(i32, u32), CliError> {
    let year = arg(params, 0, "year")?
        .parse::<i32>()
        .map_err(|_| CliError::Input("year must be a number".into()))?;
    let month = arg(params, 1, "month")?
        .parse::<u32>()
        .map_err(|_| CliError::Input("month must be a number".into()))?;
    Ok((year, month))
}

fn parse_index(value: &str) -> Result<usize, CliError> {
    value
        .parse::<usize>()
        .map_err(|_| CliError::Input(format!("`{value}` is not a valid index")))
}
