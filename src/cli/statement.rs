use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::cli::{load_listing, range_label, OutputFormat};
use crate::error::Result;
use crate::fmt::{amount, amount_in_words, amount_or_dash, display_date, display_opt_date, or_dash};
use crate::ledger::{build_ledger, LedgerView};
use crate::models::TransactionKind;
use crate::scope::StatementScope;

pub fn run(
    input: &Path,
    scope: &StatementScope,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    format: OutputFormat,
) -> Result<()> {
    let transactions = load_listing(input)?;
    let view = build_ledger(&scope.filter(&transactions), from, to);
    match format {
        OutputFormat::Table => print_table(&view, scope, &range_label(from, to)),
        OutputFormat::Csv => write_csv(&view, std::io::stdout().lock())?,
    }
    Ok(())
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text.to_string()).set_alignment(CellAlignment::Right)
}

fn print_table(view: &LedgerView, scope: &StatementScope, range: &str) {
    println!("{}", scope.heading().bold());
    println!("{range}");
    if scope.shows_opening_balance() && view.has_opening_row {
        match view.opening_as_of {
            Some(d) => println!(
                "Opening Balance as of {}: {}",
                display_date(d),
                amount(view.opening_balance).bold()
            ),
            None => println!("Opening Balance: {}", amount(view.opening_balance).bold()),
        }
    }

    if view.rows.is_empty() {
        println!("No transactions in this period.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Details", "Description", "Credit", "Debit", "Balance"]);
    for row in &view.rows {
        let tx = &row.transaction;
        let credit = if tx.credit { amount(tx.amount).green().to_string() } else { "-".to_string() };
        let debit = if tx.debit { amount(tx.amount).red().to_string() } else { "-".to_string() };
        table.add_row(vec![
            Cell::new(display_opt_date(tx.date)),
            Cell::new(or_dash(&tx.details)),
            Cell::new(or_dash(&tx.description)),
            right(credit),
            right(debit),
            right(amount(row.running_balance)),
        ]);
    }
    table.add_row(vec![
        Cell::new(""),
        Cell::new("Total".bold()),
        Cell::new(""),
        right(amount_or_dash(view.total_credit).bold()),
        right(amount_or_dash(view.total_debit).bold()),
        right(amount(view.closing_balance).bold()),
    ]);
    println!("{table}");

    let words = amount_in_words(view.closing_balance);
    if words.is_empty() {
        println!("Closing balance: {}", amount(view.closing_balance));
    } else {
        println!("Closing balance: {} ({words})", amount(view.closing_balance));
    }
}

/// Same rounding as the table and PDF, without thousands separators.
fn plain(val: Decimal) -> String {
    format!(
        "{:.2}",
        val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Machine-readable statement: an opening row, then one row per transaction.
pub fn write_csv<W: Write>(view: &LedgerView, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["date", "type", "details", "description", "credit", "debit", "balance"])?;
    let opening_date = view.opening_as_of.map(|d| d.to_string()).unwrap_or_default();
    let opening = plain(view.opening_balance);
    wtr.write_record([
        opening_date.as_str(),
        TransactionKind::OpeningBalance.label(),
        "Opening Balance",
        "",
        "",
        "",
        opening.as_str(),
    ])?;
    for row in &view.rows {
        let tx = &row.transaction;
        let date = tx.date.map(|d| d.to_string()).unwrap_or_default();
        let credit = if tx.credit { plain(tx.amount) } else { String::new() };
        let debit = if tx.debit { plain(tx.amount) } else { String::new() };
        let balance = plain(row.running_balance);
        wtr.write_record([
            date.as_str(),
            tx.kind.label(),
            tx.details.as_str(),
            tx.description.as_str(),
            credit.as_str(),
            debit.as_str(),
            balance.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
