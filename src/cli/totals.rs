use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::load_listing;
use crate::error::Result;
use crate::fmt::amount;
use crate::ledger::{totals, totals_by_account, Totals};

fn right(text: impl ToString) -> Cell {
    Cell::new(text.to_string()).set_alignment(CellAlignment::Right)
}

fn net_cell(t: &Totals) -> Cell {
    let net = t.net();
    if net.is_sign_negative() {
        right(amount(net).red())
    } else {
        right(amount(net).green())
    }
}

pub fn run(input: &Path) -> Result<()> {
    let transactions = load_listing(input)?;
    let groups = totals_by_account(&transactions);
    if groups.is_empty() {
        println!("No transactions.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Account", "Credit", "Debit", "Net"]);
    for (label, t) in &groups {
        table.add_row(vec![
            Cell::new(label),
            right(amount(t.credit)),
            right(amount(t.debit)),
            net_cell(t),
        ]);
    }
    let all = totals(&transactions);
    table.add_row(vec![
        Cell::new("Total".bold()),
        right(amount(all.credit).bold()),
        right(amount(all.debit).bold()),
        net_cell(&all),
    ]);
    println!("Bank & Cash Totals\n{table}");
    Ok(())
}
