use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{PaymentType, Transaction};

// ---------------------------------------------------------------------------
// Ledger view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LedgerRow {
    pub transaction: Transaction,
    /// Balance after applying this row. Not persisted anywhere.
    pub running_balance: Decimal,
}

#[derive(Debug, Clone)]
pub struct LedgerView {
    pub rows: Vec<LedgerRow>,
    pub opening_balance: Decimal,
    pub total_credit: Decimal,
    pub total_debit: Decimal,
    pub closing_balance: Decimal,
    /// Whether the input carried an opening balance row at all.
    pub has_opening_row: bool,
    /// Day before `from`, i.e. the date the opening balance is stated as of.
    pub opening_as_of: Option<NaiveDate>,
}

/// Undated rows (unknown record types) carry no amount into the balance and
/// cannot be placed outside any window, so they are always listed.
fn in_window(date: Option<NaiveDate>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    match date {
        Some(d) => from.map_or(true, |f| d >= f) && to.map_or(true, |t| d <= t),
        None => true,
    }
}

/// Materialize a statement: chronological rows inside `[from, to]` with
/// running balances, seeded by the opening balance as of `from`.
///
/// Rows sharing a date keep their input order; undated rows come first.
pub fn build_ledger(
    transactions: &[Transaction],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> LedgerView {
    let mut openings = transactions.iter().filter(|tx| tx.is_opening());
    let opening_row = openings.next();
    let extra = openings.count();
    if extra > 0 {
        log::warn!("ignoring {extra} additional opening balance row(s); the first one wins");
    }

    let mut others: Vec<&Transaction> = transactions.iter().filter(|tx| !tx.is_opening()).collect();
    // Vec::sort_by_key is stable.
    others.sort_by_key(|tx| tx.date);

    let mut opening_balance = opening_row.map_or(Decimal::ZERO, |tx| tx.amount);
    if let Some(from) = from {
        let replayed: Decimal = others
            .iter()
            .filter(|tx| tx.date.is_some_and(|d| d < from))
            .map(|tx| tx.signed_amount())
            .sum();
        log::debug!("opening balance as of {from}: replayed {replayed} onto {opening_balance}");
        opening_balance += replayed;
    }

    let mut running = opening_balance;
    let mut total_credit = Decimal::ZERO;
    let mut total_debit = Decimal::ZERO;
    let mut rows = Vec::new();
    for tx in others.into_iter().filter(|tx| in_window(tx.date, from, to)) {
        if tx.credit {
            total_credit += tx.amount;
        } else if tx.debit {
            total_debit += tx.amount;
        }
        running += tx.signed_amount();
        rows.push(LedgerRow {
            transaction: tx.clone(),
            running_balance: running,
        });
    }

    LedgerView {
        rows,
        opening_balance,
        total_credit,
        total_debit,
        closing_balance: opening_balance + total_credit - total_debit,
        has_opening_row: opening_row.is_some(),
        opening_as_of: from.and_then(|f| f.pred_opt()),
    }
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub credit: Decimal,
    pub debit: Decimal,
}

impl Totals {
    pub fn net(&self) -> Decimal {
        self.credit - self.debit
    }

    fn add(&mut self, tx: &Transaction) {
        if tx.credit {
            self.credit += tx.amount;
        } else if tx.debit {
            self.debit += tx.amount;
        }
    }
}

/// Credit/debit totals over every non-opening transaction, no date filter.
pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut t = Totals::default();
    for tx in transactions.iter().filter(|tx| !tx.is_opening()) {
        t.add(tx);
    }
    t
}

/// Label under which a transaction is grouped by [`totals_by_account`].
pub fn account_label(tx: &Transaction) -> String {
    match (tx.payment_type, tx.bank.as_deref()) {
        (Some(PaymentType::Cash), _) => "Cash".to_string(),
        (Some(PaymentType::Bank), Some(bank)) => bank.to_string(),
        (Some(PaymentType::Bank), None) => "Bank (unnamed)".to_string(),
        (None, _) => "Unassigned".to_string(),
    }
}

/// Per-bank and cash totals, sorted by label.
pub fn totals_by_account(transactions: &[Transaction]) -> Vec<(String, Totals)> {
    let mut groups: BTreeMap<String, Totals> = BTreeMap::new();
    for tx in transactions.iter().filter(|tx| !tx.is_opening()) {
        groups.entry(account_label(tx)).or_default().add(tx);
    }
    groups.into_iter().collect()
}
