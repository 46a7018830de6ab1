use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{PassbookError, Result};
use crate::models::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a zero-padded `YYYY-MM-DD` date. A trailing `T...` time part is
/// dropped; any other shape is rejected rather than guessed at.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate> {
    let day = raw.trim().split('T').next().unwrap_or_default();
    let bytes = day.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
    if !well_formed {
        return Err(PassbookError::InvalidDate(format!(
            "'{raw}' is not a zero-padded YYYY-MM-DD date"
        )));
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| PassbookError::InvalidDate(format!("'{raw}': {e}")))
}

fn required_date(raw: Option<&str>, kind: &str) -> Result<NaiveDate> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_iso_date(s),
        None => Err(PassbookError::InvalidRecord(format!("{kind} record has no date"))),
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn payment(raw: Option<&str>, bank: Option<&str>) -> Option<PaymentType> {
    match raw.and_then(PaymentType::parse) {
        Some(p) => Some(p),
        None if raw.is_none() && bank.is_some() => Some(PaymentType::Bank),
        None => None,
    }
}

// ---------------------------------------------------------------------------
// Record decoding
// ---------------------------------------------------------------------------

impl RawRecord {
    /// Decode one listing element by its `type` tag. Unrecognised tags become
    /// `RawRecord::Unknown` instead of failing.
    pub fn from_value(value: Value) -> Result<Self> {
        let type_name = value
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PassbookError::InvalidRecord("missing \"type\" field".into()))?;

        let invalid = |e: serde_json::Error| PassbookError::InvalidRecord(format!("{type_name}: {e}"));
        let record = match type_name.as_str() {
            "OpeningBalance" => Self::OpeningBalance(serde_json::from_value(value).map_err(invalid)?),
            "CompanyBill" => Self::CompanyBill(serde_json::from_value(value).map_err(invalid)?),
            "Buyer" => Self::Buyer(serde_json::from_value(value).map_err(invalid)?),
            "Salary" => Self::Salary(serde_json::from_value(value).map_err(invalid)?),
            "Other" => Self::Other(serde_json::from_value(value).map_err(invalid)?),
            _ => {
                let record = serde_json::from_value(value).map_err(invalid)?;
                Self::Unknown { type_name, record }
            }
        };
        Ok(record)
    }
}

// ---------------------------------------------------------------------------
// Normalization, one function per record type
// ---------------------------------------------------------------------------

pub fn normalize(record: RawRecord) -> Result<Transaction> {
    match record {
        RawRecord::OpeningBalance(r) => opening_balance(r),
        RawRecord::CompanyBill(r) => company_bill(r),
        RawRecord::Buyer(r) => buyer_payment(r),
        RawRecord::Salary(r) => salary(r),
        RawRecord::Other(r) => other(r),
        RawRecord::Unknown { type_name, record } => unknown(type_name, record),
    }
}

/// Decode and normalize in one step.
pub fn normalize_value(value: Value) -> Result<Transaction> {
    normalize(RawRecord::from_value(value)?)
}

fn opening_balance(r: RawOpeningBalance) -> Result<Transaction> {
    let date = match non_empty(r.date) {
        Some(d) => Some(parse_iso_date(&d)?),
        None => None,
    };
    let bank = non_empty(r.bank);
    let payment_type = r
        .payment_type
        .as_deref()
        .and_then(PaymentType::parse)
        .or(Some(if bank.is_some() { PaymentType::Bank } else { PaymentType::Cash }));
    Ok(Transaction {
        id: r.id,
        kind: TransactionKind::OpeningBalance,
        date,
        amount: r.amount,
        credit: false,
        debit: false,
        details: "Opening Balance".to_string(),
        description: "Opening Balance".to_string(),
        payment_type,
        bank,
    })
}

fn company_bill(r: RawCompanyBill) -> Result<Transaction> {
    let bank = non_empty(r.bank);
    Ok(Transaction {
        id: r.id,
        kind: TransactionKind::CompanyBill,
        date: Some(required_date(r.date.as_deref(), "CompanyBill")?),
        amount: r.amount,
        credit: false,
        debit: true,
        details: r.company.trim().to_string(),
        description: non_empty(r.notice).unwrap_or_default(),
        payment_type: payment(r.payment_type.as_deref(), bank.as_deref()),
        bank,
    })
}

fn buyer_payment(r: RawBuyerPayment) -> Result<Transaction> {
    let bank = non_empty(r.bank);
    Ok(Transaction {
        id: r.id,
        kind: TransactionKind::Buyer,
        date: Some(required_date(r.date.as_deref(), "Buyer")?),
        amount: r.amount,
        credit: true,
        debit: false,
        details: r.name.trim().to_string(),
        description: non_empty(r.notes).unwrap_or_default(),
        payment_type: payment(r.payment_type.as_deref(), bank.as_deref()),
        bank,
    })
}

fn salary(r: RawSalary) -> Result<Transaction> {
    let bank = non_empty(r.bank);
    Ok(Transaction {
        id: r.id,
        kind: TransactionKind::Salary,
        date: Some(required_date(r.date.as_deref(), "Salary")?),
        amount: r.amount,
        credit: false,
        debit: true,
        details: r.name.trim().to_string(),
        description: non_empty(r.notice).unwrap_or_default(),
        payment_type: payment(r.payment_type.as_deref(), bank.as_deref()),
        bank,
    })
}

fn other(r: RawOtherTransaction) -> Result<Transaction> {
    // The backend treats a missing direction as a debit.
    let (credit, debit) = match r.transaction_type.as_deref().map(str::trim) {
        None | Some("") => (false, true),
        Some(t) if t.eq_ignore_ascii_case("debit") => (false, true),
        Some(t) if t.eq_ignore_ascii_case("credit") => (true, false),
        Some(t) => {
            return Err(PassbookError::InvalidRecord(format!(
                "Other: unknown transaction_type '{t}'"
            )))
        }
    };
    let category = non_empty(r.category);
    let bank = non_empty(r.bank);
    Ok(Transaction {
        id: r.id,
        kind: TransactionKind::Other,
        date: Some(required_date(r.date.as_deref(), "Other")?),
        amount: r.amount,
        credit,
        debit,
        details: non_empty(r.name).or_else(|| category.clone()).unwrap_or_default(),
        description: non_empty(r.notice).or(category).unwrap_or_default(),
        payment_type: payment(r.payment_type.as_deref(), bank.as_deref()),
        bank,
    })
}

/// Unknown tags are listed but never move a balance, so a date is optional.
fn unknown(type_name: String, r: RawUnknown) -> Result<Transaction> {
    let bank = non_empty(r.bank);
    let date = match non_empty(r.date) {
        Some(d) => Some(parse_iso_date(&d)?),
        None => None,
    };
    Ok(Transaction {
        id: r.id,
        date,
        kind: TransactionKind::Unknown(type_name),
        amount: r.amount.unwrap_or(Decimal::ZERO),
        credit: false,
        debit: false,
        details: non_empty(r.details).unwrap_or_default(),
        description: non_empty(r.description).unwrap_or_default(),
        payment_type: payment(r.payment_type.as_deref(), bank.as_deref()),
        bank,
    })
}
