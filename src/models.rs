use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    OpeningBalance,
    CompanyBill,
    Buyer,
    Salary,
    Other,
    /// A `type` tag this tool does not know. Kept for display, never totalled.
    Unknown(String),
}

impl TransactionKind {
    pub fn label(&self) -> &str {
        match self {
            Self::OpeningBalance => "OpeningBalance",
            Self::CompanyBill => "CompanyBill",
            Self::Buyer => "Buyer",
            Self::Salary => "Salary",
            Self::Other => "Other",
            Self::Unknown(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentType {
    Bank,
    Cash,
}

impl PaymentType {
    /// Lenient parse of the backend's `payment_type` column.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("bank") {
            Some(Self::Bank)
        } else if raw.eq_ignore_ascii_case("cash") {
            Some(Self::Cash)
        } else {
            None
        }
    }
}

/// One ledger line in the common shape every record type is normalized into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: Option<i64>,
    pub kind: TransactionKind,
    /// Always present except on opening balance rows.
    pub date: Option<NaiveDate>,
    pub amount: Decimal,
    pub credit: bool,
    pub debit: bool,
    pub details: String,
    pub description: String,
    pub payment_type: Option<PaymentType>,
    pub bank: Option<String>,
}

impl Transaction {
    pub fn is_opening(&self) -> bool {
        self.kind == TransactionKind::OpeningBalance
    }

    /// +amount for credits, -amount for debits, zero for anything else.
    pub fn signed_amount(&self) -> Decimal {
        if self.credit {
            self.amount
        } else if self.debit {
            -self.amount
        } else {
            Decimal::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Raw records as the transaction listing service returns them
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RawOpeningBalance {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub bank: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCompanyBill {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub bank: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBuyerPayment {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub bank: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSalary {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub bank: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOtherTransaction {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
    /// User-defined label such as "Rent" or "Loan".
    #[serde(default, alias = "other_type")]
    pub category: Option<String>,
    /// "credit" or "debit".
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub bank: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUnknown {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default, alias = "name")]
    pub details: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub bank: Option<String>,
}

/// A listing record, discriminated by its `type` field.
#[derive(Debug, Clone)]
pub enum RawRecord {
    OpeningBalance(RawOpeningBalance),
    CompanyBill(RawCompanyBill),
    Buyer(RawBuyerPayment),
    Salary(RawSalary),
    Other(RawOtherTransaction),
    Unknown { type_name: String, record: RawUnknown },
}
