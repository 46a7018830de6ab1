use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::PassbookError;
use crate::models::{PaymentType, Transaction};

/// Which slice of the bank & cash book a statement covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatementScope {
    #[default]
    All,
    /// Bank transactions, optionally for a single named bank.
    Bank(Option<String>),
    Cash,
}

impl StatementScope {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if tx.is_opening() {
            // Bank openings carry the bank name; the cash opening has none.
            return match self {
                Self::Bank(Some(name)) => tx.bank.as_deref() == Some(name.as_str()),
                Self::Bank(None) => false,
                Self::Cash | Self::All => tx.bank.is_none(),
            };
        }
        match self {
            Self::All => true,
            Self::Cash => tx.payment_type == Some(PaymentType::Cash),
            Self::Bank(None) => tx.payment_type == Some(PaymentType::Bank),
            Self::Bank(Some(name)) => {
                tx.payment_type == Some(PaymentType::Bank) && tx.bank.as_deref() == Some(name.as_str())
            }
        }
    }

    pub fn filter(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions.iter().filter(|tx| self.matches(tx)).cloned().collect()
    }

    pub fn heading(&self) -> String {
        match self {
            Self::Bank(Some(name)) => format!("Transactions for {name}"),
            Self::Cash => "Cash Transactions".to_string(),
            Self::All | Self::Bank(None) => "All Bank & Cash Entries".to_string(),
        }
    }

    /// The opening balance banner only makes sense for a single book.
    pub fn shows_opening_balance(&self) -> bool {
        matches!(self, Self::Bank(Some(_)) | Self::Cash)
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Bank(_) => "Bank",
            Self::Cash => "Cash",
        }
    }

    /// `BankStatement_<mode>_<bank|All>_<from|all>_<to|all>.pdf`
    pub fn file_name(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
        let bank = match self {
            Self::Bank(Some(name)) => name.replace(|c: char| matches!(c, '/' | '\\' | ' '), "-"),
            _ => "All".to_string(),
        };
        let bound = |d: Option<NaiveDate>| d.map_or_else(|| "all".to_string(), |d| d.to_string());
        format!("BankStatement_{}_{}_{}_{}.pdf", self.mode(), bank, bound(from), bound(to))
    }
}

impl FromStr for StatementScope {
    type Err = PassbookError;

    /// `all`, `cash`, `bank`, or `bank:<name>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((kind, name)) = s.split_once(':') {
            let name = name.trim();
            if kind.eq_ignore_ascii_case("bank") && !name.is_empty() {
                return Ok(Self::Bank(Some(name.to_string())));
            }
            return Err(PassbookError::InvalidScope(s.to_string()));
        }
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "bank" => Ok(Self::Bank(None)),
            "cash" => Ok(Self::Cash),
            _ => Err(PassbookError::InvalidScope(s.to_string())),
        }
    }
}

impl fmt::Display for StatementScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bank(Some(name)) => write!(f, "bank:{name}"),
            other => f.write_str(&other.mode().to_ascii_lowercase()),
        }
    }
}
