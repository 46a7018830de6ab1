use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::error::{PassbookError, Result};
use crate::models::Transaction;
use crate::normalizer::normalize_value;

/// A listing element that could not be normalized.
#[derive(Debug, Clone)]
pub struct Rejected {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<Rejected>,
}

/// Load a listing from a file, or from stdin when `path` is `-`.
pub fn load_path(path: &Path) -> Result<LoadReport> {
    if path.as_os_str() == "-" {
        return load_reader(std::io::stdin().lock());
    }
    let file = std::fs::File::open(path)?;
    load_reader(std::io::BufReader::new(file))
}

pub fn load_reader<R: Read>(reader: R) -> Result<LoadReport> {
    let root: Value = serde_json::from_reader(reader)?;
    let Value::Array(items) = root else {
        return Err(PassbookError::InvalidRecord(
            "expected a JSON array of transactions".into(),
        ));
    };

    let mut report = LoadReport::default();
    for (index, item) in items.into_iter().enumerate() {
        match normalize_value(item) {
            Ok(tx) => report.transactions.push(tx),
            Err(e) => {
                log::warn!("skipping record #{index}: {e}");
                report.rejected.push(Rejected {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }
    log::debug!(
        "loaded {} transactions, rejected {}",
        report.transactions.len(),
        report.rejected.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"[
        {"type": "OpeningBalance", "amount": 1000.0, "bank": "HDFC", "date": null},
        {"type": "Buyer", "id": 1, "date": "2024-01-05", "amount": 500.0, "name": "Globex", "payment_type": "Bank", "bank": "HDFC"},
        {"type": "Salary", "id": 2, "date": "2024-1-10", "amount": 200.0, "name": "Asha"},
        {"type": "CompanyBill", "id": 3, "date": "2024-01-10", "amount": 200.0, "company": "Acme", "payment_type": "Bank", "bank": "HDFC"},
        {"amount": 5}
    ]"#;

    #[test]
    fn test_load_reader_collects_rejections() {
        let report = load_reader(LISTING.as_bytes()).unwrap();
        assert_eq!(report.transactions.len(), 3);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].index, 2);
        assert!(report.rejected[0].reason.contains("2024-1-10"));
        assert_eq!(report.rejected[1].index, 4);
    }

    #[test]
    fn test_dateless_unknown_record_reaches_the_ledger() {
        let listing = r#"[
            {"type": "OpeningBalance", "amount": 1000},
            {"type": "Buyer", "date": "2024-01-05", "amount": 500, "name": "Globex", "payment_type": "Cash"},
            {"type": "Mystery", "amount": 50}
        ]"#;
        let report = load_reader(listing.as_bytes()).unwrap();
        assert!(report.rejected.is_empty());
        assert_eq!(report.transactions.len(), 3);

        let view = crate::ledger::build_ledger(&report.transactions, None, None);
        assert_eq!(view.rows.len(), 2);
        assert!(view.rows.iter().any(|r| r.transaction.kind.label() == "Mystery"));
        assert_eq!(view.opening_balance, rust_decimal::Decimal::from(1000));
        assert_eq!(view.closing_balance, rust_decimal::Decimal::from(1500));
    }

    #[test]
    fn test_load_reader_rejects_non_array() {
        let err = load_reader(r#"{"transactions": []}"#.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_load_reader_reports_bad_json() {
        assert!(matches!(
            load_reader("[{".as_bytes()),
            Err(PassbookError::Json(_))
        ));
    }

    #[test]
    fn test_load_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listing.json");
        std::fs::write(&path, LISTING).unwrap();
        let report = load_path(&path).unwrap();
        assert_eq!(report.transactions.len(), 3);
    }

    #[test]
    fn test_load_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PassbookError::Io(_)));
    }
}
