use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format a decimal as an amount with thousands separators: 1,234.56
pub fn amount(val: Decimal) -> String {
    let rounded = val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO && !rounded.is_zero();
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

/// Credit/debit cells show a dash instead of zero.
pub fn amount_or_dash(val: Decimal) -> String {
    if val.is_zero() {
        "-".to_string()
    } else {
        amount(val)
    }
}

/// DD-MM-YYYY, as statements print dates.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

pub fn display_opt_date(date: Option<NaiveDate>) -> String {
    date.map(display_date).unwrap_or_default()
}

pub fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

fn words(n: u64) -> String {
    let tail = |rest: u64, sep: &str| {
        if rest == 0 {
            String::new()
        } else {
            format!("{sep}{}", words(rest))
        }
    };
    match n {
        0..=19 => ONES[n as usize].to_string(),
        20..=99 => format!("{}{}", TENS[(n / 10) as usize], tail(n % 10, " ")),
        100..=999 => format!("{} Hundred{}", ONES[(n / 100) as usize], tail(n % 100, " and ")),
        1_000..=99_999 => format!("{} Thousand{}", words(n / 1_000), tail(n % 1_000, " ")),
        100_000..=9_999_999 => format!("{} Lakh{}", words(n / 100_000), tail(n % 100_000, " ")),
        _ => format!("{} Crore{}", words(n / 10_000_000), tail(n % 10_000_000, " ")),
    }
}

/// Whole-rupee amount in words using Indian numbering, e.g.
/// "One Lakh Twenty Thousand Rupees Only". Empty for zero or negative amounts.
pub fn amount_in_words(val: Decimal) -> String {
    let rupees = val
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0);
    if rupees == 0 {
        return String::new();
    }
    format!("{} Rupees Only", words(rupees))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_formatting() {
        assert_eq!(amount(Decimal::new(123456, 2)), "1,234.56");
        assert_eq!(amount(Decimal::new(-50000, 2)), "-500.00");
        assert_eq!(amount(Decimal::ZERO), "0.00");
        assert_eq!(amount(Decimal::new(100000099, 2)), "1,000,000.99");
        assert_eq!(amount(Decimal::new(421, 1)), "42.10");
        assert_eq!(amount(Decimal::new(1005, 3)), "1.01");
        assert_eq!(amount(Decimal::new(-1, 3)), "0.00");
    }

    #[test]
    fn test_amount_or_dash() {
        assert_eq!(amount_or_dash(Decimal::ZERO), "-");
        assert_eq!(amount_or_dash(Decimal::from(5)), "5.00");
    }

    #[test]
    fn test_display_date() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(display_date(d), "05-01-2024");
        assert_eq!(display_opt_date(None), "");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(""), "-");
        assert_eq!(or_dash("  "), "-");
        assert_eq!(or_dash("Rent"), "Rent");
    }

    #[test]
    fn test_amount_in_words() {
        assert_eq!(amount_in_words(Decimal::from(5)), "Five Rupees Only");
        assert_eq!(amount_in_words(Decimal::from(45)), "Forty Five Rupees Only");
        assert_eq!(amount_in_words(Decimal::from(105)), "One Hundred and Five Rupees Only");
        assert_eq!(
            amount_in_words(Decimal::from(1300)),
            "One Thousand Three Hundred Rupees Only"
        );
        assert_eq!(
            amount_in_words(Decimal::from(120_000)),
            "One Lakh Twenty Thousand Rupees Only"
        );
        assert_eq!(
            amount_in_words(Decimal::from(25_030_001)),
            "Two Crore Fifty Lakh Thirty Thousand One Rupees Only"
        );
    }

    #[test]
    fn test_amount_in_words_rounds_to_whole_rupees() {
        assert_eq!(amount_in_words(Decimal::new(995, 1)), "One Hundred Rupees Only");
        assert_eq!(amount_in_words(Decimal::new(994, 1)), "Ninety Nine Rupees Only");
        assert_eq!(amount_in_words(Decimal::new(4, 1)), "");
        assert_eq!(amount_in_words(Decimal::from(-10)), "");
    }
}
