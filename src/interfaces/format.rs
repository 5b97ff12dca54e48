use crate::domain::money::Money;
use chrono::NaiveDate;
use rust_decimal::RoundingStrategy;

/// Whole dollars with thousands separators, e.g. `$2,760` or `-$105`.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount
        .value()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Long US date, e.g. `October 18, 2026`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Money::ZERO), "$0");
        assert_eq!(format_currency(Money::new(dec!(460))), "$460");
        assert_eq!(format_currency(Money::new(dec!(2760))), "$2,760");
        assert_eq!(format_currency(Money::new(dec!(1234567))), "$1,234,567");
        assert_eq!(format_currency(Money::new(dec!(-105))), "-$105");
    }

    #[test]
    fn test_format_currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(Money::new(dec!(76.5))), "$77");
        assert_eq!(format_currency(Money::new(dec!(178.49))), "$178");
        assert_eq!(format_currency(Money::new(dec!(-0.4))), "$0");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 8).unwrap();
        assert_eq!(format_date(date), "October 8, 2026");
    }
}
