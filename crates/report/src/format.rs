use rust_decimal::{Decimal, RoundingStrategy};

/// Two-decimal amount with thousands separators, e.g. `-1,234.50`.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac_part
    )
}

/// Dollar amount, e.g. `$1,234.56` or `-$12.00`.
pub fn format_money(value: Decimal) -> String {
    let amount = format_amount(value);
    match amount.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", amount),
    }
}

/// Percentage with two decimals, e.g. `12.34%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(1234.56)), "$1,234.56");
        assert_eq!(format_money(dec!(0)), "$0.00");
        assert_eq!(format_money(dec!(999)), "$999.00");
        assert_eq!(format_money(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_money(dec!(-12)), "-$12.00");
        assert_eq!(format_money(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(100000)), "100,000.00");
        assert_eq!(format_amount(dec!(0.5)), "0.50");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(66.67)), "66.67%");
        assert_eq!(format_percent(dec!(100)), "100.00%");
        assert_eq!(format_percent(Decimal::ZERO), "0.00%");
    }
}
