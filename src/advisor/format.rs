//! Number formatting used inside prompts and desk results.

/// Comma-grouped integer: `25000.0` -> `"25,000"`. Rounds to the nearest unit.
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Grouped with a fixed number of decimals: `1234.5, 2` -> `"1,234.50"`.
pub fn group_decimal(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let int_value: f64 = int_part.parse().unwrap_or(0.0);
    let mut out = group_thousands(int_value);
    if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        out.insert(0, '-');
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Percentage with a zero fraction dropped: `10.0` -> `"10%"`, `2.5` -> `"2.5%"`.
pub fn format_percent(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    // values that round to zero print without a sign
    let text = if text == "-0" { "0" } else { text };
    format!("{}%", text)
}

/// Exchange rate: `25000.0` -> `"25,000 VND/USD"`.
pub fn format_rate(value: f64) -> String {
    format!("{} VND/USD", group_thousands(value))
}

/// Amount in billions of dong: `5000.0` -> `"5,000 tỷ VND"`.
pub fn format_vnd_billions(value: f64) -> String {
    format!("{} tỷ VND", group_thousands(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(25000.0), "25,000");
        assert_eq!(group_thousands(1234567.4), "1,234,567");
        assert_eq!(group_thousands(-1500.0), "-1,500");
        assert_eq!(group_thousands(999.6), "1,000");
    }

    #[test]
    fn test_group_decimal() {
        assert_eq!(group_decimal(1234.5, 2), "1,234.50");
        assert_eq!(group_decimal(-0.001, 2), "0.00");
        assert_eq!(group_decimal(-2500.34, 1), "-2,500.3");
        assert_eq!(group_decimal(12.0, 0), "12");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(10.0), "10%");
        assert_eq!(format_percent(2.5), "2.5%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(-3.25), "-3.25%");
        assert_eq!(format_percent(-0.001), "0%");
        assert_eq!(format_percent(-0.0), "0%");
    }

    #[test]
    fn test_currency_suffixes() {
        assert_eq!(format_rate(25000.0), "25,000 VND/USD");
        assert_eq!(format_vnd_billions(5000.0), "5,000 tỷ VND");
    }
}
