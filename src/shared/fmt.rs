//! Number formatting for chart labels and the price header.
//!
//! Prices on the board span many orders of magnitude (micro-cap tokens trade
//! well below a cent), so the number of decimals is picked from the value.

/// Inserts thousands separators into an integer string (sign allowed).
pub fn group_thousands(integer: &str) -> String {
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn price_decimals(value: f64) -> usize {
    let abs_value = value.abs();

    if abs_value >= 1_000.0 {
        return 0;
    }
    if abs_value >= 1.0 || abs_value == 0.0 {
        return 2;
    }

    // Three significant digits after the leading zeros.
    let leading = abs_value.log10().floor().abs() as usize;
    (leading + 2).min(10)
}

/// Format a price with auto-detected decimal places and separators.
///
/// Values below 1 have trailing zeros trimmed; larger values keep cents.
pub fn price(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let decimals = price_decimals(value);
    let formatted = format!("{:.1$}", value, decimals);
    let (integer, fraction) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let integer = group_thousands(integer);
    match fraction {
        Some(f) if value.abs() < 1.0 && value != 0.0 => {
            let trimmed = f.trim_end_matches('0');
            if trimmed.is_empty() {
                integer
            } else {
                format!("{}.{}", integer, trimmed)
            }
        }
        Some(f) => format!("{}.{}", integer, f),
        None => integer,
    }
}

/// Format a signed percentage, e.g. `+1.25%` / `-0.50%`.
pub fn percent(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    format!("{:+.2}%", value)
}
