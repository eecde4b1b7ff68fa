//! Fixed numeric formatting for report output: currency with thousands
//! separators and two decimals, percentages at two or one decimal.

/// Formats a currency amount as e.g. `1,234,567.89`.
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let rendered = format!("{:.2}", value.abs());
    let (integer, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));
    let grouped = group_thousands(integer);
    if negative {
        format!("-{grouped}.{fraction}")
    } else {
        format!("{grouped}.{fraction}")
    }
}

/// Share-of-total percentage, two decimals: `45.17%`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Success-rate percentage, one decimal: `62.5%`.
pub fn format_rate(value: f64) -> String {
    format!("{value:.1}%")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
