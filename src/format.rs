//! Display formatting for counters and money. Display-only: nothing here
//! is meant to parse back.

/// Compact counter: `950`, `1.2K`, `3.4M`, `1B`. Zero, NaN and infinities
/// all render as `"0"`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    if n >= 1e9 {
        compact(n / 1e9, "B")
    } else if n >= 1e6 {
        compact(n / 1e6, "M")
    } else if n >= 1e3 {
        compact(n / 1e3, "K")
    } else {
        (n.floor() as u64).to_string()
    }
}

// Truncates to one decimal so 999_999 never shows as "1000.0K".
fn compact(v: f64, suffix: &str) -> String {
    let tenths = (v * 10.0).floor() as u64;
    if tenths % 10 == 0 {
        format!("{}{}", tenths / 10, suffix)
    } else {
        format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
    }
}

/// `$12,345`; negative amounts render as `-$12,345`.
pub fn format_money(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    let n = amount.abs() as u64;
    if amount < 0.0 && n > 0 {
        format!("-${}", format_with_commas(n))
    } else {
        format!("${}", format_with_commas(n))
    }
}

/// Compact number with an explicit sign, for weekly deltas.
pub fn format_signed(n: f64) -> String {
    if !n.is_finite() || n == 0.0 {
        return "0".to_string();
    }
    if n > 0.0 {
        format!("+{}", format_number(n))
    } else {
        format_number(n)
    }
}

pub fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
