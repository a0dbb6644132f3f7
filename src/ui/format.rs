//! Number formatting for KPI cards and tables. NaN is shown as "NaN" so a
//! missing input stays visible instead of turning into a zero.

/// Whole number with thousands separators, e.g. `1,234,567`.
pub fn integer(v: f64) -> String {
    if !v.is_finite() {
        return "NaN".to_string();
    }
    let n = v.trunc() as i64;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

/// Two decimals.
pub fn decimal(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.2}")
    }
}

pub fn percent(v: f64) -> String {
    format!("{}%", decimal(v))
}

pub fn money(currency: &str, v: f64) -> String {
    format!("{currency} {}", integer(v))
}
