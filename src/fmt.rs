/// Format a float as a naira amount with thousands separators: ₦1,234.
/// Amounts are shown to the nearest whole naira.
pub fn naira(val: f64) -> String {
    let negative = val < 0.0;
    let whole = format!("{:.0}", val.abs());

    let mut with_commas = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-₦{with_commas}")
    } else {
        format!("₦{with_commas}")
    }
}

/// Format a value already scaled to percent with two decimals: 12.34%
pub fn percent(val: f64) -> String {
    format!("{val:.2}%")
}

/// Format an integer count with thousands separators.
pub fn number(val: i64) -> String {
    let negative = val < 0;
    let digits = val.unsigned_abs().to_string();

    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas}")
    } else {
        with_commas
    }
}

/// Format a file size in bytes as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}
