//! Display formatting for numbers, money and dates.

/// Shown wherever an optional value is missing.
pub const PLACEHOLDER: &str = "N/A";

/// Two-digit, zero-padded ball label. Draw numbers never exceed two digits.
pub fn pad_number(number: u8) -> String {
    format!("{number:02}")
}

/// pt-BR currency, e.g. `R$ 1.234,56` (the gap is a no-break space).
/// A missing amount is formatted as zero.
pub fn format_currency(value: Option<f64>) -> String {
    let value = value.filter(|v| v.is_finite()).unwrap_or(0.0);
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}R$\u{a0}{},{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

/// Re-joins `D/M/Y` dates; anything that is not three segments comes back
/// untouched. This is display normalization, not date parsing.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return PLACEHOLDER.to_string();
    };
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() == 3 {
        parts.join("/")
    } else {
        raw.to_string()
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value}%")
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "SIM"
    } else {
        "NÃO"
    }
}

pub fn or_placeholder<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn group_thousands(mut units: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if units < 1000 {
            groups.push(units.to_string());
            break;
        }
        groups.push(format!("{:03}", units % 1000));
        units /= 1000;
    }
    groups.reverse();
    groups.join(".")
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
