//! Duration and date helpers

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Parse a compact duration such as `500ms`, `30s`, `5m`, `1h`, `2d` or `1h30m`.
///
/// Units may be concatenated; a bare number, an unknown unit or a zero total
/// is rejected.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return Err("duration is empty".to_string());
    }

    let mut total = Duration::ZERO;
    let mut chars = input.chars().peekable();

    while chars.peek().is_some() {
        let mut digits = String::new();
        while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(c);
            chars.next();
        }
        let mut unit = String::new();
        while let Some(c) = chars.peek().copied().filter(char::is_ascii_alphabetic) {
            unit.push(c);
            chars.next();
        }

        if digits.is_empty() || unit.is_empty() {
            return Err(format!("invalid duration '{}'", input));
        }
        let value: u64 = digits
            .parse()
            .map_err(|_| format!("invalid number in duration '{}'", input))?;

        let part = match unit.as_str() {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(60 * 60)),
            "d" => Duration::from_secs(value.saturating_mul(60 * 60 * 24)),
            other => return Err(format!("unknown duration unit '{}'", other)),
        };
        total = total.saturating_add(part);
    }

    if total.is_zero() {
        return Err(format!("duration '{}' must be greater than zero", input));
    }
    Ok(total)
}

/// Render a duration back into the compact form accepted by [`parse_duration`]
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis == 0 {
        return "0s".to_string();
    }

    let units: [(u128, &str); 5] = [
        (86_400_000, "d"),
        (3_600_000, "h"),
        (60_000, "m"),
        (1_000, "s"),
        (1, "ms"),
    ];

    let mut rest = millis;
    let mut out = String::new();
    for (size, suffix) in units {
        if rest >= size {
            out.push_str(&format!("{}{}", rest / size, suffix));
            rest %= size;
        }
    }
    out
}

/// Midnight UTC at the start of `date`
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
