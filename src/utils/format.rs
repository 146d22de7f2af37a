use chrono::{DateTime, Local, Utc};

/// USD with thousands separators; zero, negative and non-finite amounts print as a dash.
pub fn money(amount: f64) -> String {
    if !amount.is_finite() || amount <= 0.0 {
        return "—".to_string();
    }
    let cents = (amount * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${}.{:02}", grouped, cents % 100)
}

/// Same as [`money`] but renders zero as `$0.00` (fleet tables).
pub fn money_or_zero(amount: f64) -> String {
    if amount == 0.0 {
        "$0.00".to_string()
    } else {
        money(amount)
    }
}

pub fn fmt_datetime(iso: Option<&str>) -> String {
    let Some(iso) = iso.filter(|s| !s.is_empty()) else {
        return "—".to_string();
    };
    match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%b %d, %Y, %H:%M")
            .to_string(),
        Err(_) => "—".to_string(),
    }
}

pub fn parse_instant(iso: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(iso)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            // Backends sometimes omit the offset on UTC fields.
            chrono::NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(iso, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(50.0), "$50.00");
        assert_eq!(money(1234.5), "$1,234.50");
        assert_eq!(money(1_000_000.0), "$1,000,000.00");
        assert_eq!(money(0.0), "—");
        assert_eq!(money(-3.0), "—");
        assert_eq!(money(f64::NAN), "—");
        assert_eq!(money_or_zero(0.0), "$0.00");
    }

    #[test]
    fn test_fmt_datetime_rejects_garbage() {
        assert_eq!(fmt_datetime(None), "—");
        assert_eq!(fmt_datetime(Some("")), "—");
        assert_eq!(fmt_datetime(Some("not a date")), "—");
        assert_ne!(fmt_datetime(Some("2025-01-01T10:00:00Z")), "—");
    }

    #[test]
    fn test_parse_instant_without_offset() {
        let with = parse_instant("2025-01-01T10:00:00Z").unwrap();
        let without = parse_instant("2025-01-01T10:00:00").unwrap();
        assert_eq!(with, without);
        assert_eq!(
            parse_instant("2025-06-02"),
            parse_instant("2025-06-02T00:00:00Z")
        );
        assert!(parse_instant("2025-06-02").is_some());
        assert!(parse_instant("yesterday").is_none());
        assert!(parse_instant("2025-02-30").is_none());
    }
}
