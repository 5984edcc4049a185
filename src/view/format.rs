use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use std::fmt::Write;

/// Matches the en-US `toLocaleDateString` shape, e.g. `1/1/2024`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Shown in place of a timestamp that is missing, unparseable, or that the
/// configured pattern cannot render.
const INVALID_DATE: &str = "Invalid Date";

/// Whether `pattern` only contains strftime specifiers chrono understands.
pub fn is_valid_date_format(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// RFC 3339 or RFC 2822 with an offset; offset-less ISO date-times and bare
/// dates are read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();

    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                })
                .map(|naive| naive.and_utc().fixed_offset())
        })
}

pub fn format_date(created_at: &str, timezone: Tz, pattern: &str) -> String {
    let Some(timestamp) = parse_timestamp(created_at) else {
        return INVALID_DATE.to_string();
    };
    let local = timestamp.with_timezone(&timezone);

    let mut formatted = String::new();
    if write!(formatted, "{}", local.format(pattern)).is_err() {
        return INVALID_DATE.to_string();
    }
    formatted
}

/// `₹` + `250.50` renders as `₹250.5`: trailing zeros are dropped the way a
/// JSON number would print. A missing amount leaves the bare symbol.
pub fn format_amount(amount: Option<Decimal>, currency_symbol: &str) -> String {
    match amount {
        Some(amount) => format!("{currency_symbol}{}", amount.normalize()),
        None => currency_symbol.to_string(),
    }
}
