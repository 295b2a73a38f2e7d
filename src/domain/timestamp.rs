// Timestamp parsing for locale-formatted sensor timestamps
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a reading timestamp into local wall-clock time.
///
/// The primary shape is `DD/MM/YYYY HH:MM:SS` (day first). ISO shapes the upstream also
/// emits are accepted. Anything else is unparseable and yields `None`; this never panics.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    parse_day_first(input)
        .or_else(|| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.naive_local())
        })
}

fn parse_day_first(input: &str) -> Option<NaiveDateTime> {
    let mut parts = input.split_whitespace();
    let date_part = parts.next()?;
    let time_part = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let [day, month, year] = split_fields::<3>(date_part, '/')?;
    let [hour, minute, second] = split_fields::<3>(time_part, ':')?;

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
    date.and_hms_opt(hour, minute, second)
}

/// Split into exactly `N` unsigned numeric fields.
fn split_fields<const N: usize>(part: &str, separator: char) -> Option<[u32; N]> {
    let mut fields = [0u32; N];
    let mut pieces = part.split(separator);
    for field in fields.iter_mut() {
        *field = pieces.next()?.trim().parse().ok()?;
    }
    if pieces.next().is_some() {
        return None;
    }
    Some(fields)
}

/// Shorten `DD/MM/YYYY HH:MM:SS` to `DD/MM HH:MM` for dense axes.
/// Labels of any other shape come back unchanged.
pub fn short_axis_label(label: &str) -> String {
    let mut parts = label.split_whitespace();
    let (Some(date), Some(time)) = (parts.next(), parts.next()) else {
        return label.to_string();
    };

    let mut date_fields = date.split('/');
    match (date_fields.next(), date_fields.next(), time.get(..5)) {
        (Some(day), Some(month), Some(hh_mm)) if date.contains('/') => {
            format!("{}/{} {}", day, month, hh_mm)
        }
        _ => label.to_string(),
    }
}
