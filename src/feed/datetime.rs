use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

/// Display locale for feed timestamps. Only the weekday/month name tables
/// differ; the instant is always rendered in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Unknown tags fall back to English, the feed's default locale.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "es" => Locale::Es,
            _ => Locale::En,
        }
    }
}

const WEEKDAYS_EN: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const WEEKDAYS_ES: [&str; 7] = ["dom", "lun", "mar", "mié", "jue", "vie", "sáb"];
const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Parse an ISO-8601-like timestamp into an absolute instant.
///
/// Accepted shapes: `YYYY-MM-DD` (midnight UTC), `YYYY-MM-DD HH:MM:SS` or
/// `YYYY-MM-DDTHH:MM:SS`, the latter two optionally suffixed with `Z` or a
/// signed `HH:MM` offset. The offset is the input's local offset, so the
/// UTC instant is the naive fields minus the offset. Anything malformed
/// yields `None`; callers fall through to their next timestamp source.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() || !s.is_ascii() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    let (body, offset_seconds) = split_offset(s)?;
    let naive = NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(body, "%Y-%m-%d %H:%M:%S"))
        .ok()?;

    Some(Utc.from_utc_datetime(&naive) - Duration::seconds(offset_seconds))
}

/// Split a trailing `Z` or `±HH:MM` suffix off a timestamp string, returning
/// the remaining body and the offset in seconds (positive east of UTC).
fn split_offset(s: &str) -> Option<(&str, i64)> {
    if let Some(body) = s.strip_suffix('Z') {
        return Some((body, 0));
    }
    if s.len() > 6 {
        let (body, tail) = s.split_at(s.len() - 6);
        let bytes = tail.as_bytes();
        if (bytes[0] == b'+' || bytes[0] == b'-') && bytes[3] == b':' {
            let hours: i64 = tail[1..3].parse().ok()?;
            let minutes: i64 = tail[4..6].parse().ok()?;
            let sign = if bytes[0] == b'-' { -1 } else { 1 };
            return Some((body, sign * (hours * 3600 + minutes * 60)));
        }
    }
    Some((s, 0))
}

/// Render an instant as an RFC 2822 date string, always in GMT.
pub fn format_rfc2822(instant: DateTime<Utc>, locale: Locale) -> String {
    let (weekdays, months) = match locale {
        Locale::En => (&WEEKDAYS_EN, &MONTHS_EN),
        Locale::Es => (&WEEKDAYS_ES, &MONTHS_ES),
    };

    let weekday = weekdays[instant.weekday().num_days_from_sunday() as usize];
    let month = months[instant.month0() as usize];

    format!(
        "{}, {:02} {} {} {:02}:{:02}:{:02} GMT",
        weekday,
        instant.day(),
        month,
        instant.year(),
        instant.hour(),
        instant.minute(),
        instant.second(),
    )
}
