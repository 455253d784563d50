use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC time as `2026-02-01T09:30:00.000Z`.
///
/// Fixed width, so lexical order equals chronological order.
pub fn now_iso() -> String {
    to_iso(Utc::now())
}

pub fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Today's date as `YYYY-MM-DD`
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// en-US short date (`2/1/2026`). Unparseable input is returned unchanged.
pub fn locale_date(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(at) => at.with_timezone(&Utc).format("%-m/%-d/%Y").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_is_millis_with_z() {
        let at = DateTime::parse_from_rfc3339("2026-02-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(to_iso(at), "2026-02-01T09:30:00.000Z");
    }

    #[test]
    fn locale_date_is_unpadded() {
        assert_eq!(locale_date("2026-02-01T09:30:00.000Z"), "2/1/2026");
        assert_eq!(locale_date("garbage"), "garbage");
    }
}
