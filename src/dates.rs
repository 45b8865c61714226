use chrono::{NaiveDate, NaiveDateTime};

fn parse_date(value: &str) -> Option<NaiveDate> {
    // Timestamps such as `created_at` carry a time part after the date.
    let date_part = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `2025-03-07` → `07 March 2025`. Empty for missing or unparseable input.
pub fn format_date_uk(value: Option<&str>) -> String {
    value
        .and_then(parse_date)
        .map(|d| d.format("%d %B %Y").to_string())
        .unwrap_or_default()
}

/// `2025-03-07` → `07/03/2025`.
pub fn format_date_short(value: Option<&str>) -> String {
    value
        .and_then(parse_date)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

/// `YYYYMMDD`, used in output file names.
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Footer "generated at" stamp, e.g. `07/03/2025, 14:05:09`.
pub fn generated_stamp(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
