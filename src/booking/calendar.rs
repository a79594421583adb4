use time::{Date, error::Parse, macros::format_description};

/// Parse a `YYYY-MM-DD` calendar date as the date picker produces it.
pub fn parse_iso_date(value: &str) -> Result<Date, Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

/// The text form a picked date is stored in.
pub fn format_iso_date(date: Date) -> String {
    date.to_string()
}
