//! Calendar date parsing and formatting shared by forms, decoders and views.

use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

/// The `YYYY-MM-DD` format used by date inputs and stored records.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a date typed into a date input, e.g. "2024-01-05".
///
/// Surrounding whitespace is ignored. Returns `None` if the text is not a
/// valid calendar date.
pub fn parse_date(text: &str) -> Option<Date> {
    Date::parse(text.trim(), DATE_FORMAT).ok()
}

/// Parse a stored date, ignoring any time of day.
///
/// Accepts bare dates ("2024-01-05") and timestamps whose first ten
/// characters are a date ("2024-01-05T10:30:00Z", "2024-01-05 10:30").
pub fn parse_stored_date(text: &str) -> Option<Date> {
    let text = text.trim();

    if let Some(date) = parse_date(text) {
        return Some(date);
    }

    match (text.get(..10), text.get(10..11)) {
        (Some(date_part), Some("T" | "t" | " ")) => parse_date(date_part),
        _ => None,
    }
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// The three-letter English abbreviation for `month`, e.g. "Jan".
pub fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use super::{format_date, month_abbrev, parse_date, parse_stored_date};

    #[test]
    fn parses_bare_date() {
        assert_eq!(parse_date("2024-01-05"), Some(date!(2024 - 01 - 05)));
        assert_eq!(parse_date(" 2024-12-31 "), Some(date!(2024 - 12 - 31)));
    }

    #[test]
    fn rejects_invalid_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("05/01/2024"), None);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn stored_timestamps_ignore_time_of_day() {
        assert_eq!(
            parse_stored_date("2024-01-05T23:59:59Z"),
            Some(date!(2024 - 01 - 05))
        );
        assert_eq!(
            parse_stored_date("2024-01-05 08:00"),
            Some(date!(2024 - 01 - 05))
        );
        assert_eq!(parse_stored_date("2024-01-05X"), None);
        assert_eq!(parse_stored_date("Jan 5 2024"), None);
    }

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_date(date!(2024 - 01 - 05)), "2024-01-05");
        assert_eq!(format_date(date!(0987 - 11 - 30)), "0987-11-30");
    }

    #[test]
    fn month_abbreviations() {
        assert_eq!(month_abbrev(Month::January), "Jan");
        assert_eq!(month_abbrev(Month::September), "Sep");
        assert_eq!(month_abbrev(Month::December), "Dec");
    }
}
