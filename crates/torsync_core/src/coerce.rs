use chrono::{NaiveDate, NaiveDateTime};

/// Parses a decimal number whose decimal separator may differ from `.`
/// (grades arrive in a comma-decimal locale). Returns 0 for blank or
/// unparseable input.
pub fn parse_decimal(text: &str, decimal_separator: char) -> f64 {
    text.trim()
        .replace(decimal_separator, ".")
        .parse()
        .unwrap_or(0.0)
}

/// Parses the left operand of an `N / M` fraction (credit columns read
/// like "5 / 5"). Returns 0 when there is no `/` or the operand is not
/// an integer.
pub fn parse_integer_fraction(text: &str) -> u32 {
    match text.split_once('/') {
        Some((left, _)) => parse_integer(left),
        None => 0,
    }
}

/// Parses an `X / 100` percentage rating by stripping the literal
/// " / 100" suffix and reading the remainder as a dot-decimal number.
/// Returns 0 when there is no `/` or the remainder does not parse.
pub fn parse_percent_fraction(text: &str) -> f64 {
    if !text.contains('/') {
        return 0.0;
    }
    text.replace(" / 100", "").trim().parse().unwrap_or(0.0)
}

/// Parses a day-month-year date such as "12.05.2020". A trailing
/// time-of-day is accepted and stripped. Falls back to
/// [`NaiveDate::MIN`] when the text does not parse as a date.
pub fn parse_local_date(text: &str) -> NaiveDate {
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d.%m.%Y") {
        return date;
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%d.%m.%Y %H:%M") {
        return datetime.date();
    }
    NaiveDate::MIN
}

/// Parses a plain non-negative integer, 0 on failure.
pub fn parse_integer(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

/// True iff the text is the literal word "passed", ignoring
/// surrounding whitespace and case. The grade column carries this word
/// instead of a number for ungraded passes.
pub fn is_passed_text(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("passed")
}
