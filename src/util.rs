// Utility helpers for parsing and basic statistics.
//
// Every date and number the dataset carries goes through here so the
// aggregators agree on what "the year of a project" or "its investment" is.
use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Parse a `DD-MM-YYYY` date.
///
/// Anything else, including calendar dates that do not exist such as
/// `31-02-2020`, yields `None`.
pub fn parse_local_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%d-%m-%Y").ok()
}

/// Calendar year of a `DD-MM-YYYY` date.
pub fn year_of(s: &str) -> Option<i32> {
    parse_local_date(s).map(|d| d.year())
}

/// Whole days between two `DD-MM-YYYY` dates, order-insensitive.
///
/// Returns `None` when either side is empty or not a valid date.
pub fn days_between(a: &str, b: &str) -> Option<i64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let a = parse_local_date(a)?;
    let b = parse_local_date(b)?;
    // Both sides sit at midnight, so the difference is already a whole
    // number of days and rounding up is a no-op.
    Some((b - a).num_days().abs())
}

/// Parse an amount written with `.` as thousands separator and `,` as the
/// decimal point, e.g. `1.234.567,89`.
///
/// Like a lenient float parser, trailing garbage after a numeric prefix is
/// ignored. Returns `None` when no finite number can be read.
pub fn parse_locale_decimal(s: &str) -> Option<f64> {
    let cleaned = s.replace('.', "").replace(',', ".");
    leading_float(&cleaned).filter(|v| v.is_finite())
}

/// Longest prefix of `s` that reads as a float: optional sign, digits with
/// at most one `.`, then an optional exponent. Scanned once.
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| bytes[start.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_from(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_from(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }
    s[..end].parse::<f64>().ok()
}

/// Whole-peso currency string, e.g. `$1.234.568`. Display only.
pub fn format_currency(n: f64) -> String {
    if !n.is_finite() {
        return "$0".to_string();
    }
    let rounded = n.round() as i64;
    let digits = rounded.unsigned_abs().to_formatted_string(&Locale::es_CL);
    if rounded < 0 {
        format!("-${}", digits)
    } else {
        format!("${}", digits)
    }
}

/// `part / total * 100` with two decimals, `"0.00"` when `total` is zero.
pub fn rate_label(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", part as f64 / total as f64 * 100.0)
}

/// Numeric form of [`rate_label`], already rounded to two decimals.
pub fn rate_value(part: usize, total: usize) -> f64 {
    rate_label(part, total).parse().unwrap_or(0.0)
}

/// Rounded mean of a day total, `0` for an empty bucket.
pub fn rounded_average(total: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as i64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_local_date_valid() {
        let d = parse_local_date("05-03-2021").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2021, 3, 5).unwrap());
    }

    #[test]
    fn test_parse_local_date_rejects_bad_input() {
        assert!(parse_local_date("31-02-2020").is_none());
        assert!(parse_local_date("2020-01-01-01").is_none());
        assert!(parse_local_date("01/01/2020").is_none());
        assert!(parse_local_date("").is_none());
        assert!(parse_local_date("aa-bb-cccc").is_none());
        assert!(parse_local_date("01-13-2020").is_none());
        assert!(parse_local_date("01-01-2020-extra").is_none());
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of("15-08-2019"), Some(2019));
        assert_eq!(year_of("not a date"), None);
    }

    #[test]
    fn test_days_between_basic() {
        assert_eq!(days_between("01-01-2020", "11-01-2020"), Some(10));
        assert_eq!(days_between("11-01-2020", "01-01-2020"), Some(10));
        // 2020 is a leap year.
        assert_eq!(days_between("01-02-2020", "01-03-2020"), Some(29));
    }

    #[test]
    fn test_days_between_invalid() {
        assert_eq!(days_between("", "01-01-2020"), None);
        assert_eq!(days_between("01-01-2020", ""), None);
        assert_eq!(days_between("31-02-2020", "01-01-2020"), None);
    }

    #[test]
    fn test_parse_locale_decimal() {
        assert_eq!(parse_locale_decimal("1.234.567,89"), Some(1234567.89));
        assert_eq!(parse_locale_decimal("1.000,00"), Some(1000.0));
        assert_eq!(parse_locale_decimal("2.000,50"), Some(2000.5));
        assert_eq!(parse_locale_decimal("12"), Some(12.0));
        assert_eq!(parse_locale_decimal("  3,5 MMU$"), Some(3.5));
    }

    #[test]
    fn test_parse_locale_decimal_stops_at_second_point() {
        // "1,2,3,4" cleans to "1.2.3.4"; only the first point is a decimal point.
        assert_eq!(parse_locale_decimal("1,2,3,4"), Some(1.2));
        assert_eq!(parse_locale_decimal("5,"), Some(5.0));
        assert_eq!(parse_locale_decimal(",5"), Some(0.5));
        assert_eq!(parse_locale_decimal("-1.250,5"), Some(-1250.5));
        assert_eq!(parse_locale_decimal("2,5e3 CLP"), Some(2500.0));
        assert_eq!(parse_locale_decimal("7e"), Some(7.0));
    }

    #[test]
    fn test_parse_locale_decimal_long_separator_run() {
        let input = vec!["1"; 50_000].join(",");
        assert_eq!(parse_locale_decimal(&input), Some(1.1));
    }

    #[test]
    fn test_parse_locale_decimal_rejects_garbage() {
        assert_eq!(parse_locale_decimal("abc"), None);
        assert_eq!(parse_locale_decimal(""), None);
        assert_eq!(parse_locale_decimal("inf"), None);
        assert_eq!(parse_locale_decimal("-"), None);
        assert_eq!(parse_locale_decimal(","), None);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234567.6), "$1.234.568");
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(-1500.0), "-$1.500");
    }

    #[test]
    fn test_rates() {
        assert_eq!(rate_label(2, 3), "66.67");
        assert_eq!(rate_label(0, 0), "0.00");
        assert_eq!(rate_value(1, 3), 33.33);
        assert_eq!(rate_value(5, 0), 0.0);
    }

    #[test]
    fn test_rounded_average() {
        assert_eq!(rounded_average(25, 2), 13);
        assert_eq!(rounded_average(10, 0), 0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 1), "-42.0");
        assert_eq!(format_number(0.0, 0), "0");
    }

    fn valid_date() -> impl Strategy<Value = String> {
        (1u32..=28, 1u32..=12, 1990i32..=2030)
            .prop_map(|(d, m, y)| format!("{:02}-{:02}-{}", d, m, y))
    }

    proptest! {
        #[test]
        fn days_between_same_date_is_zero(d in valid_date()) {
            prop_assert_eq!(days_between(&d, &d), Some(0));
        }

        #[test]
        fn days_between_is_symmetric(a in valid_date(), b in valid_date()) {
            prop_assert_eq!(days_between(&a, &b), days_between(&b, &a));
        }
    }
}
