//! String `format` checks
//!
//! Each check is independent of the length/pattern constraints on the same
//! node. Unknown formats never reach this module; the compiler drops them.

use crate::validation::schema::StringFormat;
use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;
use url::Url;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
        )
        .expect("email pattern is valid")
    })
}

fn uuid_regex() -> &'static Regex {
    static UUID_REGEX: OnceLock<Regex> = OnceLock::new();
    UUID_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("uuid pattern is valid")
    })
}

fn date_regex() -> &'static Regex {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    DATE_REGEX.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid")
    })
}

fn date_time_regex() -> &'static Regex {
    static DATE_TIME_REGEX: OnceLock<Regex> = OnceLock::new();
    DATE_TIME_REGEX.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}[Tt]\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2})$")
            .expect("date-time pattern is valid")
    })
}

fn time_regex() -> &'static Regex {
    static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
    TIME_REGEX.get_or_init(|| {
        Regex::new(r"^([01]\d|2[0-3]):[0-5]\d:[0-5]\d(\.\d+)?$")
            .expect("time pattern is valid")
    })
}

fn ipv4_regex() -> &'static Regex {
    static IPV4_REGEX: OnceLock<Regex> = OnceLock::new();
    IPV4_REGEX.get_or_init(|| {
        Regex::new(r"^((25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)$")
            .expect("ipv4 pattern is valid")
    })
}

/// Whether `value` satisfies `format`
///
/// `StringFormat::Other` always passes.
pub fn matches_format(format: &StringFormat, value: &str) -> bool {
    match format {
        StringFormat::Email => is_email(value),
        StringFormat::Url => is_url(value),
        StringFormat::Uuid => uuid_regex().is_match(value),
        StringFormat::DateTime => is_date_time(value),
        StringFormat::Date => is_date(value),
        StringFormat::Time => is_time(value),
        StringFormat::Ipv4 => is_ipv4(value),
        StringFormat::Ipv6 => is_ipv6(value),
        StringFormat::Ip => is_ipv4(value) || is_ipv6(value),
        StringFormat::Other(_) => true,
    }
}

fn is_email(value: &str) -> bool {
    let local = value.split('@').next().unwrap_or_default();
    email_regex().is_match(value) && !local.starts_with('.') && !value.contains("..")
}

// scheme plus authority
fn is_url(value: &str) -> bool {
    Url::parse(value).map(|url| url.has_host()).unwrap_or(false)
}

// RFC 3339 with a `T` separator and a `Z` or numeric offset; chrono alone
// also takes a space between date and time
fn is_date_time(value: &str) -> bool {
    date_time_regex().is_match(value) && DateTime::parse_from_rfc3339(value).is_ok()
}

fn is_date(value: &str) -> bool {
    date_regex().is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn is_time(value: &str) -> bool {
    time_regex().is_match(value) && NaiveTime::parse_from_str(value, "%H:%M:%S%.f").is_ok()
}

fn is_ipv4(value: &str) -> bool {
    ipv4_regex().is_match(value) && value.parse::<Ipv4Addr>().is_ok()
}

fn is_ipv6(value: &str) -> bool {
    value.contains(':') && value.parse::<Ipv6Addr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("user@example.com", true)]
    #[case("test.user+tag@domain.co.uk", true)]
    #[case("invalid-email", false)]
    #[case("missing@domain", false)]
    #[case(".leading@example.com", false)]
    #[case("double..dot@example.com", false)]
    fn test_email(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(matches_format(&StringFormat::Email, value), expected);
    }

    #[rstest]
    #[case("https://example.com", true)]
    #[case("http://localhost:8080/path", true)]
    #[case("not-a-url", false)]
    #[case("mailto:user@example.com", false)]
    fn test_url(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(matches_format(&StringFormat::Url, value), expected);
    }

    #[rstest]
    #[case("2025-12-06T10:30:00Z", true)]
    #[case("2025-12-06T10:30:00.123Z", true)]
    #[case("2025-12-06T10:30:00+02:00", true)]
    #[case("2025-12-06T10:30:00", false)]
    #[case("2025-12-06 10:30:00Z", false)]
    #[case("2025-12-06_10:30:00Z", false)]
    #[case("2025-12-06", false)]
    fn test_date_time(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(matches_format(&StringFormat::DateTime, value), expected);
    }

    #[rstest]
    #[case("2025-12-06", true)]
    #[case("2025-02-30", false)]
    #[case("2025-1-6", false)]
    #[case("12/06/2025", false)]
    fn test_date(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(matches_format(&StringFormat::Date, value), expected);
    }

    #[rstest]
    #[case("00:00:00", true)]
    #[case("23:59:59", true)]
    #[case("10:30:00.250", true)]
    #[case("24:00:00", false)]
    #[case("10:30", false)]
    #[case("2025-12-06T10:30:00Z", false)]
    fn test_time(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(matches_format(&StringFormat::Time, value), expected);
    }

    #[rstest]
    #[case("192.168.1.1", true)]
    #[case("0.0.0.0", true)]
    #[case("256.1.1.1", false)]
    #[case("01.2.3.4", false)]
    #[case("1.2.3", false)]
    fn test_ipv4(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(matches_format(&StringFormat::Ipv4, value), expected);
    }

    #[rstest]
    #[case("2001:0db8:85a3:0000:0000:8a2e:0370:7334", true)]
    #[case("::1", true)]
    #[case("fe80::", true)]
    #[case("192.168.1.1", false)]
    #[case("2001:db8::85a3::1", false)]
    fn test_ipv6(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(matches_format(&StringFormat::Ipv6, value), expected);
    }

    #[test]
    fn test_ip_accepts_both_families() {
        assert!(matches_format(&StringFormat::Ip, "10.0.0.1"));
        assert!(matches_format(&StringFormat::Ip, "::1"));
        assert!(!matches_format(&StringFormat::Ip, "not-an-ip"));
    }

    #[test]
    fn test_uuid_requires_canonical_grouping() {
        assert!(matches_format(
            &StringFormat::Uuid,
            "123e4567-e89b-12d3-a456-426614174000"
        ));
        assert!(!matches_format(
            &StringFormat::Uuid,
            "123e4567-e89b-12d3-a456"
        ));
        assert!(!matches_format(
            &StringFormat::Uuid,
            "123e4567e89b12d3a456426614174000"
        ));
    }

    #[test]
    fn test_unknown_format_always_passes() {
        let format = StringFormat::Other("custom-unknown-format".to_string());
        assert!(matches_format(&format, "anything"));
    }
}
