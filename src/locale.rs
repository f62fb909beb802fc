//! Locale and timezone lookup helpers.
//!
//! A static table maps each supported locale code to the IANA timezone the
//! App stage derives from it. The functions take the fallback locale
//! explicitly so they stay pure and testable in isolation.

use crate::error::InitError;

/// Locale code → IANA timezone, in presentation order.
const LOCALE_TIMEZONES: &[(&str, &str)] = &[
    ("zh", "Asia/Shanghai"),
    ("zh-TW", "Asia/Taipei"),
    ("en", "UTC"),
    ("ja", "Asia/Tokyo"),
    ("ko", "Asia/Seoul"),
    ("fr", "Europe/Paris"),
    ("es", "Europe/Madrid"),
    ("it", "Europe/Rome"),
    ("de", "Europe/Berlin"),
    ("tr", "Europe/Istanbul"),
    ("ru", "Europe/Moscow"),
    ("pt", "Europe/Lisbon"),
    ("vi", "Asia/Ho_Chi_Minh"),
    ("id", "Asia/Jakarta"),
    ("th", "Asia/Bangkok"),
    ("ms", "Asia/Kuala_Lumpur"),
    ("ar", "Asia/Riyadh"),
    ("hi", "Asia/Kolkata"),
];

/// Supported locale codes, in table order.
pub fn supported_locales() -> Vec<&'static str> {
    LOCALE_TIMEZONES.iter().map(|(locale, _)| *locale).collect()
}

/// Supported application environments.
pub fn supported_environments() -> &'static [&'static str] {
    &["dev", "stag", "prod"]
}

fn lookup(locale: &str) -> Option<&'static str> {
    LOCALE_TIMEZONES
        .iter()
        .find(|(candidate, _)| *candidate == locale)
        .map(|(_, timezone)| *timezone)
}

/// Timezone for `locale`, falling back to the `fallback` locale's entry.
///
/// A miss on the fallback itself is an error, not a silent default.
pub fn timezone_for(locale: &str, fallback: &str) -> Result<&'static str, InitError> {
    lookup(locale)
        .or_else(|| lookup(fallback))
        .ok_or_else(|| InitError::LookupMiss {
            locale: fallback.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_locale_maps_to_its_timezone() {
        let expected = [
            ("zh", "Asia/Shanghai"),
            ("zh-TW", "Asia/Taipei"),
            ("en", "UTC"),
            ("ja", "Asia/Tokyo"),
            ("ko", "Asia/Seoul"),
            ("fr", "Europe/Paris"),
            ("es", "Europe/Madrid"),
            ("it", "Europe/Rome"),
            ("de", "Europe/Berlin"),
            ("tr", "Europe/Istanbul"),
            ("ru", "Europe/Moscow"),
            ("pt", "Europe/Lisbon"),
            ("vi", "Asia/Ho_Chi_Minh"),
            ("id", "Asia/Jakarta"),
            ("th", "Asia/Bangkok"),
            ("ms", "Asia/Kuala_Lumpur"),
            ("ar", "Asia/Riyadh"),
            ("hi", "Asia/Kolkata"),
        ];
        assert_eq!(expected.len(), 18);
        for (locale, timezone) in expected {
            assert_eq!(timezone_for(locale, "en").unwrap(), timezone);
        }
    }

    #[test]
    fn test_locale_order_is_stable() {
        let locales = supported_locales();
        assert_eq!(locales.len(), 18);
        assert_eq!(locales[0], "zh");
        assert_eq!(locales[2], "en");
        assert_eq!(locales[17], "hi");
    }

    #[test]
    fn test_unknown_locale_uses_fallback() {
        assert_eq!(timezone_for("xx", "en").unwrap(), "UTC");
        assert_eq!(timezone_for("xx", "ja").unwrap(), "Asia/Tokyo");
    }

    #[test]
    fn test_unknown_fallback_is_a_lookup_miss() {
        let err = timezone_for("xx", "yy").unwrap_err();
        match err {
            InitError::LookupMiss { locale } => assert_eq!(locale, "yy"),
            other => panic!("expected LookupMiss, got {other}"),
        }
    }

    #[test]
    fn test_supported_environments() {
        assert_eq!(supported_environments(), &["dev", "stag", "prod"]);
    }
}
