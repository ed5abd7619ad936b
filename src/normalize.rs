//! Country code normalization
//! Maps 3-letter ISO codes and common aliases to canonical ISO 3166-1 alpha-2.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Corrections for codes that are not canonical alpha-2 codes
static CORRECTIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // Aliases
        ("UK", "GB"),
        ("EL", "GR"),
        ("KS", "XK"),
        ("XKX", "XK"),
        // 3-letter ISO codes
        ("USA", "US"),
        ("GBR", "GB"),
        ("FRA", "FR"),
        ("DEU", "DE"),
        ("ITA", "IT"),
        ("ESP", "ES"),
        ("PRT", "PT"),
        ("NLD", "NL"),
        ("BEL", "BE"),
        ("CHE", "CH"),
        ("AUT", "AT"),
        ("SWE", "SE"),
        ("NOR", "NO"),
        ("DNK", "DK"),
        ("FIN", "FI"),
        ("ISL", "IS"),
        ("IRL", "IE"),
        ("POL", "PL"),
        ("CZE", "CZ"),
        ("HUN", "HU"),
        ("GRC", "GR"),
        ("TUR", "TR"),
        ("RUS", "RU"),
        ("UKR", "UA"),
        ("CAN", "CA"),
        ("MEX", "MX"),
        ("BRA", "BR"),
        ("ARG", "AR"),
        ("CHL", "CL"),
        ("COL", "CO"),
        ("PER", "PE"),
        ("CHN", "CN"),
        ("JPN", "JP"),
        ("KOR", "KR"),
        ("IND", "IN"),
        ("IDN", "ID"),
        ("THA", "TH"),
        ("VNM", "VN"),
        ("PHL", "PH"),
        ("MYS", "MY"),
        ("SGP", "SG"),
        ("TWN", "TW"),
        ("HKG", "HK"),
        ("AUS", "AU"),
        ("NZL", "NZ"),
        ("ZAF", "ZA"),
        ("EGY", "EG"),
        ("MAR", "MA"),
        ("NGA", "NG"),
        ("KEN", "KE"),
        ("ISR", "IL"),
        ("SAU", "SA"),
        ("ARE", "AE"),
    ])
});

/// Returns the canonical alpha-2 code, or `None` for missing/empty input.
pub fn normalize(code: Option<&str>) -> Option<String> {
    let code = code?;
    if code.is_empty() {
        return None;
    }

    let upper = code.to_uppercase();
    match CORRECTIONS.get(upper.as_str()) {
        Some(mapped) => Some((*mapped).to_string()),
        None => Some(upper),
    }
}

/// Shorthand for [`normalize`] on a present string
pub fn normalize_code(code: &str) -> Option<String> {
    normalize(Some(code))
}
