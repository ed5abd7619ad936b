//! Flag source descriptors
//! Static, priority-ordered list of places a flag image can come from.

use serde::Deserialize;

/// How a source is validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// HEAD request; any 2xx means the URL itself is the flag
    Head,
    /// GET request returning JSON with a `flags` asset map
    Full,
}

/// A candidate flag source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagSource {
    /// Human-readable name used in logs
    pub name: String,
    /// Lower is tried first
    pub priority: u32,
    /// URL with `{code}` (lower-case) and `{CODE}` (upper-case) placeholders
    pub url_template: String,
    pub check: CheckKind,
}

impl FlagSource {
    pub fn new(name: &str, priority: u32, url_template: &str, check: CheckKind) -> Self {
        Self {
            name: name.to_string(),
            priority,
            url_template: url_template.to_string(),
            check,
        }
    }

    /// Builds the fetchable URL for a canonical code
    pub fn url_for(&self, code: &str) -> String {
        self.url_template
            .replace("{code}", &code.to_lowercase())
            .replace("{CODE}", &code.to_uppercase())
    }
}

/// Built-in sources: CDN size variants first, then the REST API
pub fn default_sources() -> Vec<FlagSource> {
    vec![
        FlagSource::new("flagcdn-w320", 1, "https://flagcdn.com/w320/{code}.png", CheckKind::Head),
        FlagSource::new("flagcdn-w160", 2, "https://flagcdn.com/w160/{code}.png", CheckKind::Head),
        FlagSource::new("flagsapi", 3, "https://flagsapi.com/{CODE}/flat/64.png", CheckKind::Head),
        FlagSource::new(
            "restcountries",
            4,
            "https://restcountries.com/v3.1/alpha/{code}?fields=flags",
            CheckKind::Full,
        ),
    ]
}

/// Orders sources by ascending priority, keeping declaration order on ties
pub fn sort_by_priority(mut sources: Vec<FlagSource>) -> Vec<FlagSource> {
    sources.sort_by_key(|s| s.priority);
    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_placeholders() {
        let source = FlagSource::new("t", 1, "https://x/{code}/{CODE}.png", CheckKind::Head);
        assert_eq!(source.url_for("Gb"), "https://x/gb/GB.png");
    }

    #[test]
    fn test_default_sources_are_ordered() {
        let sources = default_sources();
        assert_eq!(sources.len(), 4);
        assert!(sources.windows(2).all(|w| w[0].priority < w[1].priority));
        assert_eq!(sources.last().map(|s| s.check), Some(CheckKind::Full));
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let sorted = sort_by_priority(vec![
            FlagSource::new("c", 3, "", CheckKind::Head),
            FlagSource::new("a", 1, "", CheckKind::Head),
            FlagSource::new("b", 1, "", CheckKind::Full),
        ]);
        let names: Vec<_> = sorted.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_deserialize_source() {
        let source: FlagSource = serde_json::from_str(
            r#"{"name":"cdn","priority":7,"urlTemplate":"https://cdn/{code}.png","check":"head"}"#,
        )
        .unwrap();
        assert_eq!(source.priority, 7);
        assert_eq!(source.check, CheckKind::Head);

        let snake = serde_json::from_str::<FlagSource>(
            r#"{"name":"cdn","priority":7,"url_template":"https://cdn/{code}.png","check":"head"}"#,
        );
        assert!(snake.is_err());
    }
}
