//! Locale used to pick a template directory

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid locale tag: {0:?}")]
pub struct InvalidLocale(pub String);

/// A language tag such as `en`, `fr-FR`, `pt_BR` or `zh-Hant-TW`.
///
/// Only the primary language subtag matters for template lookup; it is kept
/// lowercase. A script subtag is title-cased and a region is uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl Locale {
    /// Build from a bare language code
    pub fn new(language: impl AsRef<str>) -> Result<Self, InvalidLocale> {
        language.as_ref().parse()
    }

    /// Primary language code, e.g. `en`
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            script: None,
            region: None,
        }
    }
}

impl FromStr for Locale {
    type Err = InvalidLocale;

    /// Accepts `language[-Script][-REGION]`, with `-` or `_` as separator.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidLocale(tag.to_string());
        let mut parts = tag.trim().split(['-', '_']).peekable();

        let language = parts.next().unwrap_or_default();
        let language_ok = (2..=8).contains(&language.len())
            && language.chars().all(|c| c.is_ascii_alphabetic());
        if !language_ok {
            return Err(invalid());
        }

        let script = match parts.peek() {
            Some(part) if is_script(part) => parts.next().map(title_case),
            _ => None,
        };

        let region = match parts.next() {
            Some(part) if is_region(part) => Some(part.to_ascii_uppercase()),
            Some(_) => return Err(invalid()),
            None => None,
        };

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            script,
            region,
        })
    }
}

fn is_script(part: &str) -> bool {
    part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_region(part: &str) -> bool {
    (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

fn title_case(part: &str) -> String {
    let lower = part.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => lower,
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(script) = &self.script {
            write!(f, "-{}", script)?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{}", region)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_only() {
        let locale: Locale = "en".parse().unwrap();
        assert_eq!(locale.language(), "en");
        assert!(locale.region().is_none());
    }

    #[test]
    fn test_parse_with_region() {
        let locale: Locale = "fr-FR".parse().unwrap();
        assert_eq!(locale.language(), "fr");
        assert_eq!(locale.region(), Some("FR"));

        let locale: Locale = "pt_br".parse().unwrap();
        assert_eq!(locale.language(), "pt");
        assert_eq!(locale.region(), Some("BR"));
        assert_eq!(locale.to_string(), "pt-BR");
    }

    #[test]
    fn test_language_is_lowercased() {
        let locale = Locale::new("EN").unwrap();
        assert_eq!(locale.language(), "en");
    }

    #[test]
    fn test_invalid_tags() {
        for tag in [
            "", "e", "en-", "12", "../etc", "en-../x", "en-US-x", "zh-Hant-TW-extra", "en-U1",
        ] {
            assert!(tag.parse::<Locale>().is_err(), "{tag:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_with_script_and_region() {
        let locale: Locale = "zh-Hant-TW".parse().unwrap();
        assert_eq!(locale.language(), "zh");
        assert_eq!(locale.script(), Some("Hant"));
        assert_eq!(locale.region(), Some("TW"));
        assert_eq!(locale.to_string(), "zh-Hant-TW");

        let locale: Locale = "sr_latn".parse().unwrap();
        assert_eq!(locale.script(), Some("Latn"));
        assert!(locale.region().is_none());
        assert_eq!(locale.to_string(), "sr-Latn");
    }

    #[test]
    fn test_parse_numeric_region() {
        let locale: Locale = "es-419".parse().unwrap();
        assert_eq!(locale.region(), Some("419"));
        assert_eq!(locale.to_string(), "es-419");
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(Locale::default().language(), "en");
    }
}
