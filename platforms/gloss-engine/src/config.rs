use serde::{Deserialize, Serialize};

/// Knobs for one [`crate::Translator`]. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Gloss notation to resolve into (ISO 639-1).
    pub target_language: String,
    /// Memoize dictionary lookups for the duration of a request.
    pub cache_lookups: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            target_language: "en".to_string(),
            cache_lookups: true,
        }
    }
}

impl TranslatorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = language.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        assert_eq!(TranslatorConfig::from_json("{}").unwrap(), TranslatorConfig::default());

        let config = TranslatorConfig::from_json(r#"{"cache_lookups": false}"#).unwrap();
        assert_eq!(config.target_language, "en");
        assert!(!config.cache_lookups);
    }

    #[test]
    fn test_language_override() {
        let config = TranslatorConfig::from_json(r#"{"target_language": "th"}"#)
            .unwrap()
            .with_language("en");
        assert_eq!(config.target_language, "en");
        assert!(TranslatorConfig::from_json(r#"{"target_language": 3}"#).is_err());
    }
}
