use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCALE: &str = "vi";

/// A `{vi, en}` JSONB value as stored on categories, products and promotions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
}

impl LocalizedText {
    pub fn new(vi: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            vi: Some(vi.into()),
            en: Some(en.into()),
        }
    }

    /// Resolve for a locale: the requested translation first, then whatever
    /// other translation is stored.
    pub fn resolve(&self, locale: &str) -> Option<&str> {
        let (requested, fallback) = match locale {
            "en" => (&self.en, &self.vi),
            _ => (&self.vi, &self.en),
        };
        requested.as_deref().or(fallback.as_deref())
    }

    /// Resolve for a locale, defaulting to an empty string when no translation
    /// exists at all.
    pub fn resolve_or_empty(&self, locale: &str) -> String {
        self.resolve(locale).unwrap_or_default().to_string()
    }

    /// Per-locale merge: keys present on `patch` replace the stored ones,
    /// absent keys are kept.
    pub fn merge(&mut self, patch: LocalizedText) {
        if patch.vi.is_some() {
            self.vi = patch.vi;
        }
        if patch.en.is_some() {
            self.en = patch.en;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vi.is_none() && self.en.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_requested_locale() {
        let text = LocalizedText::new("bếp từ", "induction cooker");
        assert_eq!(text.resolve("vi"), Some("bếp từ"));
        assert_eq!(text.resolve("en"), Some("induction cooker"));
    }

    #[test]
    fn resolve_falls_back_to_stored_translation() {
        let text = LocalizedText {
            vi: Some("vòi bếp".to_string()),
            en: None,
        };
        assert_eq!(text.resolve("en"), Some("vòi bếp"));

        let text = LocalizedText {
            vi: None,
            en: Some("kitchen faucet".to_string()),
        };
        assert_eq!(text.resolve("vi"), Some("kitchen faucet"));
    }

    #[test]
    fn unknown_locale_falls_back_to_default() {
        let text = LocalizedText::new("tủ lạnh", "refrigerator");
        assert_eq!(text.resolve("fr"), Some("tủ lạnh"));
    }

    #[test]
    fn resolve_or_empty_on_empty_map() {
        let text = LocalizedText::default();
        assert_eq!(text.resolve_or_empty("en"), "");
    }

    #[test]
    fn merge_replaces_only_present_keys() {
        let mut stored = LocalizedText::new("máy sấy", "dryer");
        stored.merge(LocalizedText {
            vi: None,
            en: Some("clothes dryer".to_string()),
        });

        assert_eq!(stored.vi.as_deref(), Some("máy sấy"));
        assert_eq!(stored.en.as_deref(), Some("clothes dryer"));
    }

    #[test]
    fn serializes_without_absent_keys() {
        let text = LocalizedText {
            vi: Some("khuyến mãi".to_string()),
            en: None,
        };
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json, serde_json::json!({ "vi": "khuyến mãi" }));
    }
}
