use serde::{Deserialize, Serialize};

use crate::dom::Element;

/// Normalized chars of context captured on each side of a highlight.
pub const DEFAULT_CONTEXT_LENGTH: usize = 30;

/// Shortest normalized text worth anchoring.
pub const DEFAULT_MIN_TEXT_LENGTH: usize = 5;

/// Elements that never hold readable text. Document metadata is never
/// rendered, so `head` and its contents count too.
pub const DEFAULT_SKIP_TAGS: &[&str] = &[
    "head", "title", "meta", "link", "script", "style", "noscript", "template", "textarea",
    "input", "select", "option", "button", "iframe", "object", "canvas", "svg",
];

/// Tunables for anchoring and marker injection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub context_length: usize,
    pub min_text_length: usize,
    pub marker_tag: String,
    pub marker_class: String,
    pub skip_tags: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            context_length: DEFAULT_CONTEXT_LENGTH,
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
            marker_tag: "mark".to_string(),
            marker_class: "marginalia-highlight".to_string(),
            skip_tags: DEFAULT_SKIP_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl EngineConfig {
    pub fn is_skipped_tag(&self, tag: &str) -> bool {
        self.skip_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Elements whose subtree is not searched or wrapped: hidden ones and
    /// ones that cannot hold readable text.
    pub fn excludes(&self, el: &Element) -> bool {
        el.hidden || self.is_skipped_tag(&el.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.context_length, 30);
        assert_eq!(config.min_text_length, 5);
        assert_eq!(config.marker_tag, "mark");
        assert!(config.is_skipped_tag("SCRIPT"));
        assert!(!config.is_skipped_tag("em"));
    }

    #[test]
    fn test_excludes_hidden_and_skipped_elements() {
        let config = EngineConfig::default();
        assert!(config.excludes(&Element::new("textarea")));
        assert!(config.excludes(&Element::new("p").hidden()));
        assert!(!config.excludes(&Element::new("p")));
    }

    #[test]
    fn test_document_metadata_is_skipped() {
        let config = EngineConfig::default();
        for tag in ["head", "title", "meta", "link"] {
            assert!(config.excludes(&Element::new(tag)), "{tag} should be skipped");
        }
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"context_length": 12}"#).unwrap();
        assert_eq!(config.context_length, 12);
        assert_eq!(config.min_text_length, DEFAULT_MIN_TEXT_LENGTH);
        assert_eq!(config.skip_tags.len(), DEFAULT_SKIP_TAGS.len());
    }
}
