use crate::config::EngineConfig;
use crate::dom::{Document, Element, NodeId};

use super::HighlightId;

/// Attribute carrying the owning highlight's id on every marker.
pub const HIGHLIGHT_ID_ATTR: &str = "data-highlight-id";

/// Creates one detached marker element per wrapped leaf.
pub trait MarkerFactory {
    fn create(&self, doc: &mut Document) -> NodeId;
}

impl<F> MarkerFactory for F
where
    F: Fn(&mut Document) -> NodeId,
{
    fn create(&self, doc: &mut Document) -> NodeId {
        self(doc)
    }
}

/// The default marker: configured tag and class, tagged with the highlight id.
#[derive(Debug, Clone)]
pub struct StyledMarker {
    tag: String,
    class: String,
    highlight: HighlightId,
}

impl StyledMarker {
    pub fn new(config: &EngineConfig, highlight: HighlightId) -> Self {
        Self {
            tag: config.marker_tag.clone(),
            class: config.marker_class.clone(),
            highlight,
        }
    }
}

impl MarkerFactory for StyledMarker {
    fn create(&self, doc: &mut Document) -> NodeId {
        doc.create_element(
            Element::new(&self.tag)
                .with_attr("class", &self.class)
                .with_attr(HIGHLIGHT_ID_ATTR, self.highlight.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styled_marker_carries_tag_class_and_id() {
        let mut doc = Document::new("body");
        let id = HighlightId::new();
        let factory = StyledMarker::new(&EngineConfig::default(), id);

        let marker = factory.create(&mut doc);

        let el = doc.element(marker).unwrap();
        assert_eq!(el.tag, "mark");
        assert_eq!(el.attr("class"), Some("marginalia-highlight"));
        assert_eq!(el.attr(HIGHLIGHT_ID_ATTR), Some(id.to_string().as_str()));
        assert_eq!(doc.parent(marker), None);
    }

    #[test]
    fn test_closures_are_factories() {
        let mut doc = Document::new("body");
        let factory = |doc: &mut Document| doc.create_element(Element::new("u"));
        let marker = factory.create(&mut doc);
        assert_eq!(doc.element(marker).unwrap().tag, "u");
    }
}
