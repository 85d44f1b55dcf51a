use crate::anchor::AnchorRecord;
use crate::anchoring::{
    after_context, before_context, disambiguate, locate::locate_in, trim_whitespace,
};
use crate::config::EngineConfig;
use crate::dom::{ActivateHandler, Document, NodeId, TextRange};
use crate::error::AnchorError;
use crate::highlight::{self, Highlight, HighlightId, MarkerFactory, StyledMarker};
use crate::text::normalize;

/// Outcome of resolving one record during [`Engine::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Position of the record in the input slice
    pub index: usize,
    /// `None` when the record could not be placed and was dropped
    pub highlight: Option<Highlight>,
}

impl Reconciled {
    pub fn is_resolved(&self) -> bool {
        self.highlight.is_some()
    }
}

/// Anchoring and highlighting with one set of settings.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Find the range under `root` that best matches `text` given the context
    /// it was captured with.
    ///
    /// `Ok(None)` means no acceptable match: the text is shorter than the
    /// configured minimum, does not occur, or trims away to nothing. Only
    /// text that normalizes to nothing is an error. The tree is not touched.
    pub fn find_range(
        &self,
        doc: &Document,
        root: NodeId,
        text: &str,
        before: &str,
        after: &str,
    ) -> Result<Option<TextRange>, AnchorError> {
        let needle = normalize(text);
        if needle.is_empty() {
            return Err(AnchorError::EmptyText);
        }
        if needle.chars().count() < self.config.min_text_length {
            log::debug!("{text:?} is too short to anchor");
            return Ok(None);
        }

        let leaves = doc.content_text_nodes(root, |el| self.config.excludes(el));
        let candidates = locate_in(doc, &leaves, &needle);
        let Some(best) = disambiguate(
            doc,
            &leaves,
            candidates,
            &normalize(before),
            &normalize(after),
            self.config.context_length,
        ) else {
            log::debug!("no match for {text:?}");
            return Ok(None);
        };

        let range = trim_whitespace(doc, &leaves, best);
        if range.is_collapsed() {
            return Ok(None);
        }
        Ok(Some(range))
    }

    /// [`find_range`](Self::find_range) for a stored record.
    pub fn resolve(
        &self,
        doc: &Document,
        root: NodeId,
        record: &AnchorRecord,
    ) -> Result<Option<TextRange>, AnchorError> {
        self.find_range(doc, root, record.text(), record.before(), record.after())
    }

    /// Wrap `range` in styled markers sharing a fresh [`HighlightId`].
    ///
    /// A collapsed or reversed range yields a highlight with no markers.
    pub fn inject_highlight(
        &self,
        doc: &mut Document,
        range: TextRange,
        on_activate: Option<ActivateHandler>,
    ) -> Highlight {
        let id = HighlightId::new();
        let factory = StyledMarker::new(&self.config, id);
        let markers = self.inject_with(doc, range, &factory, on_activate.as_ref());
        Highlight { id, markers }
    }

    /// Wrap `range` using markers from a caller-supplied factory.
    pub fn inject_with(
        &self,
        doc: &mut Document,
        range: TextRange,
        factory: &dyn MarkerFactory,
        on_activate: Option<&ActivateHandler>,
    ) -> Vec<NodeId> {
        highlight::inject(doc, range, factory, on_activate, &self.config)
    }

    /// Undo one marker. Safe to call on a marker that is already gone.
    pub fn remove_highlight(&self, doc: &mut Document, marker: NodeId) {
        highlight::remove(doc, marker);
    }

    /// Undo every highlight marker under `root`.
    pub fn remove_all_highlights(&self, doc: &mut Document, root: NodeId) -> usize {
        highlight::remove_all(doc, root)
    }

    pub fn before_context(&self, doc: &Document, root: NodeId, range: TextRange) -> String {
        before_context(doc, root, range, self.config.context_length, &self.config)
    }

    pub fn after_context(&self, doc: &Document, root: NodeId, range: TextRange) -> String {
        after_context(doc, root, range, self.config.context_length, &self.config)
    }

    /// Build a record for a live range so it can be found again later.
    pub fn capture(
        &self,
        doc: &Document,
        root: NodeId,
        range: TextRange,
    ) -> Result<AnchorRecord, AnchorError> {
        AnchorRecord::capture(doc, root, range, &self.config)
    }

    /// Resolve and highlight each record in turn.
    ///
    /// Records that fail to resolve are dropped, never fatal; the result
    /// has one entry per record, in input order.
    pub fn reconcile(
        &self,
        doc: &mut Document,
        root: NodeId,
        records: &[AnchorRecord],
        on_activate: Option<ActivateHandler>,
    ) -> Vec<Reconciled> {
        let results: Vec<Reconciled> = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let highlight = match self.resolve(doc, root, record) {
                    Ok(Some(range)) => Some(self.inject_highlight(doc, range, on_activate.clone())),
                    Ok(None) => {
                        log::debug!("record {index} did not resolve");
                        None
                    }
                    Err(err) => {
                        log::warn!("dropping record {index}: {err}");
                        None
                    }
                };
                Reconciled { index, highlight }
            })
            .collect();

        let placed = results.iter().filter(|r| r.is_resolved()).count();
        log::debug!("reconciled {placed} of {} record(s)", records.len());
        results
    }
}
