use crate::markup::{Markup, MarkupElement, MarkupError};
use crate::parser::filter::{FilterKind, Filtered, MarkupFilter};
use std::sync::Arc;
use tracing::debug;

/// Decides whether a filter may join a chain: `true` admits the filter,
/// `false` vetoes it. Vetoed filters are skipped without error, so a gate
/// can thin out the pipeline for markup that does not need every stage.
pub type FilterGate = Arc<dyn Fn(&dyn MarkupFilter) -> bool + Send + Sync>;

/// An ordered pipeline of [`MarkupFilter`]s.
///
/// Order is position-based, not priority-based: filters land where the
/// insertion call puts them, and the chain never reorders itself. External
/// additions default to "just before path prefixing" — late enough to see
/// identified component tags, early enough that path rewriting and
/// enclosure resolution still see their output.
pub struct FilterChain {
    filters: Vec<Box<dyn MarkupFilter>>,
    gate: Option<FilterGate>,
}

impl FilterChain {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            gate: None,
        }
    }

    /// A chain whose additions are subject to an admission gate. The gate
    /// applies to every insertion path, including the parser's own
    /// skeleton assembly.
    #[must_use]
    pub fn with_gate(gate: FilterGate) -> Self {
        Self {
            filters: Vec::new(),
            gate: Some(gate),
        }
    }

    /// Add a filter at the default position: just before the path-prefix
    /// stage, or at the tail when no such stage is present. Returns `false`
    /// when the gate vetoed the filter.
    pub fn append(&mut self, filter: Box<dyn MarkupFilter>) -> bool {
        self.insert_before(filter, FilterKind::PathPrefix)
    }

    /// Add a filter immediately before the first filter of the given kind,
    /// or at the tail when the kind is absent. Returns `false` when the
    /// gate vetoed the filter.
    pub fn insert_before(&mut self, filter: Box<dyn MarkupFilter>, marker: FilterKind) -> bool {
        if !self.admit(filter.as_ref()) {
            return false;
        }
        let kind = filter.kind();
        match self.position(marker) {
            Some(index) => {
                debug!(filter = %kind, before = %marker, index, "Filter inserted");
                self.filters.insert(index, filter);
            }
            None => {
                debug!(filter = %kind, "Filter appended at tail (no marker present)");
                self.filters.push(filter);
            }
        }
        true
    }

    /// Push straight onto the tail, bypassing marker lookup. The skeleton
    /// assembly sequences the built-in filters this way; the gate still
    /// applies. Returns `false` when the gate vetoed the filter.
    pub(crate) fn push_tail(&mut self, filter: Box<dyn MarkupFilter>) -> bool {
        if !self.admit(filter.as_ref()) {
            return false;
        }
        self.filters.push(filter);
        true
    }

    fn admit(&self, filter: &dyn MarkupFilter) -> bool {
        match &self.gate {
            Some(gate) if !gate(filter) => {
                debug!(filter = %filter.kind(), "Filter vetoed by gate");
                false
            }
            _ => true,
        }
    }

    /// Index of the first filter of the given kind.
    #[must_use]
    pub fn position(&self, kind: FilterKind) -> Option<usize> {
        self.filters.iter().position(|f| f.kind() == kind)
    }

    #[must_use]
    pub fn contains(&self, kind: FilterKind) -> bool {
        self.position(kind).is_some()
    }

    /// Filter kinds in chain order.
    #[must_use]
    pub fn kinds(&self) -> Vec<FilterKind> {
        self.filters.iter().map(|f| f.kind()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run one element through the pipeline. Replacements re-enter at the
    /// filter *after* the one that produced them; dropped elements produce
    /// nothing.
    pub(crate) fn apply(
        &mut self,
        element: MarkupElement,
    ) -> Result<Vec<MarkupElement>, MarkupError> {
        let mut out = Vec::with_capacity(1);
        self.feed(0, element, &mut out)?;
        Ok(out)
    }

    fn feed(
        &mut self,
        start: usize,
        element: MarkupElement,
        out: &mut Vec<MarkupElement>,
    ) -> Result<(), MarkupError> {
        let mut current = element;
        let mut index = start;
        while index < self.filters.len() {
            match self.filters[index].on_element(current)? {
                Filtered::Keep(next) => {
                    current = next;
                    index += 1;
                }
                Filtered::Drop => return Ok(()),
                Filtered::Replace(items) => {
                    for item in items {
                        self.feed(index + 1, item, out)?;
                    }
                    return Ok(());
                }
            }
        }
        out.push(current);
        Ok(())
    }

    /// Run every filter's post-processing pass, in chain order.
    pub(crate) fn post_process(&mut self, markup: &mut Markup) -> Result<(), MarkupError> {
        for filter in &mut self.filters {
            filter.post_process(markup)?;
        }
        Ok(())
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.kinds())
            .field("gated", &self.gate.is_some())
            .finish()
    }
}
