use crate::markup::{Markup, MarkupElement, MarkupError};
use serde::Serialize;
use std::fmt;

/// Stable identity of a filter, used for chain ordering and log output.
///
/// A closed set covers the built-in filters; host applications register
/// their own under [`FilterKind::Custom`] with a static name. Two custom
/// filters with the same name are the same kind as far as positioning is
/// concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FilterKind {
    ComponentTagIdentifier,
    HtmlStructure,
    RemoveRegion,
    Autolink,
    NamespaceAlias,
    MessageTag,
    HeaderSection,
    ForcedTagId,
    OpenCloseExpander,
    PathPrefix,
    Enclosure,
    Custom(&'static str),
}

impl FilterKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::ComponentTagIdentifier => "component-tag-identifier",
            FilterKind::HtmlStructure => "html-structure",
            FilterKind::RemoveRegion => "remove-region",
            FilterKind::Autolink => "autolink",
            FilterKind::NamespaceAlias => "namespace-alias",
            FilterKind::MessageTag => "message-tag",
            FilterKind::HeaderSection => "header-section",
            FilterKind::ForcedTagId => "forced-tag-id",
            FilterKind::OpenCloseExpander => "open-close-expander",
            FilterKind::PathPrefix => "path-prefix",
            FilterKind::Enclosure => "enclosure",
            FilterKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a filter decided about one element.
#[derive(Debug)]
pub enum Filtered {
    /// Pass the element (possibly rewritten in place) to the next filter.
    Keep(MarkupElement),
    /// Swallow the element; nothing reaches the filters downstream.
    Drop,
    /// Substitute the element with a sequence. Each replacement continues
    /// through the *remaining* filters, so an expansion still gets path
    /// prefixing, enclosure handling, and whatever else sits downstream.
    Replace(Vec<MarkupElement>),
}

/// One stage of the markup filter pipeline.
///
/// Filters own per-parse mutable state (open-tag stacks, region depth,
/// counters); a fresh set is constructed for every parse. The `Send` bound
/// lets an assembled chain move to whatever thread runs the parse.
pub trait MarkupFilter: Send {
    /// Identity for ordering and diagnostics.
    fn kind(&self) -> FilterKind;

    /// Inspect one element as it streams past.
    fn on_element(&mut self, element: MarkupElement) -> Result<Filtered, MarkupError>;

    /// Runs once after the whole stream has been consumed and assembled,
    /// in chain order. This is where work that needs final element
    /// positions happens — resolving forward references, synthesizing
    /// sections, reporting unclosed constructs.
    fn post_process(&mut self, _markup: &mut Markup) -> Result<(), MarkupError> {
        Ok(())
    }
}
