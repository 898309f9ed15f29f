//! # Built-in Markup Filters
//!
//! The filters the parser assembles into its default chain. Each one is a
//! small, single-purpose [`MarkupFilter`](crate::parser::MarkupFilter);
//! the parser decides which of them run and in what order.

mod autolink;
mod component_tag;
mod enclosure;
mod forced_tag_id;
mod header_section;
mod html_structure;
mod message_tag;
mod namespace_alias;
mod open_close_expander;
mod path_prefix;
mod remove_region;

pub use autolink::AutolinkHandler;
pub use component_tag::ComponentTagIdentifier;
pub use enclosure::EnclosureHandler;
pub use forced_tag_id::ForcedTagIdHandler;
pub use header_section::HeaderSectionHandler;
pub use html_structure::HtmlStructureHandler;
pub use message_tag::MessageTagHandler;
pub use namespace_alias::NamespaceAliasHandler;
pub use open_close_expander::OpenCloseExpander;
pub use path_prefix::PathPrefixHandler;
pub use remove_region::RemoveRegionHandler;

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// HTML void elements: may not have content and never get a close tag.
static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect()
});

pub(crate) fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(name)
}

/// True for values that reference another document relative to the current
/// one: not empty, not a fragment, not site-absolute, not query-only, and
/// not an absolute URL of any scheme (`http:`, `mailto:`, `data:`, …).
pub(crate) fn is_relative_reference(value: &str) -> bool {
    if value.is_empty() || value.starts_with('#') || value.starts_with('/') || value.starts_with('?')
    {
        return false;
    }
    matches!(
        url::Url::parse(value),
        Err(url::ParseError::RelativeUrlWithoutBase)
    )
}
