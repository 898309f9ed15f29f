use crate::markup::{MarkupElement, MarkupError, TagKind};
use crate::parser::filters::is_relative_reference;
use crate::parser::{FilterKind, Filtered, MarkupFilter};
use smallvec::SmallVec;

/// Attributes whose values reference other documents.
const PATH_ATTRIBUTES: &[&str] = &["href", "src", "background", "action"];

/// Marks tags whose path attributes hold relative references.
///
/// Templates are written relative to their own location, but a page can be
/// mounted anywhere, so `src="img/logo.png"` needs a context prefix at
/// render time. The actual rewriting is the renderer's business — it knows
/// the mount point; this filter just records which attributes need it, on
/// the tag, where the renderer will look.
///
/// This filter doubles as the default insertion marker for the chain:
/// externally added filters land right before it unless they ask for
/// another position.
pub struct PathPrefixHandler;

impl PathPrefixHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PathPrefixHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupFilter for PathPrefixHandler {
    fn kind(&self) -> FilterKind {
        FilterKind::PathPrefix
    }

    fn on_element(&mut self, mut element: MarkupElement) -> Result<Filtered, MarkupError> {
        let Some(tag) = element.as_tag_mut() else {
            return Ok(Filtered::Keep(element));
        };
        if tag.kind == TagKind::Close || tag.namespace.is_some() {
            return Ok(Filtered::Keep(element));
        }
        let relative: SmallVec<[&str; 2]> = PATH_ATTRIBUTES
            .iter()
            .copied()
            .filter(|attr| {
                tag.get_attribute(attr)
                    .is_some_and(is_relative_reference)
            })
            .collect();
        for attr in relative {
            tag.mark_relative_path(attr);
        }
        Ok(Filtered::Keep(element))
    }
}
