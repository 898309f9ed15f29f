use crate::markup::{
    is_open_tag, ComponentTag, HeaderHandle, Markup, MarkupElement, MarkupError, TagKind,
};
use crate::parser::{FilterKind, Filtered, MarkupFilter};
use std::sync::PoisonError;
use tracing::debug;

/// Component id given to the document's header section.
pub const HEADER_ID: &str = "_header_";

/// Locates — or fabricates — the page's `<head>` section and marks it as a
/// component, so components lower in the hierarchy have somewhere to
/// contribute stylesheets and scripts.
///
/// The filter is constructed around a [`HeaderHandle`] shared with the
/// markup under construction: the chain is assembled before the `Markup`
/// exists, and the header's final position is only known after every other
/// filter has had its say. The handle is how the two meet.
///
/// Only page markup gets this filter. Panels and borders render inside
/// someone else's document and have no `<head>` of their own.
pub struct HeaderSectionHandler {
    header: HeaderHandle,
    head_seen: bool,
}

impl HeaderSectionHandler {
    #[must_use]
    pub fn new(header: HeaderHandle) -> Self {
        Self {
            header,
            head_seen: false,
        }
    }
}

impl MarkupFilter for HeaderSectionHandler {
    fn kind(&self) -> FilterKind {
        FilterKind::HeaderSection
    }

    fn on_element(&mut self, mut element: MarkupElement) -> Result<Filtered, MarkupError> {
        if let Some(tag) = element.as_tag_mut() {
            if !self.head_seen
                && tag.kind == TagKind::Open
                && tag.namespace.is_none()
                && tag.name == "head"
            {
                self.head_seen = true;
                if !tag.is_component() {
                    tag.set_component_id(HEADER_ID);
                    tag.mark_auto();
                }
            }
        }
        Ok(Filtered::Keep(element))
    }

    fn post_process(&mut self, markup: &mut Markup) -> Result<(), MarkupError> {
        let found = markup
            .elements()
            .iter()
            .position(|el| is_open_tag(el, None, "head"));

        let (index, synthesized) = match found {
            Some(index) => (index, false),
            None => {
                // No head section in the template: fabricate an empty one
                // before <body>, or after <html>, or at the very start.
                let index = markup
                    .elements()
                    .iter()
                    .position(|el| is_open_tag(el, None, "body"))
                    .or_else(|| {
                        markup
                            .elements()
                            .iter()
                            .position(|el| is_open_tag(el, None, "html"))
                            .map(|i| i + 1)
                    })
                    .unwrap_or(0);
                let mut head = ComponentTag::new("head", TagKind::Open);
                head.set_component_id(HEADER_ID);
                head.mark_auto();
                head.mark_synthetic();
                let mut close = ComponentTag::new("head", TagKind::Close);
                close.mark_synthetic();
                markup.insert(index, MarkupElement::Tag(head));
                markup.insert(index + 1, MarkupElement::Tag(close));
                debug!(index, "Synthesized empty head section");
                (index, true)
            }
        };

        let mut marks = self
            .header
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        marks.head_index = Some(index);
        marks.synthesized = synthesized;
        Ok(())
    }
}
