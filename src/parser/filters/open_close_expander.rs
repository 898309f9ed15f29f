use crate::markup::{ComponentTag, MarkupElement, MarkupError, TagKind};
use crate::parser::filters::is_void_element;
use crate::parser::{FilterKind, Filtered, MarkupFilter};

/// Rewrites XML-style self-closing tags into an open/close pair.
///
/// `<span weft:id="x"/>` is valid template shorthand but would serialize
/// to broken HTML, and a component needs a real body to replace. The
/// expansion applies to every plain non-void element; void elements stay
/// self-closing, and framework tags are left for their own handlers.
///
/// The fabricated close tag is injected as a replacement, so it flows
/// through the rest of the chain like any source element would.
pub struct OpenCloseExpander;

impl OpenCloseExpander {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for OpenCloseExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupFilter for OpenCloseExpander {
    fn kind(&self) -> FilterKind {
        FilterKind::OpenCloseExpander
    }

    fn on_element(&mut self, element: MarkupElement) -> Result<Filtered, MarkupError> {
        match element {
            MarkupElement::Tag(mut tag)
                if tag.kind == TagKind::OpenClose
                    && tag.namespace.is_none()
                    && !is_void_element(&tag.name) =>
            {
                let mut close = ComponentTag::new(tag.name.clone(), TagKind::Close);
                close.line = tag.line;
                close.column = tag.column;
                close.mark_synthetic();
                tag.kind = TagKind::Open;
                Ok(Filtered::Replace(vec![
                    MarkupElement::Tag(tag),
                    MarkupElement::Tag(close),
                ]))
            }
            other => Ok(Filtered::Keep(other)),
        }
    }
}
