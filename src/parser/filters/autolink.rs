use crate::markup::{Markup, MarkupElement, MarkupError, TagKind};
use crate::parser::filters::is_relative_reference;
use crate::parser::{FilterKind, Filtered, MarkupFilter};
use tracing::{trace, warn};

/// Turns plain relative anchors into link components, so templates can
/// navigate between pages without declaring a component for every link.
///
/// Inside a `<weft:link>` region every qualifying `<a href="…">` is
/// promoted; with automatic linking enabled the region markers are not
/// needed. Qualifying means: a relative href, and no component id of its
/// own — an anchor the application already addresses is left alone.
pub struct AutolinkHandler {
    namespace: String,
    automatic: bool,
    region_depth: usize,
    counter: usize,
}

impl AutolinkHandler {
    #[must_use]
    pub fn new(namespace: impl Into<String>, automatic: bool) -> Self {
        Self {
            namespace: namespace.into(),
            automatic,
            region_depth: 0,
            counter: 0,
        }
    }
}

impl MarkupFilter for AutolinkHandler {
    fn kind(&self) -> FilterKind {
        FilterKind::Autolink
    }

    fn on_element(&mut self, mut element: MarkupElement) -> Result<Filtered, MarkupError> {
        let Some(tag) = element.as_tag_mut() else {
            return Ok(Filtered::Keep(element));
        };

        if tag.is_named(Some(&self.namespace), "link") {
            match tag.kind {
                TagKind::Open => self.region_depth += 1,
                TagKind::Close => {
                    if self.region_depth == 0 {
                        warn!(
                            line = tag.line,
                            column = tag.column,
                            "Link region close without an open region"
                        );
                    } else {
                        self.region_depth -= 1;
                    }
                }
                TagKind::OpenClose => {}
            }
            return Ok(Filtered::Keep(element));
        }

        let in_scope = self.region_depth > 0 || self.automatic;
        if in_scope
            && tag.kind != TagKind::Close
            && tag.namespace.is_none()
            && tag.name == "a"
            && !tag.is_component()
        {
            let relative = tag
                .get_attribute("href")
                .is_some_and(is_relative_reference);
            if relative {
                let id = format!("_autolink_{}", self.counter);
                self.counter += 1;
                trace!(id = %id, href = tag.get_attribute("href").unwrap_or_default(), "Anchor promoted to link component");
                tag.set_component_id(id);
                tag.mark_auto();
            }
        }
        Ok(Filtered::Keep(element))
    }

    fn post_process(&mut self, markup: &mut Markup) -> Result<(), MarkupError> {
        if self.region_depth > 0 {
            warn!(
                resource = %markup.resource().describe(),
                "Link region is never closed"
            );
        }
        Ok(())
    }
}
