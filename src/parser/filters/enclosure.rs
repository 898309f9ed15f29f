use crate::markup::{Markup, MarkupElement, MarkupError, TagKind};
use crate::parser::{FilterKind, Filtered, MarkupFilter};
use tracing::trace;

/// Handles conditional-visibility regions:
///
/// ```html
/// <weft:enclosure child="details">
///   <h3>Details</h3>
///   <div weft:id="details">…</div>
/// </weft:enclosure>
/// ```
///
/// The region renders only when its controlling child component is
/// visible. When the `child` attribute is omitted, the first component tag
/// inside the region becomes the controller — resolved during
/// post-processing, since the controller may appear anywhere before the
/// region closes.
pub struct EnclosureHandler {
    namespace: String,
    counter: usize,
    depth: usize,
}

impl EnclosureHandler {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            counter: 0,
            depth: 0,
        }
    }

    fn is_enclosure(&self, element: &MarkupElement) -> bool {
        element.as_tag().is_some_and(|tag| self.is_enclosure_tag(tag))
    }

    fn is_enclosure_tag(&self, tag: &crate::markup::ComponentTag) -> bool {
        tag.is_named(Some(&self.namespace), "enclosure")
    }

    /// Index of the close tag matching the enclosure opened at `open_index`.
    fn matching_close(&self, markup: &Markup, open_index: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, element) in markup.elements().iter().enumerate().skip(open_index + 1) {
            if !self.is_enclosure(element) {
                continue;
            }
            let Some(tag) = element.as_tag() else { continue };
            match tag.kind {
                TagKind::Open => depth += 1,
                TagKind::Close => {
                    if depth == 0 {
                        return Some(i);
                    }
                    depth -= 1;
                }
                TagKind::OpenClose => {}
            }
        }
        None
    }
}

impl MarkupFilter for EnclosureHandler {
    fn kind(&self) -> FilterKind {
        FilterKind::Enclosure
    }

    fn on_element(&mut self, mut element: MarkupElement) -> Result<Filtered, MarkupError> {
        let Some(tag) = element.as_tag_mut() else {
            return Ok(Filtered::Keep(element));
        };
        if !tag.is_named(Some(&self.namespace), "enclosure") {
            return Ok(Filtered::Keep(element));
        }
        match tag.kind {
            TagKind::Open => {
                if !tag.is_component() {
                    let id = format!("_enclosure_{}", self.counter);
                    self.counter += 1;
                    tag.set_component_id(id);
                }
                tag.mark_auto();
                self.depth += 1;
            }
            TagKind::Close => {
                if self.depth == 0 {
                    return Err(MarkupError::filter(
                        FilterKind::Enclosure,
                        format!(
                            "enclosure close at {}:{} without an open enclosure",
                            tag.line, tag.column
                        ),
                    ));
                }
                self.depth -= 1;
            }
            TagKind::OpenClose => {
                return Err(MarkupError::filter(
                    FilterKind::Enclosure,
                    format!(
                        "enclosure at {}:{} is empty; it must wrap its controlling component",
                        tag.line, tag.column
                    ),
                ));
            }
        }
        Ok(Filtered::Keep(element))
    }

    fn post_process(&mut self, markup: &mut Markup) -> Result<(), MarkupError> {
        if self.depth > 0 {
            return Err(MarkupError::filter(
                FilterKind::Enclosure,
                "enclosure is never closed".to_string(),
            ));
        }

        // Resolve controllers for enclosures without an explicit child.
        let mut pending: Vec<(usize, String)> = Vec::new();
        for (i, element) in markup.elements().iter().enumerate() {
            let Some(tag) = element.as_tag() else { continue };
            if !self.is_enclosure(element) || tag.kind != TagKind::Open {
                continue;
            }
            if tag.get_attribute("child").is_some() {
                continue;
            }
            let close = self.matching_close(markup, i).ok_or_else(|| {
                MarkupError::filter(
                    FilterKind::Enclosure,
                    format!(
                        "enclosure at {}:{} has no matching close tag",
                        tag.line, tag.column
                    ),
                )
            })?;
            let child = markup.elements()[i + 1..close]
                .iter()
                .filter_map(MarkupElement::as_tag)
                .filter(|inner| inner.kind != TagKind::Close && !self.is_enclosure_tag(inner))
                .find_map(|inner| inner.component_id())
                .map(str::to_string);
            match child {
                Some(child) => {
                    trace!(child = %child, "Enclosure controller resolved");
                    pending.push((i, child));
                }
                None => {
                    return Err(MarkupError::filter(
                        FilterKind::Enclosure,
                        format!(
                            "enclosure at {}:{} contains no component to control it",
                            tag.line, tag.column
                        ),
                    ));
                }
            }
        }

        for (index, child) in pending {
            if let Some(tag) = markup.elements_mut()[index].as_tag_mut() {
                tag.put_attribute("child", child);
            }
        }
        Ok(())
    }
}
