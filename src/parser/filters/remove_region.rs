use crate::markup::{Markup, MarkupElement, MarkupError, TagKind};
use crate::parser::{FilterKind, Filtered, MarkupFilter};
use tracing::trace;

/// Swallows everything between `<weft:remove>` and its close tag —
/// previews, mockup content, designer notes. Regions may not nest and may
/// not contain component tags: a component inside a removed region is
/// almost certainly a template bug, so the parse fails rather than
/// silently dropping an addressable component.
pub struct RemoveRegionHandler {
    namespace: String,
    /// Position of the currently open region's tag, for error reporting.
    open_at: Option<(usize, usize)>,
}

impl RemoveRegionHandler {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            open_at: None,
        }
    }
}

impl MarkupFilter for RemoveRegionHandler {
    fn kind(&self) -> FilterKind {
        FilterKind::RemoveRegion
    }

    fn on_element(&mut self, element: MarkupElement) -> Result<Filtered, MarkupError> {
        let tag = match element.as_tag() {
            Some(tag) => tag,
            None => {
                return Ok(if self.open_at.is_some() {
                    Filtered::Drop
                } else {
                    Filtered::Keep(element)
                });
            }
        };

        if tag.is_named(Some(&self.namespace), "remove") {
            return match tag.kind {
                TagKind::Open => {
                    if let Some((line, column)) = self.open_at {
                        return Err(MarkupError::filter(
                            FilterKind::RemoveRegion,
                            format!(
                                "remove region at {}:{} nested inside region opened at {}:{}",
                                tag.line, tag.column, line, column
                            ),
                        ));
                    }
                    self.open_at = Some((tag.line, tag.column));
                    Ok(Filtered::Drop)
                }
                TagKind::Close => {
                    if self.open_at.is_none() {
                        return Err(MarkupError::filter(
                            FilterKind::RemoveRegion,
                            format!(
                                "remove region close at {}:{} without an open region",
                                tag.line, tag.column
                            ),
                        ));
                    }
                    trace!("Remove region closed");
                    self.open_at = None;
                    Ok(Filtered::Drop)
                }
                // Self-closing region removes nothing
                TagKind::OpenClose => Ok(Filtered::Drop),
            };
        }

        if self.open_at.is_some() {
            if tag.is_component() {
                return Err(MarkupError::filter(
                    FilterKind::RemoveRegion,
                    format!(
                        "component tag '{}' at {}:{} inside a removed region",
                        tag.component_id().unwrap_or_default(),
                        tag.line,
                        tag.column
                    ),
                ));
            }
            return Ok(Filtered::Drop);
        }
        Ok(Filtered::Keep(element))
    }

    fn post_process(&mut self, _markup: &mut Markup) -> Result<(), MarkupError> {
        if let Some((line, column)) = self.open_at.take() {
            return Err(MarkupError::filter(
                FilterKind::RemoveRegion,
                format!("remove region opened at {}:{} is never closed", line, column),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::ComponentTag;

    fn remove_tag(kind: TagKind) -> MarkupElement {
        MarkupElement::Tag(ComponentTag::new("remove", kind).with_namespace("weft"))
    }

    #[test]
    fn region_content_is_dropped_inclusively() {
        let mut filter = RemoveRegionHandler::new("weft");
        assert!(matches!(
            filter.on_element(remove_tag(TagKind::Open)).unwrap(),
            Filtered::Drop
        ));
        assert!(matches!(
            filter
                .on_element(MarkupElement::Raw("mockup".into()))
                .unwrap(),
            Filtered::Drop
        ));
        assert!(matches!(
            filter.on_element(remove_tag(TagKind::Close)).unwrap(),
            Filtered::Drop
        ));
        // After the region, elements flow again
        assert!(matches!(
            filter
                .on_element(MarkupElement::Raw("kept".into()))
                .unwrap(),
            Filtered::Keep(_)
        ));
    }

    #[test]
    fn component_inside_region_fails() {
        let mut filter = RemoveRegionHandler::new("weft");
        filter.on_element(remove_tag(TagKind::Open)).unwrap();
        let mut span = ComponentTag::new("span", TagKind::Open);
        span.set_component_id("oops");
        assert!(filter.on_element(MarkupElement::Tag(span)).is_err());
    }

    #[test]
    fn nested_region_fails() {
        let mut filter = RemoveRegionHandler::new("weft");
        filter.on_element(remove_tag(TagKind::Open)).unwrap();
        assert!(filter.on_element(remove_tag(TagKind::Open)).is_err());
    }

    #[test]
    fn unterminated_region_fails_at_post_process() {
        let mut filter = RemoveRegionHandler::new("weft");
        filter.on_element(remove_tag(TagKind::Open)).unwrap();
        let resource = crate::markup::MarkupResourceStream::from_string("");
        let mut markup = crate::markup::Markup::from_parts(
            resource,
            crate::markup::HeaderHandle::default(),
            Vec::new(),
            Vec::new(),
        );
        assert!(filter.post_process(&mut markup).is_err());
    }
}
