use crate::markup::{Markup, MarkupElement, MarkupError, TagKind};
use crate::parser::{FilterKind, Filtered, MarkupFilter};
use tracing::trace;

/// Validates localization markup and turns message tags into components.
///
/// Two forms exist. The tag form marks a region whose body is replaced by
/// a localized string:
///
/// ```html
/// <weft:message key="cart.empty">Your cart is empty</weft:message>
/// ```
///
/// The attribute form localizes individual attributes of an ordinary tag:
///
/// ```html
/// <input type="submit" weft:message="value:form.submit"/>
/// ```
///
/// Only file-backed, container-owned markup gets this filter — localization
/// keys resolve against the container's resource bundle, so there is
/// nothing to do for inline fragments.
pub struct MessageTagHandler {
    namespace: String,
    message_attribute: String,
    counter: usize,
}

impl MessageTagHandler {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let message_attribute = format!("{}:message", namespace);
        Self {
            namespace,
            message_attribute,
            counter: 0,
        }
    }
}

/// Attribute form syntax: `attr:key` items separated by commas.
fn validate_bindings(value: &str) -> Result<(), String> {
    for item in value.split(',') {
        let item = item.trim();
        match item.split_once(':') {
            Some((attr, key)) if !attr.trim().is_empty() && !key.trim().is_empty() => {}
            _ => return Err(format!("malformed message binding {:?}", item)),
        }
    }
    Ok(())
}

impl MarkupFilter for MessageTagHandler {
    fn kind(&self) -> FilterKind {
        FilterKind::MessageTag
    }

    fn on_element(&mut self, mut element: MarkupElement) -> Result<Filtered, MarkupError> {
        let Some(tag) = element.as_tag_mut() else {
            return Ok(Filtered::Keep(element));
        };
        if tag.kind == TagKind::Close {
            return Ok(Filtered::Keep(element));
        }

        if tag.is_named(Some(&self.namespace), "message") {
            let key = tag.get_attribute("key").map(str::trim).unwrap_or_default();
            if key.is_empty() {
                return Err(MarkupError::filter(
                    FilterKind::MessageTag,
                    format!(
                        "message tag at {}:{} requires a non-empty key attribute",
                        tag.line, tag.column
                    ),
                ));
            }
            if !tag.is_component() {
                let id = format!("_message_{}", self.counter);
                self.counter += 1;
                trace!(id = %id, key, "Message tag promoted to component");
                tag.set_component_id(id);
            }
            tag.mark_auto();
            return Ok(Filtered::Keep(element));
        }

        if let Some(bindings) = tag.get_attribute(&self.message_attribute) {
            if let Err(problem) = validate_bindings(bindings) {
                return Err(MarkupError::filter(
                    FilterKind::MessageTag,
                    format!("{} at {}:{}", problem, tag.line, tag.column),
                ));
            }
        }
        Ok(Filtered::Keep(element))
    }

    fn post_process(&mut self, _markup: &mut Markup) -> Result<(), MarkupError> {
        Ok(())
    }
}
