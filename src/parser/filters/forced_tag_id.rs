use crate::markup::{Markup, MarkupElement, MarkupError, TagKind};
use crate::parser::{FilterKind, Filtered, MarkupFilter};

/// Forces an `id` attribute onto every head element that lacks one.
///
/// Partial updates replace head contributions by DOM id; a `<script>` or
/// `<link>` without one could never be swapped out. Ids are derived from
/// the owning container's type name so they stay stable across parses of
/// the same template:
/// `app::checkout::CheckoutPage` → `wh-checkoutpage-0`, `wh-checkoutpage-1`, …
pub struct ForcedTagIdHandler {
    prefix: String,
    counter: usize,
    in_head: bool,
}

impl ForcedTagIdHandler {
    #[must_use]
    pub fn new(container_type: &str) -> Self {
        Self {
            prefix: id_prefix(container_type),
            counter: 0,
            in_head: false,
        }
    }
}

fn id_prefix(container_type: &str) -> String {
    let last = container_type.rsplit("::").next().unwrap_or(container_type);
    let cleaned: String = last
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if cleaned.is_empty() {
        "wh-c-".to_string()
    } else {
        format!("wh-{}-", cleaned)
    }
}

impl MarkupFilter for ForcedTagIdHandler {
    fn kind(&self) -> FilterKind {
        FilterKind::ForcedTagId
    }

    fn on_element(&mut self, mut element: MarkupElement) -> Result<Filtered, MarkupError> {
        let Some(tag) = element.as_tag_mut() else {
            return Ok(Filtered::Keep(element));
        };
        if tag.namespace.is_none() && tag.name == "head" {
            match tag.kind {
                TagKind::Open => self.in_head = true,
                TagKind::Close => self.in_head = false,
                TagKind::OpenClose => {}
            }
            return Ok(Filtered::Keep(element));
        }
        if self.in_head
            && tag.kind != TagKind::Close
            && tag.namespace.is_none()
            && tag.get_attribute("id").is_none()
        {
            let id = format!("{}{}", self.prefix, self.counter);
            self.counter += 1;
            tag.put_attribute("id", id);
        }
        Ok(Filtered::Keep(element))
    }

    fn post_process(&mut self, _markup: &mut Markup) -> Result<(), MarkupError> {
        Ok(())
    }
}
