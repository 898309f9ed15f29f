use crate::markup::{ComponentTag, Markup, MarkupElement, MarkupError};
use crate::parser::{FilterKind, Filtered, MarkupFilter};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{trace, warn};

/// Framework tag names the identifier accepts. Anything else in the
/// framework namespace is a typo worth failing loudly on.
const WELL_KNOWN_TAGS: &[&str] = &[
    "border",
    "child",
    "container",
    "enclosure",
    "extend",
    "fragment",
    "head",
    "link",
    "message",
    "panel",
    "remove",
];

static VALID_ID: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("component id regex must compile")
});

/// Recognizes framework tags and component id attributes.
///
/// Runs first in every chain: tags in the framework namespace are checked
/// against the well-known set and marked as auto components, and any tag
/// carrying the namespaced id attribute (`weft:id="…"`) is promoted to a
/// component tag. Everything downstream keys off those marks.
pub struct ComponentTagIdentifier {
    namespace: String,
    id_attribute: String,
}

impl ComponentTagIdentifier {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let id_attribute = format!("{}:{}", namespace, crate::markup::ID_ATTRIBUTE);
        Self {
            namespace,
            id_attribute,
        }
    }
}

/// Shared identification step. The namespace-alias filter calls this too,
/// for tags it has just rewritten into the canonical namespace — those
/// passed the identifier before their namespace was recognizable.
pub(crate) fn identify(
    tag: &mut ComponentTag,
    namespace: &str,
    id_attribute: &str,
) -> Result<(), MarkupError> {
    if tag.namespace.as_deref() == Some(namespace) && !tag.is_close() {
        if !WELL_KNOWN_TAGS.contains(&tag.name.as_str()) {
            return Err(MarkupError::filter(
                FilterKind::ComponentTagIdentifier,
                format!(
                    "unknown framework tag <{}:{}> at {}:{}",
                    namespace, tag.name, tag.line, tag.column
                ),
            ));
        }
        tag.mark_auto();
        trace!(tag = %tag.name, "Framework tag recognized");
    }
    if tag.is_close() {
        return Ok(());
    }
    let id = tag.get_attribute(id_attribute).map(str::to_string);
    if let Some(id) = id {
        if !VALID_ID.is_match(&id) {
            return Err(MarkupError::filter(
                FilterKind::ComponentTagIdentifier,
                format!(
                    "invalid component id {:?} at {}:{}",
                    id, tag.line, tag.column
                ),
            ));
        }
        tag.set_component_id(id);
    }
    Ok(())
}

impl MarkupFilter for ComponentTagIdentifier {
    fn kind(&self) -> FilterKind {
        FilterKind::ComponentTagIdentifier
    }

    fn on_element(&mut self, mut element: MarkupElement) -> Result<Filtered, MarkupError> {
        if let Some(tag) = element.as_tag_mut() {
            identify(tag, &self.namespace, &self.id_attribute)?;
        }
        Ok(Filtered::Keep(element))
    }

    fn post_process(&mut self, markup: &mut Markup) -> Result<(), MarkupError> {
        // Duplicate ids don't fail the parse, but they will break component
        // addressing later, so surface them here where the file is known.
        let mut seen: HashSet<&str> = HashSet::new();
        for element in markup.elements() {
            let Some(tag) = element.as_tag() else { continue };
            if tag.is_close() || tag.is_auto() {
                continue;
            }
            if let Some(id) = tag.component_id() {
                if !seen.insert(id) {
                    warn!(
                        id,
                        resource = %markup.resource().describe(),
                        "Duplicate component id in markup"
                    );
                }
            }
        }
        Ok(())
    }
}
