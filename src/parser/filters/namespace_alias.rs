use crate::markup::{AttrVec, Markup, MarkupElement, MarkupError, NAMESPACE_URI};
use crate::parser::filters::component_tag::identify;
use crate::parser::{FilterKind, Filtered, MarkupFilter};
use std::collections::HashSet;
use tracing::debug;

/// Resolves declared framework namespace aliases to the canonical prefix.
///
/// A template may bind any prefix it likes to the framework namespace URI:
///
/// ```html
/// <html xmlns:w="urn:weft:markup">
///   <span w:id="greeting">…</span>
/// ```
///
/// This filter records such declarations, drops them from the output, and
/// rewrites aliased tag namespaces and attribute prefixes to the canonical
/// form, so every later stage sees one namespace. Tags rewritten here also
/// get the identification step the component-tag identifier could not apply
/// (it ran before the alias was known to be an alias).
pub struct NamespaceAliasHandler {
    canonical: String,
    id_attribute: String,
    aliases: HashSet<String>,
}

impl NamespaceAliasHandler {
    #[must_use]
    pub fn new(canonical: impl Into<String>) -> Self {
        let canonical = canonical.into();
        let id_attribute = format!("{}:{}", canonical, crate::markup::ID_ATTRIBUTE);
        Self {
            canonical,
            id_attribute,
            aliases: HashSet::new(),
        }
    }

    /// Aliases declared so far, canonical prefix excluded.
    #[must_use]
    pub fn aliases(&self) -> &HashSet<String> {
        &self.aliases
    }
}

fn rename_prefixed(attributes: &mut AttrVec, alias: &str, canonical: &str) {
    let prefix = format!("{}:", alias);
    for (name, _) in attributes.iter_mut() {
        let aliased = name
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&prefix));
        if aliased {
            *name = format!("{}:{}", canonical, &name[prefix.len()..]);
        }
    }
}

impl MarkupFilter for NamespaceAliasHandler {
    fn kind(&self) -> FilterKind {
        FilterKind::NamespaceAlias
    }

    fn on_element(&mut self, mut element: MarkupElement) -> Result<Filtered, MarkupError> {
        let Some(tag) = element.as_tag_mut() else {
            return Ok(Filtered::Keep(element));
        };

        // Pick up xmlns declarations bound to the framework URI and drop
        // them from the tag.
        let declared: Vec<String> = tag
            .attributes
            .iter()
            .filter_map(|(name, value)| {
                let prefix = name.get(..6)?;
                if prefix.eq_ignore_ascii_case("xmlns:") && value.starts_with(NAMESPACE_URI) {
                    name.get(6..).map(str::to_ascii_lowercase)
                } else {
                    None
                }
            })
            .filter(|prefix| !prefix.is_empty())
            .collect();
        for prefix in declared {
            tag.remove_attribute(&format!("xmlns:{}", prefix));
            if prefix != self.canonical {
                debug!(alias = %prefix, canonical = %self.canonical, "Framework namespace alias declared");
                self.aliases.insert(prefix);
            }
        }

        // Rewrite aliased tags and attributes to the canonical prefix.
        let alias = tag
            .namespace
            .as_deref()
            .filter(|ns| self.aliases.contains(*ns))
            .map(str::to_string);
        let mut rewritten = alias.is_some();
        if let Some(alias) = alias {
            tag.namespace = Some(self.canonical.clone());
            rename_prefixed(&mut tag.attributes, &alias, &self.canonical);
        }
        // Aliased attributes appear on plain tags too: <span w:id="…">
        for alias in &self.aliases {
            let prefix = format!("{}:", alias);
            if tag
                .attributes
                .iter()
                .any(|(name, _)| name.get(..prefix.len()).is_some_and(|h| h.eq_ignore_ascii_case(&prefix)))
            {
                rename_prefixed(&mut tag.attributes, alias, &self.canonical);
                rewritten = true;
            }
        }

        if rewritten {
            identify(tag, &self.canonical, &self.id_attribute)?;
        }
        Ok(Filtered::Keep(element))
    }

    fn post_process(&mut self, _markup: &mut Markup) -> Result<(), MarkupError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{ComponentTag, TagKind};

    fn kept_tag(filtered: Filtered) -> ComponentTag {
        match filtered {
            Filtered::Keep(MarkupElement::Tag(tag)) => tag,
            other => panic!("alias handler must keep tags, got {other:?}"),
        }
    }

    #[test]
    fn declaration_is_recorded_and_dropped() {
        let mut filter = NamespaceAliasHandler::new("weft");
        let html = ComponentTag::new("html", TagKind::Open)
            .with_attribute("xmlns:w", "urn:weft:markup")
            .with_attribute("lang", "en");
        let tag = kept_tag(filter.on_element(MarkupElement::Tag(html)).unwrap());
        assert!(filter.aliases().contains("w"));
        assert_eq!(tag.get_attribute("xmlns:w"), None);
        assert_eq!(tag.get_attribute("lang"), Some("en"));
    }

    #[test]
    fn aliased_tags_are_rewritten_and_identified() {
        let mut filter = NamespaceAliasHandler::new("weft");
        let html =
            ComponentTag::new("html", TagKind::Open).with_attribute("xmlns:w", "urn:weft:markup");
        filter.on_element(MarkupElement::Tag(html)).unwrap();

        let panel = ComponentTag::new("panel", TagKind::Open).with_namespace("w");
        let tag = kept_tag(filter.on_element(MarkupElement::Tag(panel)).unwrap());
        assert_eq!(tag.namespace.as_deref(), Some("weft"));
        assert!(tag.is_auto());
    }

    #[test]
    fn aliased_id_attribute_promotes_component() {
        let mut filter = NamespaceAliasHandler::new("weft");
        let html =
            ComponentTag::new("html", TagKind::Open).with_attribute("xmlns:w", "urn:weft:markup");
        filter.on_element(MarkupElement::Tag(html)).unwrap();

        let span = ComponentTag::new("span", TagKind::Open).with_attribute("w:id", "user");
        let tag = kept_tag(filter.on_element(MarkupElement::Tag(span)).unwrap());
        assert_eq!(tag.get_attribute("weft:id"), Some("user"));
        assert_eq!(tag.component_id(), Some("user"));
    }

    #[test]
    fn unrelated_namespaces_are_untouched() {
        let mut filter = NamespaceAliasHandler::new("weft");
        let html = ComponentTag::new("html", TagKind::Open)
            .with_attribute("xmlns:svg", "http://www.w3.org/2000/svg");
        let tag = kept_tag(filter.on_element(MarkupElement::Tag(html)).unwrap());
        assert_eq!(
            tag.get_attribute("xmlns:svg"),
            Some("http://www.w3.org/2000/svg")
        );
        assert!(filter.aliases().is_empty());
    }
}
