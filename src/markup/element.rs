use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// Maximum inline attributes before heap allocation.
/// Most template tags carry a handful of attributes at most.
pub const MAX_INLINE_ATTRS: usize = 8;

/// Stack-allocated attribute storage for the parse hot path.
///
/// Attribute names keep their source casing; lookups are case-insensitive
/// (HTML attribute names are case-insensitive, and templates are hand-written).
pub type AttrVec = SmallVec<[(String, String); MAX_INLINE_ATTRS]>;

/// How a tag opens and closes in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TagKind {
    /// `<div>`
    Open,
    /// `</div>`
    Close,
    /// `<div/>` — XML-style self-closing
    OpenClose,
}

/// A single tag pulled from the markup stream.
///
/// Tags start out as plain structural data produced by the tokenizer. The
/// filter pipeline then promotes some of them to *component tags* (an id is
/// recorded), marks others as auto components (materialized from markup
/// alone), and may rewrite names, namespaces, or attributes in place.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentTag {
    /// Local tag name, lowercased by the tokenizer (`div`, `a`, `panel`)
    pub name: String,
    /// Namespace prefix, if the source wrote one (`weft` in `<weft:panel>`)
    pub namespace: Option<String>,
    /// Open / close / self-closing
    pub kind: TagKind,
    /// Attribute name/value pairs in source order (stack-allocated for ≤8)
    pub attributes: AttrVec,
    /// 1-based source line of the `<` that started this tag
    pub line: usize,
    /// 1-based source column of the `<` that started this tag
    pub column: usize,
    /// Component id, once a filter has identified this tag as addressable
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    /// True for components materialized from markup alone (autolinks,
    /// message tags, enclosures) rather than declared in code
    auto: bool,
    /// True for tags a filter fabricated (expanded close tags, synthesized
    /// header sections) — they have no position in the source document
    synthetic: bool,
    /// True once any filter has rewritten this tag
    modified: bool,
    /// Attribute names whose values were found to be relative path
    /// references (recorded by the path-prefix filter for the renderer)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    relative_paths: Vec<String>,
}

impl ComponentTag {
    /// Create a tag with no namespace, no attributes, at an unknown position.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TagKind) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            kind,
            attributes: AttrVec::new(),
            line: 0,
            column: 0,
            id: None,
            auto: false,
            synthetic: false,
            modified: false,
            relative_paths: Vec::new(),
        }
    }

    /// Builder-style namespace assignment, used by the tokenizer and tests.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Builder-style attribute assignment.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.kind == TagKind::Open
    }

    #[inline]
    #[must_use]
    pub fn is_close(&self) -> bool {
        self.kind == TagKind::Close
    }

    #[inline]
    #[must_use]
    pub fn is_open_close(&self) -> bool {
        self.kind == TagKind::OpenClose
    }

    /// `namespace:name` when a namespace is present, else the bare name.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}:{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// True when this tag is `name` in `namespace` (both exact, name
    /// case-insensitive).
    #[must_use]
    pub fn is_named(&self, namespace: Option<&str>, name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.name.eq_ignore_ascii_case(name)
    }

    /// Get an attribute value by name (case-insensitive).
    #[inline]
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace an attribute (case-insensitive replace) and mark the
    /// tag modified.
    pub fn put_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.attributes.push((name.to_string(), value.into()));
        self.modified = true;
    }

    /// Remove an attribute, returning its value when it was present.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self
            .attributes
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        self.modified = true;
        Some(self.attributes.remove(index).1)
    }

    /// Component id, when a filter has identified this tag as addressable.
    #[inline]
    #[must_use]
    pub fn component_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Record the component id; marks the tag modified.
    pub fn set_component_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
        self.modified = true;
    }

    /// True once a component id has been recorded.
    #[inline]
    #[must_use]
    pub fn is_component(&self) -> bool {
        self.id.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// Flag this tag as an auto component (materialized from markup alone).
    pub fn mark_auto(&mut self) {
        self.auto = true;
        self.modified = true;
    }

    #[inline]
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Flag this tag as fabricated by a filter rather than read from source.
    pub fn mark_synthetic(&mut self) {
        self.synthetic = true;
    }

    #[inline]
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Attribute names recorded as relative path references.
    #[must_use]
    pub fn relative_path_attributes(&self) -> &[String] {
        &self.relative_paths
    }

    /// Record an attribute as a relative path reference; marks the tag
    /// modified.
    pub fn mark_relative_path(&mut self, attribute: &str) {
        if !self
            .relative_paths
            .iter()
            .any(|a| a.eq_ignore_ascii_case(attribute))
        {
            self.relative_paths.push(attribute.to_string());
            self.modified = true;
        }
    }

    /// True when `close` is a close tag for this open tag (same name and
    /// namespace).
    #[must_use]
    pub fn matches_close(&self, close: &ComponentTag) -> bool {
        close.is_close()
            && close.name.eq_ignore_ascii_case(&self.name)
            && close.namespace == self.namespace
    }
}

impl fmt::Display for ComponentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TagKind::Open => write!(f, "<{}", self.qualified_name())?,
            TagKind::Close => return write!(f, "</{}>", self.qualified_name()),
            TagKind::OpenClose => write!(f, "<{}", self.qualified_name())?,
        }
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, value)?;
        }
        if self.kind == TagKind::OpenClose {
            write!(f, "/>")
        } else {
            write!(f, ">")
        }
    }
}

/// One element of the markup stream.
#[derive(Debug, Clone, Serialize)]
pub enum MarkupElement {
    /// Inert document text: character data, comments, doctype, processing
    /// instructions. Comments keep their `<!--`/`-->` delimiters so the
    /// settings layer can recognize and strip them.
    Raw(String),
    /// A structural tag, possibly promoted to a component tag by a filter.
    Tag(ComponentTag),
}

impl MarkupElement {
    #[inline]
    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self, MarkupElement::Raw(_))
    }

    #[inline]
    #[must_use]
    pub fn as_tag(&self) -> Option<&ComponentTag> {
        match self {
            MarkupElement::Tag(tag) => Some(tag),
            MarkupElement::Raw(_) => None,
        }
    }

    #[inline]
    pub fn as_tag_mut(&mut self) -> Option<&mut ComponentTag> {
        match self {
            MarkupElement::Tag(tag) => Some(tag),
            MarkupElement::Raw(_) => None,
        }
    }

    /// One-line rendition used by the CLI dump and log output.
    #[must_use]
    pub fn to_debug_string(&self) -> String {
        match self {
            MarkupElement::Raw(text) => {
                let compact = text.replace(['\n', '\r'], "\\n");
                if compact.len() > 60 {
                    let mut cut = 60;
                    while !compact.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    format!("RAW {:?}…", &compact[..cut])
                } else {
                    format!("RAW {:?}", compact)
                }
            }
            MarkupElement::Tag(tag) => match tag.component_id() {
                Some(id) => format!("TAG {} id={}", tag, id),
                None => format!("TAG {}", tag),
            },
        }
    }
}

impl fmt::Display for MarkupElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupElement::Raw(text) => f.write_str(text),
            MarkupElement::Tag(tag) => write!(f, "{}", tag),
        }
    }
}
