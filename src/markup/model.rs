use crate::markup::element::{MarkupElement, TagKind};
use crate::markup::resource::MarkupResourceStream;
use crate::parser::FilterKind;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Where the document's header section ended up, shared between the
/// header-section filter and the markup it is building.
///
/// The filter is handed this handle when the chain is assembled, before the
/// `Markup` exists; it fills the marks in during post-processing, once the
/// final element positions are known.
#[derive(Debug, Default)]
pub struct HeaderMarks {
    /// Index of the `<head>` open tag in the final element list.
    pub head_index: Option<usize>,
    /// True when no `<head>` was present and the filter synthesized one.
    pub synthesized: bool,
}

/// Shared handle to [`HeaderMarks`].
pub type HeaderHandle = Arc<Mutex<HeaderMarks>>;

/// The parsed, filtered representation of one markup resource: a flat list
/// of raw segments and tags, in document order, plus the metadata collected
/// while parsing.
#[derive(Debug)]
pub struct Markup {
    elements: Vec<MarkupElement>,
    resource: MarkupResourceStream,
    header: HeaderHandle,
    filter_trace: Vec<FilterKind>,
}

impl Markup {
    pub(crate) fn from_parts(
        resource: MarkupResourceStream,
        header: HeaderHandle,
        elements: Vec<MarkupElement>,
        filter_trace: Vec<FilterKind>,
    ) -> Self {
        Self {
            elements,
            resource,
            header,
            filter_trace,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MarkupElement> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MarkupElement> {
        self.elements.iter()
    }

    #[must_use]
    pub fn elements(&self) -> &[MarkupElement] {
        &self.elements
    }

    /// Mutable access for filter post-processing passes.
    pub(crate) fn elements_mut(&mut self) -> &mut Vec<MarkupElement> {
        &mut self.elements
    }

    /// Insert an element, shifting everything after `index`.
    pub(crate) fn insert(&mut self, index: usize, element: MarkupElement) {
        self.elements.insert(index, element);
    }

    /// Index of the first tag carrying the given component id.
    #[must_use]
    pub fn find_component(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|el| {
            el.as_tag()
                .and_then(|tag| tag.component_id())
                .is_some_and(|tag_id| tag_id == id)
        })
    }

    #[must_use]
    pub fn resource(&self) -> &MarkupResourceStream {
        &self.resource
    }

    /// Index of the `<head>` open tag, when the header-section filter ran.
    #[must_use]
    pub fn header_index(&self) -> Option<usize> {
        self.header.lock().ok().and_then(|marks| marks.head_index)
    }

    /// True when the header-section filter synthesized a `<head>` because
    /// the page markup had none.
    #[must_use]
    pub fn header_synthesized(&self) -> bool {
        self.header.lock().is_ok_and(|marks| marks.synthesized)
    }

    /// The filter kinds that processed this markup, in chain order.
    #[must_use]
    pub fn filter_trace(&self) -> &[FilterKind] {
        &self.filter_trace
    }

    /// Drop framework tags that carry no component id — these are purely
    /// structural (`<weft:link>` boundaries and the like) and have no place
    /// in production output. Component-bearing framework tags stay, since
    /// components still need to be located by id, and a close tag is
    /// dropped exactly when its open tag was. Framework tags nest properly
    /// among themselves (the structure filter enforced that), so a single
    /// keep/drop stack pairs them up.
    pub(crate) fn strip_framework_tags(&mut self, namespace: &str) {
        let mut kept_opens: Vec<bool> = Vec::new();
        self.elements.retain(|el| {
            let Some(tag) = el.as_tag() else { return true };
            if tag.namespace.as_deref() != Some(namespace) {
                return true;
            }
            match tag.kind {
                TagKind::Open => {
                    let keep = tag.is_component();
                    kept_opens.push(keep);
                    keep
                }
                TagKind::Close => kept_opens.pop().unwrap_or(true),
                TagKind::OpenClose => tag.is_component(),
            }
        });
    }

    /// Serializable view of the element list, used by the CLI JSON dump.
    #[must_use]
    pub fn to_serializable(&self) -> MarkupDump<'_> {
        MarkupDump {
            resource: self.resource.describe(),
            filters: self.filter_trace.iter().map(|k| k.name()).collect(),
            header_index: self.header_index(),
            elements: &self.elements,
        }
    }
}

impl fmt::Display for Markup {
    /// Reconstructs a markup document from the element list. Synthetic
    /// elements render like any other, so the output reflects the filtered
    /// stream rather than the original source text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Markup {
    type Item = &'a MarkupElement;
    type IntoIter = std::slice::Iter<'a, MarkupElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowed JSON-friendly projection of a [`Markup`].
#[derive(Debug, Serialize)]
pub struct MarkupDump<'a> {
    pub resource: String,
    pub filters: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_index: Option<usize>,
    pub elements: &'a [MarkupElement],
}

/// True when the element is an open or open-close tag with the given
/// namespace and name. Shared convenience for post-processing scans.
pub(crate) fn is_open_tag(element: &MarkupElement, namespace: Option<&str>, name: &str) -> bool {
    element.as_tag().is_some_and(|tag| {
        tag.kind != TagKind::Close && tag.is_named(namespace, name)
    })
}
