use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// What kind of container owns a markup resource.
///
/// The parser enables extra filters depending on the container: pages get
/// header-section handling, and any concrete container gets message-tag and
/// forced-tag-id handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerKind {
    /// Top-level page — owns the `<head>` section
    Page,
    /// Reusable panel embedded in another container
    Panel,
    /// Border wrapping child content
    Border,
    /// Any other markup-bearing component
    Component,
}

impl ContainerKind {
    #[inline]
    #[must_use]
    pub fn is_page(self) -> bool {
        self == ContainerKind::Page
    }
}

/// Identity of the container a markup resource belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerInfo {
    pub kind: ContainerKind,
    /// Fully qualified type name of the container, e.g.
    /// `app::checkout::CheckoutPage`. Used to derive stable markup id
    /// prefixes and cache keys.
    pub type_name: String,
}

impl ContainerInfo {
    #[must_use]
    pub fn new(kind: ContainerKind, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
        }
    }
}

static XML_ENCODING: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"(?i)<\?xml[^>]*?encoding\s*=\s*["']([A-Za-z0-9._-]+)["']"#)
        .expect("encoding declaration regex must compile")
});

/// A markup source plus the metadata the parser needs to assemble its
/// filter chain: where the markup came from (if anywhere) and which
/// container it belongs to (if known).
///
/// Inline strings parse too — they just skip the filters that only make
/// sense for file-backed, container-owned markup.
#[derive(Debug)]
pub struct MarkupResourceStream {
    source: String,
    path: Option<PathBuf>,
    container_info: Option<ContainerInfo>,
    encoding: Option<String>,
}

impl MarkupResourceStream {
    /// Wrap an in-memory markup string with no backing file.
    #[must_use]
    pub fn from_string(source: impl Into<String>) -> Self {
        let source = source.into();
        let encoding = detect_encoding(&source);
        Self {
            source,
            path: None,
            container_info: None,
            encoding,
        }
    }

    /// Read a markup file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read markup file: {}", path.display()))?;
        let encoding = detect_encoding(&source);
        Ok(Self {
            source,
            path: Some(path.to_path_buf()),
            container_info: None,
            encoding,
        })
    }

    /// Build from already-loaded file content, keeping the path association.
    /// Used by the markup cache, which reads files itself to digest them.
    #[must_use]
    pub fn from_parts(source: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let encoding = detect_encoding(&source);
        Self {
            source,
            path: Some(path.into()),
            container_info: None,
            encoding,
        }
    }

    /// Attach container identity; enables the container-dependent filters.
    #[must_use]
    pub fn with_container_info(mut self, info: ContainerInfo) -> Self {
        self.container_info = Some(info);
        self
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn container_info(&self) -> Option<&ContainerInfo> {
        self.container_info.as_ref()
    }

    /// True when this markup is backed by a file on disk.
    #[inline]
    #[must_use]
    pub fn has_resource(&self) -> bool {
        self.path.is_some()
    }

    /// Character encoding declared in an `<?xml … ?>` prolog, if any.
    #[must_use]
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Short description for log output: the file path, or `<inline>`.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "<inline>".to_string(),
        }
    }
}

fn detect_encoding(source: &str) -> Option<String> {
    // Only a prolog at the very start of the document counts.
    let mut end = source.len().min(128);
    while !source.is_char_boundary(end) {
        end -= 1;
    }
    let head = &source[..end];
    if !head.trim_start().starts_with("<?xml") {
        return None;
    }
    XML_ENCODING
        .captures(head)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_markup_has_no_resource() {
        let stream = MarkupResourceStream::from_string("<p>hi</p>");
        assert!(!stream.has_resource());
        assert!(stream.container_info().is_none());
        assert_eq!(stream.describe(), "<inline>");
    }

    #[test]
    fn encoding_detected_from_xml_prolog() {
        let stream = MarkupResourceStream::from_string(
            "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<html></html>",
        );
        assert_eq!(stream.encoding(), Some("ISO-8859-1"));
        let plain = MarkupResourceStream::from_string("<html></html>");
        assert_eq!(plain.encoding(), None);
    }

    #[test]
    fn container_info_marks_pages() {
        let info = ContainerInfo::new(ContainerKind::Page, "app::HomePage");
        assert!(info.kind.is_page());
        let info = ContainerInfo::new(ContainerKind::Panel, "app::NavPanel");
        assert!(!info.kind.is_page());
    }
}
