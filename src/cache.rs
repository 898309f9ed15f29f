//! # Markup Cache
//!
//! Parsing a template is pure — same file, same container, same settings,
//! same result — so parsed [`Markup`] is cached and shared. Entries are
//! keyed by file path plus container type (the container decides which
//! filters run, so one file can legitimately yield different element
//! lists) and guarded by a content digest: a stale entry is reparsed on
//! the next lookup even without an invalidation event.

use crate::markup::{ContainerInfo, Markup, MarkupResourceStream};
use crate::parser::MarkupParser;
use crate::settings::MarkupSettings;
use anyhow::Context;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

struct CacheEntry {
    markup: Arc<Markup>,
    digest: String,
}

/// Concurrent cache of parsed markup, safe to share across request
/// workers.
pub struct MarkupCache {
    entries: DashMap<String, CacheEntry>,
    settings: MarkupSettings,
}

impl MarkupCache {
    #[must_use]
    pub fn new(settings: MarkupSettings) -> Self {
        Self {
            entries: DashMap::new(),
            settings,
        }
    }

    fn canonical(path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    fn cache_key(path: &Path, container: Option<&ContainerInfo>) -> String {
        let container = container.map_or("-", |c| c.type_name.as_str());
        format!("{}#{}", path.display(), container)
    }

    /// Look up the parsed markup for `path`, parsing it when absent or
    /// when the file content no longer matches the cached digest.
    ///
    /// The file is read on every call — a read plus a digest is cheap next
    /// to a reparse, and it catches modifications even when no watcher is
    /// running.
    pub fn get_or_parse(
        &self,
        path: impl AsRef<Path>,
        container: Option<ContainerInfo>,
    ) -> anyhow::Result<Arc<Markup>> {
        let path = Self::canonical(path.as_ref());
        let key = Self::cache_key(&path, container.as_ref());
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read markup file: {}", path.display()))?;
        let digest = format!("{:x}", Sha256::digest(content.as_bytes()));

        if let Some(entry) = self.entries.get(&key) {
            if entry.digest == digest {
                trace!(key = %key, "Markup cache hit");
                return Ok(Arc::clone(&entry.markup));
            }
            debug!(key = %key, "Markup content changed, reparsing");
        }

        let mut resource = MarkupResourceStream::from_parts(content, &path);
        if let Some(info) = container {
            resource = resource.with_container_info(info);
        }
        let markup = MarkupParser::new(resource)
            .with_settings(self.settings.clone())
            .parse()?;
        let markup = Arc::new(markup);
        self.entries.insert(
            key,
            CacheEntry {
                markup: Arc::clone(&markup),
                digest,
            },
        );
        Ok(markup)
    }

    /// Drop every entry for `path`, all container variants included.
    /// Returns true when anything was actually cached for it.
    pub fn invalidate(&self, path: &Path) -> bool {
        let prefix = format!("{}#", Self::canonical(path).display());
        let mut removed = 0usize;
        self.entries.retain(|key, _| {
            if key.starts_with(&prefix) {
                removed += 1;
                false
            } else {
                true
            }
        });
        if removed > 0 {
            debug!(path = %path.display(), entries = removed, "Markup cache invalidated");
        }
        removed > 0
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn settings(&self) -> &MarkupSettings {
        &self.settings
    }
}
