//! # Markup Hot Reload
//!
//! Development-time file watching: template edits invalidate the cache so
//! the next render parses fresh markup, without restarting the host.

use crate::cache::MarkupCache;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Watch markup files and invalidate the cache when they change.
///
/// Parent directories are watched rather than the files themselves, since
/// editors routinely save through rename-and-replace, which detaches a
/// watch on the file node. Change events for paths the cache never held
/// are ignored; `on_invalidate` fires only when an entry was actually
/// dropped.
///
/// The returned watcher must be kept alive — dropping it stops the
/// watching.
pub fn watch_markup<F>(
    paths: &[PathBuf],
    cache: Arc<MarkupCache>,
    on_invalidate: F,
) -> notify::Result<RecommendedWatcher>
where
    F: Fn(&Path) + Send + 'static,
{
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if !matches!(
                event.kind,
                EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
            ) {
                return;
            }
            for path in &event.paths {
                if cache.invalidate(path) {
                    info!(path = %path.display(), "Markup changed, cache entry dropped");
                    on_invalidate(path);
                }
            }
        }
        Err(err) => warn!(error = %err, "Markup watcher error"),
    })?;

    for path in paths {
        let target = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(path.as_path());
        watcher.watch(target, RecursiveMode::NonRecursive)?;
        debug!(path = %path.display(), watching = %target.display(), "Watching markup file");
    }
    Ok(watcher)
}
