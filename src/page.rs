//! Page-side state the AJAX lifecycle needs.

/// The slice of page state the behavior layer touches: the versioning flag.
///
/// A full page object lives in the host application, with its component
/// hierarchy and render machinery; behaviors only need to suspend version
/// recording while a partial update runs, so that a sequence of AJAX
/// requests does not flood the page history with intermediate versions.
#[derive(Debug, Clone)]
pub struct Page {
    versioned: bool,
}

impl Page {
    /// Pages record versions by default.
    #[must_use]
    pub fn new() -> Self {
        Self { versioned: true }
    }

    #[inline]
    #[must_use]
    pub fn is_versioned(&self) -> bool {
        self.versioned
    }

    pub fn set_versioned(&mut self, versioned: bool) {
        self.versioned = versioned;
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
