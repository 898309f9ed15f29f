//! # Markup Settings
//!
//! Tunables that shape how markup is parsed, loaded from the environment
//! (`WEFT_*` variables) or from a YAML config file with a `markup:`
//! section:
//!
//! ```yaml
//! markup:
//!   compress_whitespace: true
//!   strip_comments: true
//!   automatic_linking: false
//!   namespace_alias: weft
//! ```
//!
//! All settings default to the permissive development behavior: keep
//! comments, keep whitespace, keep framework tags in the output.

use crate::markup::DEFAULT_NAMESPACE;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::warn;

/// Parser behavior switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkupSettings {
    /// Collapse runs of whitespace in raw text down to a single space.
    pub compress_whitespace: bool,
    /// Drop HTML comments (`<!-- … -->`) before filtering. Conditional
    /// comments (`<!--[if …]`) survive, browsers interpret those.
    pub strip_comments: bool,
    /// Drop framework tags that carry no component id from the parsed
    /// model, the way production output wants it.
    pub strip_framework_tags: bool,
    /// Treat every relative anchor as a link candidate, not just anchors
    /// inside explicit link regions.
    pub automatic_linking: bool,
    /// Canonical namespace prefix for framework tags. Markup may declare
    /// its own alias; this is what aliases resolve to.
    pub namespace_alias: String,
}

impl Default for MarkupSettings {
    fn default() -> Self {
        Self {
            compress_whitespace: false,
            strip_comments: false,
            strip_framework_tags: false,
            automatic_linking: false,
            namespace_alias: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    markup: MarkupSettings,
}

impl MarkupSettings {
    /// Read settings from `WEFT_*` environment variables, falling back to
    /// defaults for anything unset or unparseable.
    ///
    /// Recognized variables: `WEFT_COMPRESS_WHITESPACE`,
    /// `WEFT_STRIP_COMMENTS`, `WEFT_STRIP_TAGS`, `WEFT_AUTOLINK`,
    /// `WEFT_NAMESPACE`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Some(v) = env_bool("WEFT_COMPRESS_WHITESPACE") {
            settings.compress_whitespace = v;
        }
        if let Some(v) = env_bool("WEFT_STRIP_COMMENTS") {
            settings.strip_comments = v;
        }
        if let Some(v) = env_bool("WEFT_STRIP_TAGS") {
            settings.strip_framework_tags = v;
        }
        if let Some(v) = env_bool("WEFT_AUTOLINK") {
            settings.automatic_linking = v;
        }
        if let Ok(alias) = env::var("WEFT_NAMESPACE") {
            let alias = alias.trim().to_string();
            if alias.is_empty() {
                warn!("WEFT_NAMESPACE is empty, keeping default namespace alias");
            } else {
                settings.namespace_alias = alias;
            }
        }
        settings
    }

    /// Parse settings from YAML text with a top-level `markup:` section.
    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let config: ConfigFile =
            serde_yaml::from_str(text).context("Failed to parse markup settings YAML")?;
        Ok(config.markup)
    }

    /// Load settings from a YAML config file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml_str(&text)
    }
}

fn env_bool(name: &str) -> Option<bool> {
    let raw = env::var(name).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!(var = name, value = other, "Unrecognized boolean, ignoring");
            None
        }
    }
}
