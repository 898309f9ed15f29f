use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::debug;

/// Collects everything one partial update wants to send back: replacement
/// markup per component, plus scripts to evaluate on the client before and
/// after the DOM is patched.
///
/// The response encodes as a small XML envelope. Scripts queued with
/// [`prepend_script`](Self::prepend_script) run before the component
/// replacements are applied (`<priority-evaluate>`), scripts queued with
/// [`append_script`](Self::append_script) run after (`<evaluate>`).
/// Payloads are entity-escaped rather than CDATA-wrapped, so markup
/// containing `]]>` needs no special casing.
#[derive(Debug, Default)]
pub struct AjaxRequestTarget {
    components: Vec<(String, String)>,
    prepend_scripts: Vec<String>,
    append_scripts: Vec<String>,
}

impl AjaxRequestTarget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a component for replacement: `markup_id` is the DOM id to
    /// swap, `markup` the rendered replacement.
    pub fn add_component(&mut self, markup_id: impl Into<String>, markup: impl Into<String>) {
        self.components.push((markup_id.into(), markup.into()));
    }

    /// Queue a script to run before the DOM is patched.
    pub fn prepend_script(&mut self, script: impl Into<String>) {
        self.prepend_scripts.push(script.into());
    }

    /// Queue a script to run after the DOM is patched.
    pub fn append_script(&mut self, script: impl Into<String>) {
        self.append_scripts.push(script.into());
    }

    #[must_use]
    pub fn components(&self) -> &[(String, String)] {
        &self.components
    }

    #[must_use]
    pub fn prepended_scripts(&self) -> &[String] {
        &self.prepend_scripts
    }

    #[must_use]
    pub fn appended_scripts(&self) -> &[String] {
        &self.append_scripts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
            && self.prepend_scripts.is_empty()
            && self.append_scripts.is_empty()
    }

    /// Serialize the collected update as the response envelope.
    #[must_use]
    pub fn encode_response(&self) -> String {
        let mut out = String::with_capacity(128);
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        out.push_str("<ajax-response>");
        for script in &self.prepend_scripts {
            out.push_str("<priority-evaluate>");
            out.push_str(&encode_text(script));
            out.push_str("</priority-evaluate>");
        }
        for (id, markup) in &self.components {
            out.push_str("<component id=\"");
            out.push_str(&encode_double_quoted_attribute(id));
            out.push_str("\">");
            out.push_str(&encode_text(markup));
            out.push_str("</component>");
        }
        for script in &self.append_scripts {
            out.push_str("<evaluate>");
            out.push_str(&encode_text(script));
            out.push_str("</evaluate>");
        }
        out.push_str("</ajax-response>");
        debug!(
            components = self.components.len(),
            prepend = self.prepend_scripts.len(),
            append = self.append_scripts.len(),
            "AJAX response encoded"
        );
        out
    }
}
