use crate::ajax::decorator::{AjaxCallDecorator, CALL_MADE_VAR};
use crate::ajax::target::AjaxRequestTarget;
use crate::page::Page;
use http::Method;
use tracing::{debug, error};

/// Restores the page's versioning flag no matter how the request ends —
/// clean return, error, or panic unwinding through the responder.
struct VersioningGuard<'a> {
    page: &'a mut Page,
    saved: bool,
}

impl Drop for VersioningGuard<'_> {
    fn drop(&mut self) {
        self.page.set_versioned(self.saved);
    }
}

/// A component behavior that answers AJAX callbacks.
///
/// Implementors supply [`respond`](Self::respond) — the actual partial
/// update — and [`callback_url`](Self::callback_url), which the host's
/// routing layer derives from where the behavior is bound. Everything else
/// has defaults: the request lifecycle with its versioning discipline, and
/// the client-side callback script assembly.
pub trait AjaxBehavior: Send + Sync {
    /// URL the client invokes to reach this behavior.
    fn callback_url(&self) -> String;

    /// HTTP method for the callback. `GET` unless overridden.
    fn method(&self) -> Method {
        Method::GET
    }

    /// Decorator wrapped around the callback script, if any.
    fn call_decorator(&self) -> Option<&dyn AjaxCallDecorator> {
        None
    }

    /// Produce the partial update for one callback.
    fn respond(&self, target: &mut AjaxRequestTarget) -> anyhow::Result<()>;

    /// Run one AJAX request against `page`.
    ///
    /// Version recording is suspended for the duration — a partial update
    /// must not grow the page history — and the previous flag value is
    /// restored afterwards, including when the responder errors or panics.
    fn on_request(&self, page: &mut Page) -> anyhow::Result<AjaxRequestTarget> {
        let saved = page.is_versioned();
        page.set_versioned(false);
        let _guard = VersioningGuard { page, saved };

        debug!(url = %self.callback_url(), "AJAX request dispatched");
        let mut target = AjaxRequestTarget::new();
        if let Err(err) = self.respond(&mut target) {
            error!(error = %err, url = %self.callback_url(), "AJAX responder failed");
            return Err(err);
        }
        Ok(target)
    }

    /// The script a component embeds to trigger this behavior, built from
    /// the callback URL and the transport function matching
    /// [`method`](Self::method).
    fn callback_script(&self) -> String {
        let transport = if self.method() == Method::POST {
            "weftAjaxPost"
        } else {
            "weftAjaxGet"
        };
        self.callback_script_for(&format!("{}('{}'", transport, self.callback_url()))
    }

    /// Assemble the callback script around a partial call expression. The
    /// expression names the transport function and its opening arguments
    /// but not the closing parenthesis — the success wrapper, when the
    /// decorator supplies one, is passed as the call's final argument:
    ///
    /// ```text
    /// [before;]var weftCall=<partialCall>[, function() { success}]);[after;]
    /// ```
    ///
    /// `before` and `after` get a terminating semicolon only when they lack
    /// one; empty fragments are omitted entirely.
    fn callback_script_for(&self, partial_call: &str) -> String {
        let decorator = self.call_decorator();
        let before = decorator
            .and_then(|d| d.before_script())
            .filter(|s| !s.is_empty());
        let after = decorator
            .and_then(|d| d.after_script())
            .filter(|s| !s.is_empty());
        let success = decorator
            .and_then(|d| d.on_success_script())
            .filter(|s| !s.is_empty());

        let mut script = String::with_capacity(64 + partial_call.len());
        if let Some(before) = before {
            script.push_str(&before);
            if !before.ends_with(';') {
                script.push(';');
            }
        }
        script.push_str("var ");
        script.push_str(CALL_MADE_VAR);
        script.push('=');
        script.push_str(partial_call);
        if let Some(success) = success {
            script.push_str(", function() { ");
            script.push_str(&success);
            script.push('}');
        }
        script.push_str(");");
        if let Some(after) = after {
            script.push_str(&after);
            if !after.ends_with(';') {
                script.push(';');
            }
        }
        script
    }
}
