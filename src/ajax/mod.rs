//! # AJAX Behavior Lifecycle
//!
//! Partial page updates: a component binds an [`AjaxBehavior`], the
//! rendered page embeds its [`callback_script`](AjaxBehavior::callback_script),
//! and when the client fires it the host routes the request to
//! [`on_request`](AjaxBehavior::on_request). The behavior fills an
//! [`AjaxRequestTarget`] with replacement markup and scripts, which encodes
//! as the XML envelope the client runtime applies to the DOM.
//!
//! Two invariants live here. The page's versioning flag is forced off for
//! the duration of a request and restored afterwards on every exit path,
//! so partial updates never pollute the page history. And the callback
//! script is assembled by one fixed rule, so decorated and undecorated
//! calls stay byte-predictable for the client runtime.

mod behavior;
mod decorator;
mod target;

pub use behavior::AjaxBehavior;
pub use decorator::{AjaxCallDecorator, ScriptDecorator, CALL_MADE_VAR};
pub use target::AjaxRequestTarget;
