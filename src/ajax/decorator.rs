use std::fmt;

/// Name of the JavaScript variable the assembled callback script binds the
/// call handle to. Client code can poll it to tell whether the call fired.
pub const CALL_MADE_VAR: &str = "weftCall";

/// Supplies script fragments wrapped around a behavior's callback
/// expression.
///
/// All fragments are optional; an absent or empty fragment contributes
/// nothing to the assembled script. `before` and `after` run unconditionally
/// around the call and get a terminating semicolon when they lack one;
/// `on_success` is embedded in the call itself as its completion function.
pub trait AjaxCallDecorator: Send + Sync {
    /// Script to run before the call is made.
    fn before_script(&self) -> Option<String> {
        None
    }

    /// Script to run once the call has been issued.
    fn after_script(&self) -> Option<String> {
        None
    }

    /// Body of the completion function invoked when the partial update
    /// succeeds.
    fn on_success_script(&self) -> Option<String> {
        None
    }

    /// Failure hook for the client runtime's transport wiring. It is not
    /// part of the callback expression itself — only the success wrapper
    /// is embedded there.
    fn on_failure_script(&self) -> Option<String> {
        None
    }
}

/// Decorator built from fixed fragments, for the common case where the
/// surrounding script does not depend on request state.
#[derive(Debug, Default, Clone)]
pub struct ScriptDecorator {
    before: Option<String>,
    after: Option<String>,
    success: Option<String>,
    failure: Option<String>,
}

impl ScriptDecorator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_before(mut self, script: impl Into<String>) -> Self {
        self.before = Some(script.into());
        self
    }

    #[must_use]
    pub fn with_after(mut self, script: impl Into<String>) -> Self {
        self.after = Some(script.into());
        self
    }

    #[must_use]
    pub fn with_success(mut self, script: impl Into<String>) -> Self {
        self.success = Some(script.into());
        self
    }

    #[must_use]
    pub fn with_failure(mut self, script: impl Into<String>) -> Self {
        self.failure = Some(script.into());
        self
    }
}

impl AjaxCallDecorator for ScriptDecorator {
    fn before_script(&self) -> Option<String> {
        self.before.clone()
    }

    fn after_script(&self) -> Option<String> {
        self.after.clone()
    }

    fn on_success_script(&self) -> Option<String> {
        self.success.clone()
    }

    fn on_failure_script(&self) -> Option<String> {
        self.failure.clone()
    }
}

impl fmt::Display for ScriptDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScriptDecorator(before: {}, after: {}, success: {}, failure: {})",
            self.before.is_some(),
            self.after.is_some(),
            self.success.is_some(),
            self.failure.is_some()
        )
    }
}
