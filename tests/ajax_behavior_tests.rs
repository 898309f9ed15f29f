use std::panic::{catch_unwind, AssertUnwindSafe};

use http::Method;
use weft::ajax::{AjaxBehavior, AjaxCallDecorator, AjaxRequestTarget, ScriptDecorator};
use weft::page::Page;

use tracing_util::TestTracing;

/// Behavior with a fixed URL and no decoration; the respond body is
/// irrelevant for script-assembly tests.
struct PlainBehavior {
    url: &'static str,
    method: Method,
}

impl PlainBehavior {
    fn get(url: &'static str) -> Self {
        Self {
            url,
            method: Method::GET,
        }
    }

    fn post(url: &'static str) -> Self {
        Self {
            url,
            method: Method::POST,
        }
    }
}

impl AjaxBehavior for PlainBehavior {
    fn callback_url(&self) -> String {
        self.url.to_string()
    }

    fn method(&self) -> Method {
        self.method.clone()
    }

    fn respond(&self, _target: &mut AjaxRequestTarget) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Behavior carrying a [`ScriptDecorator`] so assembly tests can vary the
/// surrounding fragments.
struct DecoratedBehavior {
    decorator: ScriptDecorator,
}

impl DecoratedBehavior {
    fn new(decorator: ScriptDecorator) -> Self {
        Self { decorator }
    }
}

impl AjaxBehavior for DecoratedBehavior {
    fn callback_url(&self) -> String {
        "/cb/1".to_string()
    }

    fn call_decorator(&self) -> Option<&dyn AjaxCallDecorator> {
        Some(&self.decorator)
    }

    fn respond(&self, _target: &mut AjaxRequestTarget) -> anyhow::Result<()> {
        Ok(())
    }
}

#[test]
fn test_callback_script_uses_get_transport_by_default() {
    let behavior = PlainBehavior::get("/cb/1");
    assert_eq!(behavior.callback_script(), "var weftCall=weftAjaxGet('/cb/1');");
}

#[test]
fn test_callback_script_switches_to_post_transport() {
    let behavior = PlainBehavior::post("/cb/submit");
    assert_eq!(
        behavior.callback_script(),
        "var weftCall=weftAjaxPost('/cb/submit');"
    );
}

#[test]
fn test_success_fragment_becomes_completion_function() {
    let behavior =
        DecoratedBehavior::new(ScriptDecorator::new().with_success("markDone();"));
    assert_eq!(
        behavior.callback_script(),
        "var weftCall=weftAjaxGet('/cb/1', function() { markDone();});"
    );
}

#[test]
fn test_before_and_after_gain_terminating_semicolons() {
    let behavior = DecoratedBehavior::new(
        ScriptDecorator::new()
            .with_before("setup()")
            .with_after("teardown()"),
    );
    assert_eq!(
        behavior.callback_script(),
        "setup();var weftCall=weftAjaxGet('/cb/1');teardown();"
    );
}

#[test]
fn test_existing_semicolons_are_not_doubled() {
    let behavior = DecoratedBehavior::new(
        ScriptDecorator::new()
            .with_before("setup();")
            .with_after("teardown();"),
    );
    assert_eq!(
        behavior.callback_script(),
        "setup();var weftCall=weftAjaxGet('/cb/1');teardown();"
    );
}

#[test]
fn test_empty_fragments_contribute_nothing() {
    let behavior = DecoratedBehavior::new(
        ScriptDecorator::new()
            .with_before("")
            .with_after("")
            .with_success(""),
    );
    assert_eq!(behavior.callback_script(), "var weftCall=weftAjaxGet('/cb/1');");
}

#[test]
fn test_failure_fragment_stays_out_of_the_script() {
    let decorator = ScriptDecorator::new()
        .with_success("refreshCart();")
        .with_failure("alert('cart refresh failed')");
    assert_eq!(
        decorator.on_failure_script().as_deref(),
        Some("alert('cart refresh failed')")
    );

    let behavior = DecoratedBehavior::new(decorator);
    let script = behavior.callback_script();
    assert!(script.contains("refreshCart();"));
    assert!(!script.contains("cart refresh failed"));
}

#[test]
fn test_fully_decorated_script_orders_fragments() {
    let behavior = DecoratedBehavior::new(
        ScriptDecorator::new()
            .with_before("spinner.show()")
            .with_success("spinner.hide();")
            .with_after("focusRestore();"),
    );
    assert_eq!(
        behavior.callback_script(),
        "spinner.show();var weftCall=weftAjaxGet('/cb/1', function() { spinner.hide();});focusRestore();"
    );
}

#[test]
fn test_callback_script_for_accepts_custom_partial_call() {
    let behavior = PlainBehavior::get("/cb/1");
    let script = behavior.callback_script_for("weftAjaxPost('/cb/1', form.serialize()");
    assert_eq!(
        script,
        "var weftCall=weftAjaxPost('/cb/1', form.serialize());"
    );
}

/// Responder that fills the target like a real partial update would.
struct CartRefresh;

impl AjaxBehavior for CartRefresh {
    fn callback_url(&self) -> String {
        "/cb/cart".to_string()
    }

    fn respond(&self, target: &mut AjaxRequestTarget) -> anyhow::Result<()> {
        target.prepend_script("cart.lock()".to_string());
        target.add_component("cart", "<div>3 items</div>");
        target.append_script("cart.unlock()".to_string());
        Ok(())
    }
}

#[test]
fn test_on_request_runs_responder_and_restores_versioning() {
    let mut page = Page::new();
    assert!(page.is_versioned());

    let target = CartRefresh.on_request(&mut page).expect("responder succeeds");
    assert!(page.is_versioned());

    let body = target.encode_response();
    let lock = body.find("cart.lock()").unwrap();
    let component = body.find("&lt;div&gt;3 items&lt;/div&gt;").unwrap();
    let unlock = body.find("cart.unlock()").unwrap();
    assert!(lock < component && component < unlock);
}

#[test]
fn test_on_request_preserves_an_unversioned_page() {
    let mut page = Page::new();
    page.set_versioned(false);

    CartRefresh.on_request(&mut page).expect("responder succeeds");
    assert!(!page.is_versioned());
}

struct FailingBehavior;

impl AjaxBehavior for FailingBehavior {
    fn callback_url(&self) -> String {
        "/cb/fails".to_string()
    }

    fn respond(&self, _target: &mut AjaxRequestTarget) -> anyhow::Result<()> {
        anyhow::bail!("backing store unavailable")
    }
}

#[test]
fn test_versioning_restored_when_responder_errors() {
    let _tracing = TestTracing::init();

    let mut page = Page::new();
    let err = FailingBehavior.on_request(&mut page).unwrap_err();
    assert!(err.to_string().contains("backing store unavailable"));
    assert!(page.is_versioned());
}

struct PanickingBehavior;

impl AjaxBehavior for PanickingBehavior {
    fn callback_url(&self) -> String {
        "/cb/panics".to_string()
    }

    fn respond(&self, _target: &mut AjaxRequestTarget) -> anyhow::Result<()> {
        panic!("responder blew up");
    }
}

#[test]
fn test_versioning_restored_when_responder_panics() {
    let mut page = Page::new();
    let outcome = catch_unwind(AssertUnwindSafe(|| PanickingBehavior.on_request(&mut page)));
    assert!(outcome.is_err());
    assert!(page.is_versioned());
}
