use weft::markup::{ContainerInfo, ContainerKind, MarkupResourceStream};
use weft::{FilterKind, Markup, MarkupElement, MarkupError, MarkupParser, MarkupSettings};

mod common;
use common::temp_files;
use tracing_util::TestTracing;

fn parse_inline(source: &str) -> Markup {
    MarkupParser::new(MarkupResourceStream::from_string(source))
        .parse()
        .expect("markup parses")
}

fn parse_inline_with(settings: MarkupSettings, source: &str) -> Markup {
    MarkupParser::new(MarkupResourceStream::from_string(source))
        .with_settings(settings)
        .parse()
        .expect("markup parses")
}

fn parse_container(source: &str, kind: ContainerKind, type_name: &str) -> Result<Markup, MarkupError> {
    let path = temp_files::create_temp_markup(source);
    let resource = MarkupResourceStream::from_file(&path)
        .expect("temp markup readable")
        .with_container_info(ContainerInfo::new(kind, type_name));
    let result = MarkupParser::new(resource).parse();
    temp_files::cleanup_temp_files(&[path]);
    result
}

fn tag_named<'a>(markup: &'a Markup, name: &str) -> &'a weft::ComponentTag {
    markup
        .iter()
        .filter_map(MarkupElement::as_tag)
        .find(|tag| tag.name == name && !tag.is_close())
        .unwrap_or_else(|| panic!("no <{name}> tag in markup"))
}

#[test]
fn test_component_ids_identified() {
    let markup = parse_inline(r#"<div><span weft:id="user">x</span></div>"#);
    let index = markup.find_component("user").expect("component found");
    let tag = markup.get(index).and_then(MarkupElement::as_tag).unwrap();
    assert!(tag.is_component());
    assert_eq!(tag.component_id(), Some("user"));
    assert!(!tag.is_auto());
}

#[test]
fn test_remove_region_drops_content_inclusively() {
    let markup = parse_inline("<div><weft:remove><p>mockup</p></weft:remove>kept</div>");
    assert_eq!(markup.to_string(), "<div>kept</div>");
}

#[test]
fn test_remove_region_rejects_component_inside() {
    let result = MarkupParser::new(MarkupResourceStream::from_string(
        r#"<weft:remove><span weft:id="oops">x</span></weft:remove>"#,
    ))
    .parse();
    match result {
        Err(MarkupError::Filter { filter, .. }) => {
            assert_eq!(filter, FilterKind::RemoveRegion);
        }
        other => panic!("expected remove-region failure, got {other:?}"),
    }
}

#[test]
fn test_unclosed_component_fails_parse() {
    let result = MarkupParser::new(MarkupResourceStream::from_string(
        r#"<div><span weft:id="value">x</div>"#,
    ))
    .parse();
    match result {
        Err(MarkupError::Filter { filter, .. }) => {
            assert_eq!(filter, FilterKind::HtmlStructure);
        }
        other => panic!("expected structure failure, got {other:?}"),
    }
}

#[test]
fn test_unclosed_plain_tag_is_tolerated() {
    // Hand-written HTML is full of these; they warn but do not fail.
    let markup = parse_inline("<div><b>bold text</div>");
    assert_eq!(markup.to_string(), "<div><b>bold text</div>");
}

#[test]
fn test_void_elements_need_no_close() {
    let markup = parse_inline(r#"<div><br><img src="logo.png"></div>"#);
    assert!(tag_named(&markup, "br").is_open_close());
    let img = tag_named(&markup, "img");
    assert!(img.is_open_close());
    // A relative src is flagged for the host's path rewriting.
    assert_eq!(img.relative_path_attributes(), ["src"]);
}

#[test]
fn test_absolute_references_are_not_flagged() {
    let markup = parse_inline(r#"<img src="https://cdn.example.org/logo.png">"#);
    assert!(tag_named(&markup, "img").relative_path_attributes().is_empty());
}

#[test]
fn test_self_closing_plain_tags_are_expanded() {
    let markup = parse_inline(r#"<div id="box"/><p>x</p>"#);
    let open = markup.get(0).and_then(MarkupElement::as_tag).unwrap();
    assert!(open.is_open());
    let close = markup.get(1).and_then(MarkupElement::as_tag).unwrap();
    assert!(close.is_close());
    assert!(close.is_synthetic());
    assert_eq!(markup.to_string(), r#"<div id="box"></div><p>x</p>"#);
}

#[test]
fn test_enclosure_controller_resolved_end_to_end() {
    let _tracing = TestTracing::init();
    let markup = parse_inline(
        r#"<weft:enclosure><h3>Details</h3><div weft:id="details">body</div></weft:enclosure>"#,
    );
    let open = markup.get(0).and_then(MarkupElement::as_tag).unwrap();
    assert_eq!(open.component_id(), Some("_enclosure_0"));
    assert!(open.is_auto());
    assert_eq!(open.get_attribute("child"), Some("details"));
}

#[test]
fn test_empty_enclosure_fails() {
    let result =
        MarkupParser::new(MarkupResourceStream::from_string("<weft:enclosure/>")).parse();
    assert!(result.is_err());
}

#[test]
fn test_enclosure_controlled_by_self_closing_component() {
    // The expander splits the shorthand into an open/close pair before the
    // enclosure handler runs, so the component still resolves as controller.
    let markup = parse_inline(r#"<weft:enclosure><span weft:id="status"/></weft:enclosure>"#);
    let open = markup.get(0).and_then(MarkupElement::as_tag).unwrap();
    assert_eq!(open.get_attribute("child"), Some("status"));
    let close = markup.get(2).and_then(MarkupElement::as_tag).unwrap();
    assert!(close.is_close());
    assert!(close.is_synthetic());
    assert_eq!(close.name, "span");
}

#[test]
fn test_link_region_promotes_relative_anchors() {
    let markup =
        parse_inline(r#"<weft:link><a href="about.html">About</a></weft:link>"#);
    let index = markup.find_component("_autolink_0").expect("anchor promoted");
    let anchor = markup.get(index).and_then(MarkupElement::as_tag).unwrap();
    assert_eq!(anchor.name, "a");
    assert!(anchor.is_auto());
}

#[test]
fn test_automatic_linking_needs_no_region() {
    let settings = MarkupSettings {
        automatic_linking: true,
        ..MarkupSettings::default()
    };
    let markup = parse_inline_with(settings, r#"<a href="about.html">About</a>"#);
    assert!(markup.find_component("_autolink_0").is_some());

    // Absolute references never autolink.
    let settings = MarkupSettings {
        automatic_linking: true,
        ..MarkupSettings::default()
    };
    let markup = parse_inline_with(settings, r#"<a href="https://example.org">Out</a>"#);
    assert!(markup.find_component("_autolink_0").is_none());
}

#[test]
fn test_namespace_alias_end_to_end() {
    let markup = parse_inline(
        r#"<div xmlns:w="urn:weft:markup"><w:panel>P</w:panel><span w:id="s">y</span></div>"#,
    );

    // The declaration is consumed
    let div = tag_named(&markup, "div");
    assert_eq!(div.get_attribute("xmlns:w"), None);

    // Aliased framework tag rewritten to the canonical namespace
    let panel = tag_named(&markup, "panel");
    assert_eq!(panel.namespace.as_deref(), Some("weft"));
    assert!(panel.is_auto());

    // Aliased id attribute promotes the carrying tag
    let index = markup.find_component("s").expect("aliased component found");
    let span = markup.get(index).and_then(MarkupElement::as_tag).unwrap();
    assert_eq!(span.get_attribute("weft:id"), Some("s"));
}

#[test]
fn test_message_tag_in_container_markup() {
    let markup = parse_container(
        r#"<weft:message key="cart.empty">Your cart is empty</weft:message>"#,
        ContainerKind::Panel,
        "app::CartPanel",
    )
    .expect("message markup parses");
    let tag = markup.get(0).and_then(MarkupElement::as_tag).unwrap();
    assert_eq!(tag.component_id(), Some("_message_0"));
    assert!(tag.is_auto());
}

#[test]
fn test_message_tag_without_key_fails() {
    let result = parse_container(
        "<weft:message>fallback</weft:message>",
        ContainerKind::Panel,
        "app::CartPanel",
    );
    match result {
        Err(MarkupError::Filter { filter, .. }) => assert_eq!(filter, FilterKind::MessageTag),
        other => panic!("expected message-tag failure, got {other:?}"),
    }
}

#[test]
fn test_malformed_message_binding_fails() {
    let result = parse_container(
        r#"<input type="submit" weft:message="value"/>"#,
        ContainerKind::Panel,
        "app::CartPanel",
    );
    assert!(result.is_err());
}

#[test]
fn test_page_head_is_located_and_marked() {
    let markup = parse_container(
        "<html><head><title>T</title></head><body></body></html>",
        ContainerKind::Page,
        "app::HomePage",
    )
    .expect("page parses");
    let index = markup.header_index().expect("head located");
    assert!(!markup.header_synthesized());
    let head = markup.get(index).and_then(MarkupElement::as_tag).unwrap();
    assert_eq!(head.name, "head");
    assert_eq!(head.component_id(), Some("_header_"));
    assert!(head.is_auto());
}

#[test]
fn test_headless_page_gets_synthesized_head() {
    let markup = parse_container(
        r#"<html><body><span weft:id="x">y</span></body></html>"#,
        ContainerKind::Page,
        "app::HomePage",
    )
    .expect("page parses");
    let index = markup.header_index().expect("head synthesized");
    assert!(markup.header_synthesized());
    let head = markup.get(index).and_then(MarkupElement::as_tag).unwrap();
    assert!(head.is_synthetic());
    assert_eq!(head.component_id(), Some("_header_"));
    let close = markup.get(index + 1).and_then(MarkupElement::as_tag).unwrap();
    assert!(close.is_close());
    assert_eq!(close.name, "head");
}

#[test]
fn test_head_elements_get_forced_ids() {
    let markup = parse_container(
        r#"<html><head><title>T</title><script src="app.js"></script></head><body><div>x</div></body></html>"#,
        ContainerKind::Page,
        "app::checkout::CheckoutPage",
    )
    .expect("page parses");

    assert_eq!(
        tag_named(&markup, "title").get_attribute("id"),
        Some("wh-checkoutpage-0")
    );
    assert_eq!(
        tag_named(&markup, "script").get_attribute("id"),
        Some("wh-checkoutpage-1")
    );
    // Body content is not touched
    assert_eq!(tag_named(&markup, "div").get_attribute("id"), None);
}

#[test]
fn test_strip_framework_tags_keeps_components() {
    let settings = MarkupSettings {
        strip_framework_tags: true,
        ..MarkupSettings::default()
    };
    let markup = parse_inline_with(
        settings,
        r#"<weft:link><a href="a.html">A</a></weft:link>"#,
    );
    // Region markers are gone; the promoted anchor stays.
    assert_eq!(markup.to_string(), r#"<a href="a.html">A</a>"#);
    assert!(markup.find_component("_autolink_0").is_some());
}

#[test]
fn test_strip_framework_tags_keeps_enclosures() {
    let settings = MarkupSettings {
        strip_framework_tags: true,
        ..MarkupSettings::default()
    };
    let markup = parse_inline_with(
        settings,
        r#"<weft:enclosure><div weft:id="d">x</div></weft:enclosure>"#,
    );
    // Enclosures carry a component id, so stripping leaves them in place
    // and the controller still resolves.
    let open = markup.get(0).and_then(MarkupElement::as_tag).unwrap();
    assert_eq!(open.name, "enclosure");
    assert_eq!(open.get_attribute("child"), Some("d"));
}

#[test]
fn test_comment_stripping() {
    let settings = MarkupSettings {
        strip_comments: true,
        ..MarkupSettings::default()
    };
    let markup = parse_inline_with(settings, "<div><!-- designer note -->x</div>");
    assert_eq!(markup.to_string(), "<div>x</div>");

    let settings = MarkupSettings {
        strip_comments: true,
        ..MarkupSettings::default()
    };
    let markup = parse_inline_with(settings, "<div><!--[if lt IE 9]>s<![endif]-->x</div>");
    assert!(markup.to_string().contains("<!--[if lt IE 9]>"));
}

#[test]
fn test_whitespace_compression() {
    let settings = MarkupSettings {
        compress_whitespace: true,
        ..MarkupSettings::default()
    };
    let markup = parse_inline_with(settings, "<div>a   b\t\tc</div>");
    assert_eq!(markup.to_string(), "<div>a b c</div>");
}

#[test]
fn test_display_preserves_source_shape() {
    let source = r#"<div class="a" data-x="1">text</div>"#;
    assert_eq!(parse_inline(source).to_string(), source);
}

#[test]
fn test_serializable_dump_shape() {
    let markup = parse_inline(r#"<span weft:id="n">x</span>"#);
    let value = serde_json::to_value(markup.to_serializable()).expect("serializes");
    assert_eq!(value["resource"], "<inline>");
    assert!(value["elements"].is_array());
    assert!(value["filters"]
        .as_array()
        .expect("filter list")
        .iter()
        .any(|f| f == "component-tag-identifier"));
}

#[test]
fn test_unknown_framework_tag_fails() {
    let result =
        MarkupParser::new(MarkupResourceStream::from_string("<weft:pannel>x</weft:pannel>"))
            .parse();
    match result {
        Err(MarkupError::Filter { filter, .. }) => {
            assert_eq!(filter, FilterKind::ComponentTagIdentifier);
        }
        other => panic!("expected identifier failure, got {other:?}"),
    }
}

#[test]
fn test_syntax_error_carries_position() {
    let result = MarkupParser::new(MarkupResourceStream::from_string("<div class=\"x\"")).parse();
    match result {
        Err(MarkupError::Syntax { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected syntax error, got {other:?}"),
    }
}
