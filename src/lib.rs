//! # Weft
//!
//! **Weft** is the markup core of a server-side component UI framework: templates are
//! plain HTML, and elements carrying a `weft:id` attribute become addressable components
//! that server-side code can find, replace, and re-render — whole-page or surgically over
//! AJAX.
//!
//! ## Overview
//!
//! Weft parses a markup resource into a flat element list by streaming every tokenized
//! element through an ordered chain of markup filters. Each filter recognizes one markup
//! concern — component ids, tag balance, `<weft:remove>` regions, automatic linking,
//! namespace aliases, header sections — and may keep, drop, or replace the elements it
//! sees. The chain is assembled per resource: a fixed skeleton plus extra filters enabled
//! by what kind of container owns the markup, plus any filters the caller contributes at
//! marked positions.
//!
//! On the interactive side, the [`ajax`] module gives components the request-handling
//! spine for partial updates: a behavior lifecycle that suspends page versioning while an
//! AJAX request renders, and the client-side callback script assembled from the
//! behavior's decorators.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`tokenizer`]** - Streaming HTML tokenizer producing raw text and tag elements
//! - **[`markup`]** - Element, tag, resource, and parsed-markup data model
//! - **[`parser`]** - The filter chain, the built-in filters, and the markup parser
//! - **[`settings`]** - Markup handling switches, from YAML or `WEFT_*` environment variables
//! - **[`cache`]** - Concurrent parsed-markup cache keyed by path and container type
//! - **[`watch`]** - Filesystem watching that invalidates cached markup on change
//! - **[`ajax`]** - AJAX behavior lifecycle, callback script assembly, response envelope
//! - **[`page`]** - Page versioning flag the AJAX lifecycle guards
//! - **[`cli`]** - The `weft-markup` template inspection tool
//!
//! ### Parse Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Parser as MarkupParser
//!     participant Tokenizer
//!     participant Chain as FilterChain
//!     participant Markup
//!
//!     Caller->>Parser: parse()
//!     Parser->>Chain: assemble skeleton<br/>+ container filters + extra filters
//!     loop every tokenized element
//!         Parser->>Tokenizer: next_element()
//!         Tokenizer-->>Parser: text / tag
//!         Parser->>Parser: prepare_raw()<br/>(strip comments, compress whitespace)
//!         Parser->>Chain: apply(element)
//!         Chain->>Chain: each filter keeps,<br/>drops, or replaces
//!         Chain-->>Parser: surviving elements
//!     end
//!     Parser->>Markup: from_parts(elements)
//!     Parser->>Markup: strip framework tags (optional)
//!     Parser->>Chain: post_process(markup)
//!     Chain->>Markup: resolve enclosures,<br/>locate header, check balance
//!     Parser-->>Caller: Markup
//! ```
//!
//! ### Key Architectural Patterns
//!
//! 1. **Filter Chain**: Every markup concern is a filter; order is explicit and inspectable
//! 2. **Marker-Based Insertion**: Callers position custom filters relative to built-in ones
//! 3. **Gated Assembly**: A chain-level gate can veto any filter before it joins the chain
//! 4. **Container-Driven Activation**: Page markup gets header handling, concrete containers
//!    get message tags and forced head ids
//! 5. **Guard-Scoped Versioning**: AJAX requests suspend page versioning with a drop guard,
//!    so the flag is restored even when a handler panics
//!
//! ## Quick Start
//!
//! ```no_run
//! use weft::markup::{ContainerInfo, ContainerKind, MarkupResourceStream};
//! use weft::parser::MarkupParser;
//!
//! // Load a page template
//! let resource = MarkupResourceStream::from_file("templates/checkout.html")
//!     .expect("template exists")
//!     .with_container_info(ContainerInfo::new(ContainerKind::Page, "app::CheckoutPage"));
//!
//! // Parse it through the filter chain
//! let markup = MarkupParser::new(resource).parse().expect("well-formed markup");
//!
//! // Components are addressable by id
//! for element in markup.iter() {
//!     if let Some(id) = element.as_tag().and_then(|t| t.component_id()) {
//!         println!("component: {id}");
//!     }
//! }
//! ```
//!
//! Inline markup parses without touching the filesystem:
//!
//! ```
//! use weft::markup::MarkupResourceStream;
//! use weft::parser::MarkupParser;
//!
//! let resource = MarkupResourceStream::from_string(r#"<span weft:id="name">Guest</span>"#);
//! let markup = MarkupParser::new(resource).parse().expect("parses");
//! assert!(markup.find_component("name").is_some());
//! ```
//!
//! ## Features
//!
//! - **Component Identification**: `weft:id` attributes and framework tags become components
//! - **Structural Validation**: Unbalanced markup around components fails the parse, not the render
//! - **Build-Time Regions**: `<weft:remove>` content is dropped before it reaches the page
//! - **Automatic Linking**: Relative anchors become auto-components inside `<weft:link>` regions
//! - **Namespace Aliases**: `xmlns:w="urn:weft:markup"` lets templates pick their own prefix
//! - **Header Management**: Page markup gets its `<head>` located — or synthesized — for
//!   header contributions, with stable forced ids derived from the container type
//! - **Caching and Watching**: Parsed markup is cached by content digest and invalidated
//!   from filesystem events
//! - **AJAX Lifecycle**: Versioning-safe request handling and exact callback script assembly
//!
//! ## Template Inspection
//!
//! The `weft-markup` binary shows how the pipeline sees a template:
//!
//! ```bash
//! # Raw token stream, before any filter runs
//! weft-markup tokens templates/checkout.html
//!
//! # The filter chain assembled for a page container
//! weft-markup chain templates/checkout.html --container page
//!
//! # The filtered element list, as text or JSON
//! weft-markup dump templates/checkout.html --container page --json
//! ```
//!
//! ## Concurrency
//!
//! Parsing is single-threaded per resource, but everything a host shares is safe to share:
//! [`cache::MarkupCache`] is a concurrent map handing out `Arc<Markup>` snapshots, filters
//! are `Send` so chains can be built on any thread, and the watcher invalidates the cache
//! from its own thread.

pub mod cli;

pub mod ajax;
pub mod cache;
pub mod markup;
pub mod page;
pub mod parser;
pub mod settings;
pub mod tokenizer;
pub mod watch;

pub use markup::{
    ComponentTag, ContainerInfo, ContainerKind, Markup, MarkupElement, MarkupError,
    MarkupResourceStream, TagKind,
};
pub use parser::{FilterChain, FilterGate, FilterKind, Filtered, MarkupFilter, MarkupParser};
pub use settings::MarkupSettings;
