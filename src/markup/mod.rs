//! # Markup Model
//!
//! The data side of the markup pipeline: tags and raw segments
//! ([`MarkupElement`]), the parsed document ([`Markup`]), the source plus
//! its container metadata ([`MarkupResourceStream`]), and the errors the
//! pipeline raises ([`MarkupError`]).
//!
//! Templates address components through a namespaced id attribute:
//!
//! ```html
//! <html xmlns:weft="urn:weft:markup">
//!   <body>
//!     <span weft:id="greeting">placeholder</span>
//!   </body>
//! </html>
//! ```
//!
//! The parser turns this into a flat element list where the `<span>` tag is
//! a component tag with id `greeting`. Renderers and the AJAX layer work
//! against that list, never the source text.

mod element;
mod error;
mod model;
mod resource;

pub use element::{AttrVec, ComponentTag, MarkupElement, TagKind, MAX_INLINE_ATTRS};
pub use error::MarkupError;
pub use model::{HeaderHandle, HeaderMarks, Markup, MarkupDump};
pub use resource::{ContainerInfo, ContainerKind, MarkupResourceStream};

pub(crate) use model::is_open_tag;

/// Default namespace prefix for framework tags and attributes
/// (`<weft:panel>`, `weft:id="…"`).
pub const DEFAULT_NAMESPACE: &str = "weft";

/// Namespace URI that marks an `xmlns:` declaration as a framework alias.
/// Any prefix bound to a URI starting with this value is treated as an
/// alias of the canonical namespace.
pub const NAMESPACE_URI: &str = "urn:weft:markup";

/// Name of the component id attribute within the framework namespace.
pub const ID_ATTRIBUTE: &str = "id";
