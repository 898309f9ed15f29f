//! # Markup Filter Pipeline
//!
//! The processing side of the crate: a [`MarkupParser`] pulls elements from
//! a tokenizer and pushes each one through an ordered [`FilterChain`] of
//! [`MarkupFilter`]s. Filters rewrite tags in place, drop regions, or
//! expand one element into several; a post-processing pass then lets each
//! filter fix up whatever needed final element positions.
//!
//! Which filters run depends on what is being parsed: inline strings get
//! the structural core, file-backed container markup adds localization and
//! header handling, and page markup adds header synthesis. Host
//! applications hang their own filters onto the chain with
//! [`MarkupParser::add_filter`], and can veto assembly-time filters with a
//! [`FilterGate`].

mod chain;
mod core;
mod filter;
pub mod filters;

pub use chain::{FilterChain, FilterGate};
pub use core::MarkupParser;
pub use filter::{FilterKind, Filtered, MarkupFilter};
