//! # Command Line Interface
//!
//! Template inspection for development, available as the `weft-markup`
//! binary.
//!
//! ## Commands
//!
//! ### `tokens`
//!
//! Print the raw element stream the tokenizer produces, before any filter
//! has run:
//!
//! ```bash
//! weft-markup tokens templates/HomePage.html
//! ```
//!
//! ### `chain`
//!
//! Show the filter chain assembled for a resource. Container kind and type
//! matter — they decide which filters activate:
//!
//! ```bash
//! weft-markup chain templates/HomePage.html --container page
//! weft-markup chain templates/NavPanel.html --container panel
//! ```
//!
//! ### `dump`
//!
//! Run a full parse and print the filtered element list, one line per
//! element or as JSON:
//!
//! ```bash
//! weft-markup dump templates/HomePage.html --container page --json
//! ```
//!
//! Settings come from `WEFT_*` environment variables, or from a YAML file
//! passed with `--config`.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands, ContainerArg};
