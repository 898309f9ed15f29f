use crate::markup::{HeaderHandle, Markup, MarkupElement, MarkupError, MarkupResourceStream};
use crate::parser::chain::{FilterChain, FilterGate};
use crate::parser::filter::{FilterKind, MarkupFilter};
use crate::parser::filters::{
    AutolinkHandler, ComponentTagIdentifier, EnclosureHandler, ForcedTagIdHandler,
    HeaderSectionHandler, HtmlStructureHandler, MessageTagHandler, NamespaceAliasHandler,
    OpenCloseExpander, PathPrefixHandler, RemoveRegionHandler,
};
use crate::settings::MarkupSettings;
use crate::tokenizer::{TagSource, Tokenizer};
use once_cell::sync::Lazy;
use regex::Regex;
use std::mem;
use std::sync::Arc;
use tracing::{debug, info};

static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"[ \t]+").expect("whitespace regex must compile")
});

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"( ?[\r\n] ?)+").expect("newline regex must compile")
});

/// One-shot parser for a single markup resource.
///
/// Construction is cheap; [`parse`](Self::parse) consumes the parser,
/// assembles the filter chain for this resource, runs the stream through
/// it, and returns the finished [`Markup`].
///
/// The assembled chain always starts with the structural core — component
/// identification, balance checking, remove regions, autolinking, namespace
/// aliasing — and always ends with self-closing expansion, path prefixing,
/// and enclosure resolution. Between the two, container-owned file markup
/// gains message-tag handling and forced head ids, and page markup gains
/// header-section handling. Filters added from outside land just before
/// the path-prefix stage unless they name another position.
pub struct MarkupParser {
    resource: MarkupResourceStream,
    settings: MarkupSettings,
    gate: Option<FilterGate>,
    extra: Vec<(Box<dyn MarkupFilter>, Option<FilterKind>)>,
}

impl MarkupParser {
    #[must_use]
    pub fn new(resource: MarkupResourceStream) -> Self {
        Self {
            resource,
            settings: MarkupSettings::default(),
            gate: None,
            extra: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: MarkupSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Install an admission gate. It is consulted for every filter,
    /// including the parser's own assembly.
    #[must_use]
    pub fn with_filter_gate(mut self, gate: FilterGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Queue a filter for the default position (just before path
    /// prefixing).
    pub fn add_filter(&mut self, filter: Box<dyn MarkupFilter>) {
        self.extra.push((filter, None));
    }

    /// Queue a filter to sit immediately before the first filter of
    /// `marker` kind, or at the chain tail when no such filter is present.
    pub fn add_filter_before(&mut self, filter: Box<dyn MarkupFilter>, marker: FilterKind) {
        self.extra.push((filter, Some(marker)));
    }

    #[must_use]
    pub fn settings(&self) -> &MarkupSettings {
        &self.settings
    }

    #[must_use]
    pub fn resource(&self) -> &MarkupResourceStream {
        &self.resource
    }

    fn build_chain(
        resource: &MarkupResourceStream,
        settings: &MarkupSettings,
        gate: Option<FilterGate>,
        extra: Vec<(Box<dyn MarkupFilter>, Option<FilterKind>)>,
        header: &HeaderHandle,
    ) -> FilterChain {
        let mut chain = match gate {
            Some(gate) => FilterChain::with_gate(gate),
            None => FilterChain::new(),
        };
        let alias = settings.namespace_alias.as_str();

        // The built-in sequence is positioned by construction order, not by
        // marker lookup; the gate still gets a say on every one.
        chain.push_tail(Box::new(ComponentTagIdentifier::new(alias)));
        chain.push_tail(Box::new(HtmlStructureHandler::new()));
        chain.push_tail(Box::new(RemoveRegionHandler::new(alias)));
        chain.push_tail(Box::new(AutolinkHandler::new(
            alias,
            settings.automatic_linking,
        )));
        chain.push_tail(Box::new(NamespaceAliasHandler::new(alias)));
        if resource.has_resource() {
            if let Some(info) = resource.container_info() {
                chain.push_tail(Box::new(MessageTagHandler::new(alias)));
                if info.kind.is_page() {
                    chain.push_tail(Box::new(HeaderSectionHandler::new(Arc::clone(header))));
                }
                chain.push_tail(Box::new(ForcedTagIdHandler::new(&info.type_name)));
            } else {
                debug!(
                    resource = %resource.describe(),
                    "No container info; container filters skipped"
                );
            }
        }
        chain.push_tail(Box::new(OpenCloseExpander::new()));
        chain.push_tail(Box::new(PathPrefixHandler::new()));
        chain.push_tail(Box::new(EnclosureHandler::new(alias)));

        for (filter, marker) in extra {
            match marker {
                Some(marker) => {
                    chain.insert_before(filter, marker);
                }
                None => {
                    chain.append(filter);
                }
            }
        }
        chain
    }

    /// Apply the pre-filter raw-text settings: comment stripping and
    /// whitespace compression. Comments, declarations, and conditional
    /// comments are never whitespace-compressed; newlines survive
    /// compression so inline scripts keep their line structure.
    fn prepare_raw(settings: &MarkupSettings, element: MarkupElement) -> Option<MarkupElement> {
        let MarkupElement::Raw(text) = element else {
            return Some(element);
        };
        if text.starts_with("<!") || text.starts_with("<?") {
            if settings.strip_comments
                && text.starts_with("<!--")
                && !text.starts_with("<!--[if")
            {
                return None;
            }
            return Some(MarkupElement::Raw(text));
        }
        if settings.compress_whitespace {
            let compressed = HORIZONTAL_WS.replace_all(&text, " ");
            let compressed = NEWLINE_RUNS.replace_all(&compressed, "\n");
            return Some(MarkupElement::Raw(compressed.into_owned()));
        }
        Some(MarkupElement::Raw(text))
    }

    /// Tokenize, filter, and post-process the resource.
    pub fn parse(mut self) -> Result<Markup, MarkupError> {
        let header = HeaderHandle::default();
        let extra = mem::take(&mut self.extra);
        let gate = self.gate.take();
        let mut chain = Self::build_chain(&self.resource, &self.settings, gate, extra, &header);
        let kinds = chain.kinds();
        debug!(
            resource = %self.resource.describe(),
            filters = ?kinds,
            "Filter chain assembled"
        );

        let mut elements: Vec<MarkupElement> = Vec::new();
        {
            let mut tokenizer = Tokenizer::new(self.resource.source());
            while let Some(element) = tokenizer.next_element()? {
                let Some(element) = Self::prepare_raw(&self.settings, element) else {
                    continue;
                };
                elements.extend(chain.apply(element)?);
            }
        }

        let MarkupParser {
            resource, settings, ..
        } = self;
        let mut markup = Markup::from_parts(resource, header, elements, kinds);
        if settings.strip_framework_tags {
            markup.strip_framework_tags(&settings.namespace_alias);
        }
        chain.post_process(&mut markup)?;
        info!(
            resource = %markup.resource().describe(),
            elements = markup.len(),
            "Markup parsed"
        );
        Ok(markup)
    }
}
