use crate::markup::{Markup, MarkupElement, MarkupError, TagKind};
use crate::parser::filters::is_void_element;
use crate::parser::{FilterKind, Filtered, MarkupFilter};
use tracing::warn;

struct OpenEntry {
    name: String,
    line: usize,
    column: usize,
    component: bool,
}

/// Checks tag balance as the stream goes by.
///
/// Hand-written templates are full of harmless nesting mistakes, so plain
/// HTML problems only produce warnings after the parse. Component tags are
/// different: a component whose open tag never closes cannot be rendered,
/// so those fail the parse. Void elements written as open tags (`<br>`)
/// are rewritten to self-closing so they never land on the stack.
pub struct HtmlStructureHandler {
    stack: Vec<OpenEntry>,
    complaints: Vec<String>,
}

impl HtmlStructureHandler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            complaints: Vec::new(),
        }
    }
}

impl Default for HtmlStructureHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupFilter for HtmlStructureHandler {
    fn kind(&self) -> FilterKind {
        FilterKind::HtmlStructure
    }

    fn on_element(&mut self, mut element: MarkupElement) -> Result<Filtered, MarkupError> {
        let Some(tag) = element.as_tag_mut() else {
            return Ok(Filtered::Keep(element));
        };
        match tag.kind {
            TagKind::Open => {
                if tag.namespace.is_none() && is_void_element(&tag.name) {
                    tag.kind = TagKind::OpenClose;
                } else {
                    self.stack.push(OpenEntry {
                        name: tag.qualified_name().to_ascii_lowercase(),
                        line: tag.line,
                        column: tag.column,
                        component: tag.is_component(),
                    });
                }
            }
            TagKind::Close => {
                let name = tag.qualified_name().to_ascii_lowercase();
                match self.stack.iter().rposition(|entry| entry.name == name) {
                    Some(index) => {
                        // Anything above the match is implicitly closed.
                        for entry in self.stack.drain(index + 1..) {
                            if entry.component {
                                return Err(MarkupError::filter(
                                    FilterKind::HtmlStructure,
                                    format!(
                                        "component tag <{}> opened at {}:{} closed implicitly by </{}>",
                                        entry.name, entry.line, entry.column, name
                                    ),
                                ));
                            }
                            self.complaints.push(format!(
                                "<{}> opened at {}:{} implicitly closed by </{}>",
                                entry.name, entry.line, entry.column, name
                            ));
                        }
                        self.stack.pop();
                    }
                    None => {
                        self.complaints.push(format!(
                            "stray close tag </{}> at {}:{}",
                            name, tag.line, tag.column
                        ));
                    }
                }
            }
            TagKind::OpenClose => {}
        }
        Ok(Filtered::Keep(element))
    }

    fn post_process(&mut self, markup: &mut Markup) -> Result<(), MarkupError> {
        for entry in self.stack.drain(..) {
            if entry.component {
                return Err(MarkupError::filter(
                    FilterKind::HtmlStructure,
                    format!(
                        "component tag <{}> opened at {}:{} is never closed",
                        entry.name, entry.line, entry.column
                    ),
                ));
            }
            self.complaints.push(format!(
                "unclosed <{}> opened at {}:{}",
                entry.name, entry.line, entry.column
            ));
        }
        for complaint in self.complaints.drain(..) {
            warn!(
                resource = %markup.resource().describe(),
                "{}", complaint
            );
        }
        Ok(())
    }
}
