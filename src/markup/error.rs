use crate::parser::FilterKind;
use std::fmt;
use std::io;

/// Errors raised while loading, tokenizing, or filtering markup.
#[derive(Debug)]
pub enum MarkupError {
    /// The tokenizer could not make sense of the source document.
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    /// A filter rejected the stream (unknown framework tag, component inside
    /// a removed region, unterminated region, …).
    Filter {
        filter: FilterKind,
        message: String,
    },
    /// The markup resource could not be read.
    Io(io::Error),
}

impl MarkupError {
    /// Shorthand used by the tokenizer.
    pub(crate) fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        MarkupError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    /// Shorthand used by filters.
    pub(crate) fn filter(filter: FilterKind, message: impl Into<String>) -> Self {
        MarkupError::Filter {
            filter,
            message: message.into(),
        }
    }
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupError::Syntax {
                line,
                column,
                message,
            } => write!(f, "markup syntax error at {}:{}: {}", line, column, message),
            MarkupError::Filter { filter, message } => {
                write!(f, "markup filter '{}' failed: {}", filter, message)
            }
            MarkupError::Io(err) => write!(f, "markup resource error: {}", err),
        }
    }
}

impl std::error::Error for MarkupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarkupError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for MarkupError {
    fn from(err: io::Error) -> Self {
        MarkupError::Io(err)
    }
}
