//! Error type produced by the parser, fixer, resolver and compiler.

use std::fmt::{self, Debug};

use crate::Span;

/// One of the failure kinds §7 of the language contract names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reason {
    /// Malformed string, regex, label or return clause.
    Parse(String),
    /// Bad placement of AND/OR/NOT.
    Joiner(String),
    /// The resolver could not find a path segment.
    UnknownField { path: String, model: String },
    /// The operator selector saw a type it cannot query.
    UnsupportedType { field: String, reason: String },
    /// A bare symbol had no bound field and did not resolve to a reference.
    UnlabeledSymbol(String),
    /// `order_dir` was not one of `ASC`/`DESC`.
    OrderDirection(String),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Parse(msg) => write!(f, "{msg}"),
            Reason::Joiner(msg) => write!(f, "{msg}"),
            Reason::UnknownField { path, model } => {
                write!(f, "no field `{path}` on model `{model}`")
            }
            Reason::UnsupportedType { field, reason } => {
                write!(f, "cannot query field `{field}`: {reason}")
            }
            Reason::UnlabeledSymbol(value) => {
                write!(f, "unlabeled symbol cannot be matched: `{value}`")
            }
            Reason::OrderDirection(value) => {
                write!(f, "order_dir must be ASC or DESC, got `{value}`")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub reason: Reason,
    pub span: Option<Span>,
    pub hints: Vec<String>,
}

impl Error {
    pub fn new(reason: Reason) -> Self {
        Error {
            reason,
            span: None,
            hints: Vec::new(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)?;
        if let Some(span) = self.span {
            write!(f, " (at {span:?})")?;
        }
        for hint in &self.hints {
            write!(f, "\n  hint: {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

pub trait WithErrorInfo: Sized {
    fn with_span(self, span: Option<Span>) -> Self;
    fn push_hint<S: Into<String>>(self, hint: S) -> Self;
}

impl WithErrorInfo for Error {
    fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    fn push_hint<S: Into<String>>(mut self, hint: S) -> Self {
        self.hints.push(hint.into());
        self
    }
}

impl<T> WithErrorInfo for Result<T, Error> {
    fn with_span(self, span: Option<Span>) -> Self {
        self.map_err(|e| e.with_span(span))
    }

    fn push_hint<S: Into<String>>(self, hint: S) -> Self {
        self.map_err(|e| e.push_hint(hint))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
