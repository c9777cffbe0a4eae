//! # searchql-ast
//!
//! The abstract syntax tree for the labelled search DSL, plus the error
//! type shared by every stage of the pipeline (parse, fix, resolve,
//! compile).
//!
//! This crate holds data only: no parsing, no SQL generation. See
//! `searchql-parser` for turning a query string into a [`Node`] sequence,
//! and `searchql` for compiling that sequence against a model.

mod error;
mod node;
mod span;

pub use error::{Error, Reason, Result, WithErrorInfo};
pub use node::{Group, Label, Node, Regex, RegexFlag, Return, StringLit, Symbol};
pub use span::Span;
