//! # searchql
//!
//! The schema-driven compiler half of the pipeline: given an AST (from
//! `searchql-parser`) and a declared [`Model`], produces parameterized
//! PostgreSQL-dialect SQL.
//!
//! The crate is pure, synchronous, and allocation-only — no I/O, no
//! locks, no async runtime. [`compile_query`] is the single entry point;
//! everything else is support machinery for it.

pub mod compile;
pub mod decode;
pub mod fixtures;
pub mod model;
pub mod operator;
pub mod resolve;
pub mod value;

pub use compile::{compile_query, CompileOptions, CompiledQuery, OrderDir};
pub use model::{FieldDef, FieldType, Model, RefDef};
pub use resolve::{resolve_field, Resolved};
pub use value::SqlValue;
