#![allow(rustdoc::bare_urls)]

//! BibTeX entry parser with macro expansion and name splitting.
//!
//! # For Library Consumers
//!
//! Most callers want [`session::ParseSession`], which bundles the macro
//! table and warning sink across a whole batch of parses. Phase modules are
//! public so advanced callers can drive them directly:
//!
//! ```rust,ignore
//! use bibtex_core::session::ParseSession;
//! use bibtex_core::postprocess::ParseOptions;
//! use bibtex_core::diagnostics::CollectingSink;
//!
//! let mut session = ParseSession::new(Box::new(CollectingSink::new()));
//! let entries = session.parse_all(source, "refs.bib", ParseOptions::default());
//! ```
//!
//! # Pipeline
//!
//! Three phases, matching the module layout: [`lexer`] (bytes to tokens),
//! [`parser`] (tokens to [`ast::Entry`] values, with entry-level error
//! recovery), and [`postprocess`] (macro expansion, concatenation,
//! whitespace collapsing), with [`macros`] holding the macro table that
//! ties `@string` definitions to later expansion. [`name`] is a separate
//! subsystem for splitting and formatting author/editor name lists, used
//! downstream of a parsed `author` or `editor` field.

pub mod ascii;
pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod macros;
pub mod name;
pub mod parser;
pub mod postprocess;
pub mod session;

pub use ast::{Entry, EntryMetatype, Field, SimpleValue, Value};
pub use diagnostics::{CollectingSink, Severity, Warning, WarningSink};
pub use macros::MacroTable;
pub use name::{format_name, split_list, split_name, split_names, Name, NameFormat, StringList};
pub use postprocess::{post_process_value, ParseOptions};
pub use session::ParseSession;
