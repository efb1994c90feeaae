// Library code reports through tracing; hosts may own the terminal.
#![deny(clippy::print_stderr)]

//! Tagged template detection for JavaScript and TypeScript documents.
//!
//! Documents are parsed with tree-sitter according to their [`Dialect`] and
//! walked in source order. Every `tag\`...\`` whose tag is a bare identifier
//! present in the caller's [`AllowList`] yields a [`TaggedSpan`] covering the
//! template body between the backticks.
//!
//! # Architecture
//!
//! * [`dialect`]: JS/JSX/TS/TSX variants and their grammars
//! * [`document`]: Borrowed document snapshot with offset-to-position mapping
//! * [`extract`]: The traversal producing tagged spans
//!
//! [`AllowList`]: tagtint_primitives::AllowList
//! [`TaggedSpan`]: tagtint_primitives::TaggedSpan

pub mod dialect;
pub mod document;
pub mod extract;

pub use dialect::{Dialect, UnknownDialect};
pub use document::SourceDocument;
pub use extract::{ExtractError, ExtractOptions, extract_tagged_spans, try_extract_tagged_spans, try_extract_tagged_spans_with};
