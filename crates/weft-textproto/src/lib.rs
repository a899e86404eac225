//! Semantic cross-reference analyzer for textproto files.
//!
//! Given a populated message, its schema descriptors, and the parser's
//! location tree, the analyzer walks all three in lockstep and emits anchor
//! nodes plus `ref` edges linking every field occurrence, type URL, and
//! schema-comment directive in the input to the schema entity it names.
//!
//! [`analyze_compilation`] is the entry point for one indexing job; the
//! upstream schema compiler, textproto parser, and wire decoder are supplied
//! through the `weft_proto::frontend` traits.

pub mod analyzer;
mod driver;
mod error;
pub mod identity;
pub mod paths;
pub mod schema_comments;

pub use analyzer::{TextprotoAnalyzer, TEXTPROTO_LANGUAGE};
pub use driver::analyze_compilation;
pub use error::{AnalyzeError, Result};
