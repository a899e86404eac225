//! Input-side data model for the Weft analyzer.
//!
//! The analyzer consumes three parallel structures produced upstream: the
//! schema descriptors ([`DescriptorPool`]), the populated value tree
//! ([`MessageValue`]), and the parser's location tree ([`LocationTree`]).
//! The components producing them (schema compiler, textproto parser, wire
//! decoder) stay external; [`frontend`] defines their interfaces.

mod descriptor;
pub mod frontend;
mod location;
mod value;

pub use descriptor::{DescriptorPool, FieldDescriptor, FieldKind, MessageDescriptor, MessageId};
pub use frontend::{
    FrontendError, ParseOptions, ParsedTextproto, SchemaCompiler, SchemaSource, TextFormatParser,
    WireDecoder,
};
pub use location::LocationTree;
pub use value::{FieldEntry, MessageValue, Value, NON_REPEATED_INDEX};
