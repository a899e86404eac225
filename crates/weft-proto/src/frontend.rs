//! Interfaces to the upstream schema compiler, textproto parser, and wire
//! decoder.
//!
//! The analyzer never reads schema source or textproto syntax itself; it
//! consumes the outputs of these collaborators and stays agnostic to how
//! they are produced.

use crate::{DescriptorPool, LocationTree, MessageId, MessageValue};

/// One schema source handed to the compiler, addressed by the path the
/// compiler's import resolution sees (search-path relative).
#[derive(Debug, Clone)]
pub struct SchemaSource {
    pub path: String,
    pub content: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FrontendError(pub String);

impl FrontendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Builds a descriptor pool from schema sources.
pub trait SchemaCompiler {
    fn compile(&self, sources: &[SchemaSource]) -> Result<DescriptorPool, FrontendError>;
}

/// Parser controls. The indexer always runs permissive so partially
/// ill-formed inputs still yield the parts that are good.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub allow_partial: bool,
    pub allow_unknown_extensions: bool,
}

/// Output of a textproto parse: the populated value tree and the location
/// tree recording where each field occurrence starts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTextproto {
    pub value: MessageValue,
    pub locations: LocationTree,
}

/// Parses textproto input against a root message type.
pub trait TextFormatParser {
    fn parse(
        &self,
        text: &str,
        pool: &DescriptorPool,
        root: MessageId,
        options: ParseOptions,
    ) -> Result<ParsedTextproto, FrontendError>;
}

/// Decodes wire-format bytes into a freshly-instantiated message value.
///
/// Used for the opaque `value` bytes of a dynamically-typed wrapper once its
/// type URL has been resolved.
pub trait WireDecoder {
    fn decode(
        &self,
        pool: &DescriptorPool,
        message: MessageId,
        bytes: &[u8],
    ) -> Result<MessageValue, FrontendError>;
}
