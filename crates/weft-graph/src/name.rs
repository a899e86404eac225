use serde::{Deserialize, Serialize};

/// A name tuple uniquely designating a graph node.
///
/// Two names with equal slots designate the same node; downstream stores
/// deduplicate on the full tuple. Unused slots stay empty rather than
/// absent so equality and hashing are structural.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeName {
    /// Node-specific discriminator, e.g. a fully-qualified schema name or an
    /// `@begin:end` anchor span.
    pub signature: String,
    pub corpus: String,
    pub root: String,
    /// File path within the corpus.
    pub path: String,
    pub language: String,
}

impl NodeName {
    #[inline]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    #[inline]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}
