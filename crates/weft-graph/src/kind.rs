use serde::{Deserialize, Serialize};

/// Node kinds asserted through the `node/kind` fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Anchor,
    Diagnostic,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Anchor => "anchor",
            NodeKind::Diagnostic => "diagnostic",
        }
    }
}

/// Edge kinds emitted by the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// From an anchor to the schema entity it names.
    Ref,
    /// From a file to a diagnostic attached to it.
    Tagged,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Ref => "ref",
            EdgeKind::Tagged => "tagged",
        }
    }
}

/// Fact names asserted on nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactName {
    /// The node's kind; value is a [`NodeKind`] string.
    NodeKind,
    /// Anchor start offset, decimal bytes.
    LocStart,
    /// Anchor end offset, decimal bytes.
    LocEnd,
    /// Full text of a file node.
    Text,
    /// Human-readable message of a diagnostic node.
    Message,
}

impl FactName {
    pub fn as_str(self) -> &'static str {
        match self {
            FactName::NodeKind => "node/kind",
            FactName::LocStart => "loc/start",
            FactName::LocEnd => "loc/end",
            FactName::Text => "text",
            FactName::Message => "message",
        }
    }
}
