use serde::Serialize;

use crate::{EdgeKind, FactName, NodeName};

/// Append-only receiver of graph output.
///
/// Implementations persist or forward entries; they are expected to
/// deduplicate on identity downstream, so emitting the same fact twice is
/// harmless.
pub trait GraphSink {
    fn fact(&mut self, node: &NodeName, name: FactName, value: &[u8]);
    fn edge(&mut self, source: &NodeName, kind: EdgeKind, target: &NodeName);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactEntry {
    pub node: NodeName,
    pub name: FactName,
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeEntry {
    pub source: NodeName,
    pub kind: EdgeKind,
    pub target: NodeName,
}

/// Sink recording every entry in emission order, for tests and snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemorySink {
    pub facts: Vec<FactEntry>,
    pub edges: Vec<EdgeEntry>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes carrying a `node/kind` fact with the given kind, in emission
    /// order, duplicates included.
    pub fn nodes_of_kind(&self, kind: crate::NodeKind) -> Vec<&NodeName> {
        self.facts
            .iter()
            .filter(|fact| fact.name == FactName::NodeKind && fact.value == kind.as_str().as_bytes())
            .map(|fact| &fact.node)
            .collect()
    }

    /// Value of the first `name` fact recorded on `node`.
    pub fn fact_value(&self, node: &NodeName, name: FactName) -> Option<&[u8]> {
        self.facts
            .iter()
            .find(|fact| fact.name == name && &fact.node == node)
            .map(|fact| fact.value.as_slice())
    }

    pub fn edges_from<'a>(&'a self, source: &'a NodeName) -> impl Iterator<Item = &'a EdgeEntry> {
        self.edges.iter().filter(move |edge| &edge.source == source)
    }
}

impl GraphSink for MemorySink {
    fn fact(&mut self, node: &NodeName, name: FactName, value: &[u8]) {
        self.facts.push(FactEntry {
            node: node.clone(),
            name,
            value: value.to_vec(),
        });
    }

    fn edge(&mut self, source: &NodeName, kind: EdgeKind, target: &NodeName) {
        self.edges.push(EdgeEntry {
            source: source.clone(),
            kind,
            target: target.clone(),
        });
    }
}
