//! Graph identities for schema entities.

use weft_graph::NodeName;
use weft_proto::{FieldDescriptor, MessageDescriptor};

use crate::paths::PathResolver;
use crate::{AnalyzeError, Result};

/// Language tag carried by schema-entity identities.
pub const PROTOBUF_LANGUAGE: &str = "protobuf";

/// A schema entity a reference edge can target.
#[derive(Debug, Clone, Copy)]
pub enum SchemaEntity<'a> {
    Message(&'a MessageDescriptor),
    Field(&'a FieldDescriptor),
    /// A schema file, by its search-path-relative path.
    File(&'a str),
}

/// Stable graph identity of `entity`.
///
/// Message and field identities start from the declaring file's identity
/// and carry the fully-qualified name as signature; file identities are the
/// registered file name itself. Fails with `NotFound` when the file path has
/// no registered identity, which makes the reference unresolvable.
pub fn name_for_entity(entity: SchemaEntity<'_>, resolver: &PathResolver<'_>) -> Result<NodeName> {
    let (full_name, file) = match entity {
        SchemaEntity::Message(message) => (message.full_name.as_str(), message.file.as_str()),
        SchemaEntity::Field(field) => (field.full_name.as_str(), field.file.as_str()),
        SchemaEntity::File(path) => {
            return resolver.name_for_relative(path).cloned().ok_or_else(|| {
                AnalyzeError::NotFound(format!("no identity registered for schema file {path}"))
            });
        }
    };

    let name = resolver.name_for_relative(file).cloned().ok_or_else(|| {
        AnalyzeError::NotFound(format!(
            "no identity registered for schema file {file} declaring {full_name}"
        ))
    })?;
    Ok(name.with_signature(full_name).with_language(PROTOBUF_LANGUAGE))
}
