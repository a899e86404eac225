//! The textproto analyzer.
//!
//! Walks the value tree, the descriptor tree, and the location tree in
//! lockstep. The descriptor is authoritative for field iteration order; the
//! value tree bounds the walk (descriptors may be cyclic, parsed values are
//! finite); the location tree decides which occurrences get anchors.

use std::sync::LazyLock;

use regex::Regex;
use weft_core::{LineColumn, LineIndex, Span};
use weft_graph::{EdgeKind, FactName, GraphSink, NodeKind, NodeName};
use weft_proto::{
    DescriptorPool, FieldDescriptor, FieldKind, LocationTree, MessageDescriptor, MessageValue,
    WireDecoder, NON_REPEATED_INDEX,
};

use crate::identity::{name_for_entity, SchemaEntity};
use crate::paths::PathResolver;
use crate::schema_comments;
use crate::{AnalyzeError, Result};

/// Language tag carried by every anchor identity.
pub const TEXTPROTO_LANGUAGE: &str = "textproto";

/// Fully-qualified name of the dynamically-typed wrapper message.
const ANY_TYPE_NAME: &str = "google.protobuf.Any";

/// Rest of the owning field's name, an optional colon, and the opening brace.
static ANY_FIELD_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+:?\s*\{\s*").unwrap());

/// A full comment line, newline included.
static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#.*\n*").unwrap());

/// A bracketed type URL, capturing the message name after the authority.
static TYPE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[\s*[^/]+/([^\s\]]+)\s*\]").unwrap());

/// Walks one compilation unit's textproto and emits graph output.
///
/// Borrows all inputs for a single run and never mutates them; the path
/// resolver's substitution cache is the only owned mutable state.
pub struct TextprotoAnalyzer<'a> {
    text: &'a str,
    line_index: LineIndex,
    resolver: PathResolver<'a>,
    pool: &'a DescriptorPool,
    decoder: &'a dyn WireDecoder,
    sink: &'a mut dyn GraphSink,
}

impl<'a> TextprotoAnalyzer<'a> {
    pub fn new(
        text: &'a str,
        resolver: PathResolver<'a>,
        pool: &'a DescriptorPool,
        decoder: &'a dyn WireDecoder,
        sink: &'a mut dyn GraphSink,
    ) -> Self {
        Self {
            text,
            line_index: LineIndex::new(text),
            resolver,
            pool,
            decoder,
            sink,
        }
    }

    /// Recursively analyzes `value` and its sub-messages, emitting an anchor
    /// and a `ref` edge for every located field occurrence.
    pub fn analyze_message(
        &mut self,
        file: &NodeName,
        value: &MessageValue,
        descriptor: &MessageDescriptor,
        locations: &LocationTree,
    ) -> Result<()> {
        // Declared fields, in declaration order. Unset fields are recognized
        // by their missing location and skipped inside analyze_field.
        for field in &descriptor.fields {
            if field.repeated {
                let count = value.count(&field.full_name);
                for index in 0..count {
                    self.analyze_field(file, value, locations, field, index as i32)?;
                }
            } else {
                self.analyze_field(file, value, locations, field, NON_REPEATED_INDEX)?;
            }
        }

        // Set extensions. Declared fields were all handled above, so this
        // pass is strictly for extension entries.
        let pool = self.pool;
        for entry in value.entries() {
            if !entry.extension {
                continue;
            }
            let field = pool.extension_by_name(&entry.field).ok_or_else(|| {
                AnalyzeError::Internal(format!(
                    "set extension {} has no descriptor in the pool",
                    entry.field
                ))
            })?;
            if field.repeated {
                for index in 0..entry.values.len() {
                    self.analyze_field(file, value, locations, field, index as i32)?;
                }
            } else {
                self.analyze_field(file, value, locations, field, NON_REPEATED_INDEX)?;
            }
        }

        Ok(())
    }

    /// Analyzes one `(field, occurrence)` pair: derives its location, emits
    /// an anchor plus a `ref` edge when the occurrence names the field in
    /// the text, and recurses into message-typed values.
    fn analyze_field(
        &mut self,
        file: &NodeName,
        value: &MessageValue,
        locations: &LocationTree,
        field: &FieldDescriptor,
        index: i32,
    ) -> Result<()> {
        // The parser reports 0-indexed lines; the line index is 1-indexed.
        let located = locations
            .location(&field.full_name, index)
            .map(|at| LineColumn::new(at.line + 1, at.column));

        let located = match located {
            Some(at) => Some(at),
            // Inline repeated syntax: a single `name: [v1, v2]` entry yields
            // one location but several values. Occurrences past the first
            // have no name of their own to anchor, but their values still
            // get analyzed.
            None if index > 0 => None,
            None if field.extension || index != NON_REPEATED_INDEX => {
                // A set extension or the first occurrence of a repeated
                // field is only walked because the input contained it.
                return Err(AnalyzeError::Internal(format!(
                    "no location for set field {}",
                    field.full_name
                )));
            }
            // Regular field with no location: simply unset.
            None => return Ok(()),
        };

        let anchored = match located {
            Some(mut at) => {
                if field.extension {
                    // Skip the leading "[": extensions are written bracketed
                    // and anchored on the full name inside.
                    at.column += 1;
                }
                let name_len = if field.extension {
                    field.full_name.len()
                } else {
                    field.name.len()
                };
                let begin = self.line_index.offset(self.text, at)?;
                let anchor = self.add_anchor(file, Span::new(begin, begin + name_len));
                let target = name_for_entity(SchemaEntity::Field(field), &self.resolver)?;
                self.sink.edge(&anchor, EdgeKind::Ref, &target);
                Some(at)
            }
            None => None,
        };

        if field.kind != FieldKind::Message {
            return Ok(());
        }

        let pool = self.pool;
        let target_id = field.message_type.ok_or_else(|| {
            AnalyzeError::Internal(format!(
                "message-typed field {} has no target descriptor",
                field.full_name
            ))
        })?;
        let sub_descriptor = pool.message(target_id);
        let sub_value = value.message(&field.full_name, index).ok_or_else(|| {
            AnalyzeError::Internal(format!("no value for walked field {}", field.full_name))
        })?;
        let empty = LocationTree::new();
        let sub_locations = locations
            .subtree(&field.full_name, index)
            .unwrap_or(&empty);

        if sub_descriptor.full_name == ANY_TYPE_NAME {
            // The field's own location seeds the type-URL scan; occurrences
            // without an anchor have nothing to scan from.
            self.analyze_any(file, sub_value, sub_descriptor, sub_locations, anchored)
        } else {
            self.analyze_message(file, sub_value, sub_descriptor, sub_locations)
        }
    }

    /// Analyzes the message wrapped in a `google.protobuf.Any` field.
    ///
    /// The literal form carries a bracketed type URL that the location tree
    /// does not pinpoint; a raw-text scan starting at the owning field
    /// recovers it. The direct `type_url`/`value` form (or a failed scan)
    /// falls back to the ordinary message walk.
    fn analyze_any(
        &mut self,
        file: &NodeName,
        value: &MessageValue,
        descriptor: &MessageDescriptor,
        locations: &LocationTree,
        field_location: Option<LineColumn>,
    ) -> Result<()> {
        debug_assert_eq!(descriptor.full_name, ANY_TYPE_NAME);

        let Some(type_url_anchor) = self.analyze_any_type_url(file, field_location)? else {
            return self.analyze_message(file, value, descriptor, locations);
        };

        let type_url_field = descriptor.field_by_name("type_url").ok_or_else(|| {
            AnalyzeError::Internal("Any descriptor has no type_url field".to_string())
        })?;
        let value_field = descriptor
            .field_by_name("value")
            .ok_or_else(|| AnalyzeError::Internal("Any descriptor has no value field".to_string()))?;

        let type_url = value.string(&type_url_field.full_name).unwrap_or_default();
        let message_name = message_name_from_type_url(type_url);
        let pool = self.pool;
        let Some(target_id) = pool.message_by_name(message_name) else {
            // A missing descriptor for one Any must not stop the rest of the
            // file from being indexed.
            tracing::error!(type_name = message_name, "no descriptor for Any type URL");
            return Ok(());
        };
        let target_descriptor = pool.message(target_id);
        let target = name_for_entity(SchemaEntity::Message(target_descriptor), &self.resolver)?;
        self.sink.edge(&type_url_anchor, EdgeKind::Ref, &target);

        let bytes = value.bytes(&value_field.full_name).unwrap_or_default();
        if bytes.is_empty() {
            return Ok(());
        }
        let decoded = self
            .decoder
            .decode(pool, target_id, bytes)
            .map_err(|err| {
                AnalyzeError::Parse(format!(
                    "failed to decode Any value bytes as {message_name}: {err}"
                ))
            })?;
        self.analyze_message(file, &decoded, target_descriptor, locations)
    }

    /// Locates and anchors the `[authority/message.Name]` span following the
    /// owning field. Returns `None` when the literal form is not found,
    /// which callers treat as the direct `type_url`/`value` form.
    fn analyze_any_type_url(
        &mut self,
        file: &NodeName,
        field_location: Option<LineColumn>,
    ) -> Result<Option<NodeName>> {
        let Some(at) = field_location else {
            return Ok(None);
        };

        let text = self.text;
        let mut cursor = self.line_index.offset(text, at)?;

        let Some(matched) = ANY_FIELD_PREFIX.find(&text[cursor..]) else {
            return Ok(None);
        };
        cursor += matched.end();

        // Tolerate comment lines between the brace and the type URL.
        while let Some(matched) = COMMENT_LINE.find(&text[cursor..]) {
            cursor += matched.end();
        }

        let Some(captures) = TYPE_URL.captures(&text[cursor..]) else {
            return Ok(None);
        };
        let Some(name) = captures.get(1) else {
            return Ok(None);
        };
        let span = Span::new(cursor + name.start(), cursor + name.end());
        Ok(Some(self.add_anchor(file, span)))
    }

    /// Emits references for the schema directives in the leading comment
    /// block. Failures are wrapped as `SchemaComments` so the driver can
    /// downgrade them to a diagnostic.
    pub fn analyze_schema_comments(
        &mut self,
        file: &NodeName,
        root: &MessageDescriptor,
    ) -> Result<()> {
        let text = self.text;
        let comments = schema_comments::scan(text);

        if let Some(span) = comments.proto_message {
            let anchor = self.add_anchor(file, span);
            let target = name_for_entity(SchemaEntity::Message(root), &self.resolver)
                .map_err(|err| AnalyzeError::SchemaComments(err.to_string()))?;
            self.sink.edge(&anchor, EdgeKind::Ref, &target);
        }

        let mut file_spans = comments.proto_imports.clone();
        if let Some(span) = comments.proto_file {
            file_spans.push(span);
        }
        for span in file_spans {
            let path = &text[span.start..span.end];
            let anchor = self.add_anchor(file, span);
            let target = self
                .resolver
                .name_for_relative(path)
                .cloned()
                .ok_or_else(|| {
                    AnalyzeError::SchemaComments(format!(
                        "no identity registered for schema file {path}"
                    ))
                })?;
            self.sink.edge(&anchor, EdgeKind::Ref, &target);
        }

        Ok(())
    }

    /// Allocates the anchor node for `span` on `file` and emits its kind and
    /// byte-offset facts. Re-emitting the same span is idempotent because
    /// the sink deduplicates on identity.
    fn add_anchor(&mut self, file: &NodeName, span: Span) -> NodeName {
        debug_assert!(span.start < span.end && span.end <= self.text.len());

        let anchor = file
            .clone()
            .with_signature(format!("@{}:{}", span.start, span.end))
            .with_language(TEXTPROTO_LANGUAGE);
        self.sink
            .fact(&anchor, FactName::NodeKind, NodeKind::Anchor.as_str().as_bytes());
        self.sink
            .fact(&anchor, FactName::LocStart, span.start.to_string().as_bytes());
        self.sink
            .fact(&anchor, FactName::LocEnd, span.end.to_string().as_bytes());
        anchor
    }

    /// Attaches a diagnostic node to `file` via a `tagged` edge.
    pub fn emit_diagnostic(&mut self, file: &NodeName, signature: &str, message: &str) {
        let diagnostic = file.clone().with_signature(signature);
        self.sink.fact(
            &diagnostic,
            FactName::NodeKind,
            NodeKind::Diagnostic.as_str().as_bytes(),
        );
        self.sink
            .fact(&diagnostic, FactName::Message, message.as_bytes());
        self.sink.edge(file, EdgeKind::Tagged, &diagnostic);
    }
}

/// Message name designated by an Any type URL: the part after the last `/`,
/// or the whole URL when there is none.
fn message_name_from_type_url(type_url: &str) -> &str {
    match type_url.rfind('/') {
        Some(slash) => &type_url[slash + 1..],
        None => type_url,
    }
}
