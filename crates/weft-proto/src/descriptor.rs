//! Schema-side descriptors: messages, fields, and the lookup pool.

use std::collections::HashMap;
use std::fmt;

/// Index of a message descriptor within its pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct MessageId(u32);

impl MessageId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self.0)
    }
}

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Double,
    Float,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Bool,
    String,
    Bytes,
    Enum,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Short name, as written for regular fields.
    pub name: String,
    /// Fully-qualified name; this is how extensions are written.
    pub full_name: String,
    pub kind: FieldKind,
    pub repeated: bool,
    pub extension: bool,
    /// Path of the schema file declaring this field (the enclosing message's
    /// file for regular fields, the extending file for extensions).
    pub file: String,
    /// Target type for `FieldKind::Message` fields.
    pub message_type: Option<MessageId>,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        full_name: impl Into<String>,
        kind: FieldKind,
        file: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            kind,
            repeated: false,
            extension: false,
            file: file.into(),
            message_type: None,
        }
    }

    #[inline]
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    #[inline]
    pub fn extension(mut self) -> Self {
        self.extension = true;
        self
    }

    /// Marks the field message-typed with the given target.
    #[inline]
    pub fn of_message(mut self, target: MessageId) -> Self {
        self.kind = FieldKind::Message;
        self.message_type = Some(target);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    pub full_name: String,
    /// Path of the schema file declaring this message.
    pub file: String,
    /// Field descriptors in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl MessageDescriptor {
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Read-only schema registry supporting fully-qualified-name lookup.
///
/// Messages live in an arena addressed by [`MessageId`] so message-typed
/// fields can reference their target even when descriptors are cyclic.
/// Extensions are registered separately under their fully-qualified name.
#[derive(Debug, Clone, Default)]
pub struct DescriptorPool {
    messages: Vec<MessageDescriptor>,
    by_name: HashMap<String, MessageId>,
    extensions: HashMap<String, FieldDescriptor>,
}

impl DescriptorPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an empty message and returns its id; fields are attached
    /// with [`DescriptorPool::push_field`].
    pub fn add_message(&mut self, full_name: impl Into<String>, file: impl Into<String>) -> MessageId {
        let full_name = full_name.into();
        let id = MessageId::from_raw(self.messages.len() as u32);
        self.by_name.insert(full_name.clone(), id);
        self.messages.push(MessageDescriptor {
            full_name,
            file: file.into(),
            fields: Vec::new(),
        });
        id
    }

    pub fn push_field(&mut self, message: MessageId, field: FieldDescriptor) {
        self.messages[message.to_raw() as usize].fields.push(field);
    }

    pub fn add_extension(&mut self, field: FieldDescriptor) {
        self.extensions.insert(field.full_name.clone(), field);
    }

    pub fn message_by_name(&self, full_name: &str) -> Option<MessageId> {
        self.by_name.get(full_name).copied()
    }

    pub fn message(&self, id: MessageId) -> &MessageDescriptor {
        &self.messages[id.to_raw() as usize]
    }

    pub fn extension_by_name(&self, full_name: &str) -> Option<&FieldDescriptor> {
        self.extensions.get(full_name)
    }
}
