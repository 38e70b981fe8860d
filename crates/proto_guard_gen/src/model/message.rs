use crate::utils::simple_name;
use crate::utils::to_pascal_case;

// ============================================================================
// VALUE TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Bool,
    String,
    Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericClass {
    Signed,
    Unsigned,
    Float,
}

impl ScalarType {
    pub const fn numeric_class(self) -> Option<NumericClass> {
        match self {
            Self::Int32 | Self::Int64 | Self::SInt32 | Self::SInt64 | Self::SFixed32 | Self::SFixed64 => Some(NumericClass::Signed),
            Self::UInt32 | Self::UInt64 | Self::Fixed32 | Self::Fixed64 => Some(NumericClass::Unsigned),
            Self::Double | Self::Float => Some(NumericClass::Float),
            Self::Bool | Self::String | Self::Bytes => None,
        }
    }

    pub const fn is_numeric(self) -> bool {
        self.numeric_class().is_some()
    }

    /// Whether values are 32 bits wide on the Rust side.
    pub const fn is_32_bit(self) -> bool {
        matches!(self, Self::Float | Self::Int32 | Self::UInt32 | Self::SInt32 | Self::Fixed32 | Self::SFixed32)
    }

    /// The Rust type prost uses for this scalar.
    pub const fn rust_type(self) -> &'static str {
        match self {
            Self::Double => "f64",
            Self::Float => "f32",
            Self::Int32 | Self::SInt32 | Self::SFixed32 => "i32",
            Self::Int64 | Self::SInt64 | Self::SFixed64 => "i64",
            Self::UInt32 | Self::Fixed32 => "u32",
            Self::UInt64 | Self::Fixed64 => "u64",
            Self::Bool => "bool",
            Self::String => "String",
            Self::Bytes => "Vec<u8>",
        }
    }
}

/// Type of a single field value, or of the elements of a collection field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Scalar(ScalarType),
    /// Full name of the enum type. Values are carried as `i32`.
    Enum(String),
    /// Full name of the message type.
    Message(String),
    Any,
}

impl ValueType {
    pub const fn scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(scalar) => Some(*scalar),
            _ => None,
        }
    }

    pub const fn is_message_like(&self) -> bool {
        matches!(self, Self::Message(_) | Self::Any)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Singular(ValueType),
    Repeated(ValueType),
    Map { key: ScalarType, value: ValueType },
}

impl FieldKind {
    /// Type of the field value, element type for repeated and map fields.
    pub const fn value_type(&self) -> &ValueType {
        match self {
            Self::Singular(value) | Self::Repeated(value) | Self::Map { value, .. } => value,
        }
    }

    pub const fn is_collection(&self) -> bool {
        !matches!(self, Self::Singular(_))
    }
}

// ============================================================================
// FIELDS
// ============================================================================

/// Stable identity of a field: declaring message plus field number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId {
    pub declaring_type: String,
    pub number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDeclaration {
    pub name: String,
    pub number: u32,
    pub kind: FieldKind,
    /// Full name of the declaring message, filled in by [`MessageType::with_field`].
    pub declaring_type: String,
    pub oneof: Option<String>,
    /// proto3 `optional` or proto2 scalar, carried as `Option<T>` by prost.
    pub explicit_presence: bool,
}

impl FieldDeclaration {
    pub fn new(name: impl Into<String>, number: u32, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            number,
            kind,
            declaring_type: String::new(),
            oneof: None,
            explicit_presence: false,
        }
    }

    pub fn scalar(name: impl Into<String>, number: u32, scalar: ScalarType) -> Self {
        Self::new(name, number, FieldKind::Singular(ValueType::Scalar(scalar)))
    }

    pub fn message(name: impl Into<String>, number: u32, type_name: impl Into<String>) -> Self {
        Self::new(name, number, FieldKind::Singular(ValueType::Message(type_name.into())))
    }

    pub fn any(name: impl Into<String>, number: u32) -> Self {
        Self::new(name, number, FieldKind::Singular(ValueType::Any))
    }

    pub fn repeated(name: impl Into<String>, number: u32, value: ValueType) -> Self {
        Self::new(name, number, FieldKind::Repeated(value))
    }

    pub fn map(name: impl Into<String>, number: u32, key: ScalarType, value: ValueType) -> Self {
        Self::new(name, number, FieldKind::Map { key, value })
    }

    #[must_use]
    pub fn in_oneof(mut self, oneof: impl Into<String>) -> Self {
        self.oneof = Some(oneof.into());
        self
    }

    #[must_use]
    pub fn with_presence(mut self) -> Self {
        self.explicit_presence = true;
        self
    }

    pub fn id(&self) -> FieldId {
        FieldId {
            declaring_type: self.declaring_type.clone(),
            number: self.number,
        }
    }

    pub const fn is_collection(&self) -> bool {
        self.kind.is_collection()
    }

    pub const fn is_any(&self) -> bool {
        matches!(self.kind.value_type(), ValueType::Any)
    }

    /// Scalar type of the value (or elements), if the field holds scalars.
    pub const fn scalar_type(&self) -> Option<ScalarType> {
        self.kind.value_type().scalar()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OneofDeclaration {
    pub name: String,
    /// Member field numbers in declaration order.
    pub fields: Vec<u32>,
}

// ============================================================================
// MESSAGES
// ============================================================================

/// Pre-parsed descriptor of one message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageType {
    pub full_name: String,
    /// Name of the generated Rust struct.
    pub rust_name: String,
    fields: Vec<FieldDeclaration>,
    oneofs: Vec<OneofDeclaration>,
}

impl MessageType {
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let rust_name = to_pascal_case(simple_name(&full_name));
        Self {
            full_name,
            rust_name,
            fields: Vec::new(),
            oneofs: Vec::new(),
        }
    }

    /// Append a field, registering it with its oneof if it belongs to one.
    #[must_use]
    pub fn with_field(mut self, mut field: FieldDeclaration) -> Self {
        field.declaring_type.clone_from(&self.full_name);
        if let Some(oneof) = &field.oneof {
            match self.oneofs.iter_mut().find(|o| &o.name == oneof) {
                Some(existing) => existing.fields.push(field.number),
                None => self.oneofs.push(OneofDeclaration {
                    name: oneof.clone(),
                    fields: vec![field.number],
                }),
            }
        }
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldDeclaration] {
        &self.fields
    }

    pub fn oneofs(&self) -> &[OneofDeclaration] {
        &self.oneofs
    }

    pub fn field(&self, name: &str) -> Option<&FieldDeclaration> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn oneof(&self, name: &str) -> Option<&OneofDeclaration> {
        self.oneofs.iter().find(|o| o.name == name)
    }
}
