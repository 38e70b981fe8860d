use std::collections::BTreeMap;
use std::fmt::Write;

use crate::model::Number;

/// Dynamic protobuf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    Enum(i32),
    /// A nested message, or the unpacked content of an `Any`.
    Message(MessageValue),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn number(&self) -> Option<Number> {
        match self {
            Self::Int(v) => Some(Number::Int(*v)),
            Self::UInt(v) => Some(Number::UInt(*v)),
            Self::Float(v) => Some(Number::Float(*v)),
            Self::Enum(v) => Some(Number::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is the protobuf default of its type.
    pub fn is_default(&self) -> bool {
        match self {
            Self::Int(v) => *v == 0,
            Self::UInt(v) => *v == 0,
            Self::Float(v) => *v == 0.0,
            Self::Bool(v) => !v,
            Self::String(v) => v.is_empty(),
            Self::Bytes(v) => v.is_empty(),
            Self::Enum(v) => *v == 0,
            Self::Message(_) => false,
            Self::List(v) => v.is_empty(),
            Self::Map(v) => v.is_empty(),
        }
    }

    /// Elements of a repeated value, values of a map.
    pub fn elements(&self) -> Vec<&Self> {
        match self {
            Self::List(items) => items.iter().collect(),
            Self::Map(entries) => entries.iter().map(|(_, value)| value).collect(),
            _ => Vec::new(),
        }
    }

    /// Same text as `{:?}` on the prost representation of the value.
    pub fn debug_string(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::Float(v) => format!("{v:?}"),
            Self::Bool(v) => v.to_string(),
            Self::String(v) => format!("{v:?}"),
            Self::Bytes(v) => format!("{v:?}"),
            Self::Enum(v) => v.to_string(),
            Self::Message(message) => format!("{message:?}"),
            Self::List(items) => debug_list(items.iter()),
            Self::Map(entries) => {
                let mut out = String::from("{");
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{}: {}", key.debug_string(), value.debug_string());
                }
                out.push('}');
                out
            }
        }
    }
}

pub(crate) fn debug_list<'a>(items: impl Iterator<Item = &'a Value>) -> String {
    let items: Vec<_> = items.map(Value::debug_string).collect();
    format!("[{}]", items.join(", "))
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_value!(
    i32 => Int,
    i64 => Int,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Float,
    bool => Bool,
    String => String,
    &str => String,
    MessageValue => Message,
);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Dynamic message: type name, field values and set oneof cases.
///
/// A field missing from `fields` holds its default value; for fields with
/// explicit presence, it is unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageValue {
    pub type_name: String,
    pub fields: BTreeMap<String, Value>,
    /// Oneof name to the name of its set member.
    pub oneofs: BTreeMap<String, String>,
}

impl MessageValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Set `field` as the case of `oneof`, clearing the previous member.
    #[must_use]
    pub fn with_oneof(mut self, oneof: impl Into<String>, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        if let Some(previous) = self.oneofs.insert(oneof.into(), field.clone()) {
            self.fields.remove(&previous);
        }
        self.fields.insert(field, value.into());
        self
    }

    #[must_use]
    pub fn with_map(mut self, field: impl Into<String>, entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        self.fields.insert(field.into(), Value::Map(entries.into_iter().collect()));
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}
