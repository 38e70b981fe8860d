use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Dotted path of a field inside a (possibly nested) message.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldPath {
    pub field_name: Vec<String>,
}

impl FieldPath {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field_name: names.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut field_name = self.field_name.clone();
        field_name.push(name.into());
        Self { field_name }
    }

    pub fn is_empty(&self) -> bool {
        self.field_name.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.field_name.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.split('.').filter(|segment| !segment.is_empty())))
    }
}

/// Position of a field handed to external validators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldContext {
    /// Full protobuf name of the type declaring the field.
    pub declaring_type: String,
    pub field_number: u32,
    pub path: FieldPath,
}

impl FieldContext {
    pub fn new(declaring_type: impl Into<String>, field_number: u32, path: FieldPath) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            field_number,
            path,
        }
    }
}
