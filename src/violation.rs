use std::fmt;

use crate::FieldPath;

/// A single failed constraint found while validating a message.
///
/// The human-readable text is kept as a template plus parameters so callers
/// can localise or re-render it. Use [`ConstraintViolation::message`] for the
/// formatted text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstraintViolation {
    /// Message template with `{}` positional placeholders.
    pub msg_format: String,
    /// Values substituted into the placeholders of `msg_format`, in order.
    pub param: Vec<String>,
    /// Full protobuf name of the validated type.
    pub type_name: String,
    /// Path of the offending field, empty for message-level violations.
    pub field_path: FieldPath,
    /// Debug rendering of the offending value, when it is known.
    pub field_value: Option<String>,
    /// Violations found inside a nested message.
    pub violation: Vec<ConstraintViolation>,
}

impl ConstraintViolation {
    pub fn new(msg_format: impl Into<String>) -> Self {
        Self {
            msg_format: msg_format.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    #[must_use]
    pub fn with_field_path(mut self, field_path: FieldPath) -> Self {
        self.field_path = field_path;
        self
    }

    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param.push(param.into());
        self
    }

    #[must_use]
    pub fn with_field_value(mut self, value: impl Into<String>) -> Self {
        self.field_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_nested(mut self, nested: Vec<ConstraintViolation>) -> Self {
        self.violation = nested;
        self
    }

    /// Formatted message with all parameters substituted.
    pub fn message(&self) -> String {
        format_message(&self.msg_format, &self.param)
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field_path.is_empty() {
            write!(f, "{}", self.message())
        } else {
            write!(f, "{}: {}", self.field_path, self.message())
        }
    }
}

/// Substitute `params` into the `{}` placeholders of `template`, left to right.
///
/// Placeholders without a matching parameter are kept verbatim and surplus
/// parameters are ignored.
pub fn format_message(template: &str, params: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut params = params.iter();
    let mut rest = template;
    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        match params.next() {
            Some(param) => out.push_str(param),
            None => out.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}
