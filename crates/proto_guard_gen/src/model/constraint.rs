//! Constraints extracted from protobuf field and message options.

use std::fmt;

use crate::model::BoundSide;
use crate::model::FieldContext;
use crate::model::Range;
use crate::model::error_message;

/// One compiled validation rule. Input order is emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Range(RangeConstraint),
    Required(RequiredConstraint),
    Pattern(PatternConstraint),
    Distinct(DistinctConstraint),
    GoesWith(GoesConstraint),
    Validate(ValidateConstraint),
    RequiredField(RequiredFieldConstraint),
    RequiredOneof(RequiredOneofConstraint),
    Custom(CustomConstraint),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Range,
    Required,
    Pattern,
    Distinct,
    GoesWith,
    Validate,
    RequiredField,
    RequiredOneof,
    Custom,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Range => "range",
            Self::Required => "required",
            Self::Pattern => "pattern",
            Self::Distinct => "distinct",
            Self::GoesWith => "goes",
            Self::Validate => "validate",
            Self::RequiredField => "required_field",
            Self::RequiredOneof => "is_required",
            Self::Custom => "custom",
        })
    }
}

impl Constraint {
    pub fn range(field: impl Into<String>, range: Range) -> Self {
        Self::Range(RangeConstraint::new(field, range))
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::Required(RequiredConstraint::new(field))
    }

    pub fn pattern(field: impl Into<String>, regex: impl Into<String>) -> Self {
        Self::Pattern(PatternConstraint::new(field, regex))
    }

    pub fn distinct(field: impl Into<String>) -> Self {
        Self::Distinct(DistinctConstraint::new(field))
    }

    pub fn goes_with(field: impl Into<String>, with: impl Into<String>) -> Self {
        Self::GoesWith(GoesConstraint::new(field, with))
    }

    pub fn validate(field: impl Into<String>) -> Self {
        Self::Validate(ValidateConstraint::new(field))
    }

    pub fn required_field(expression: &str) -> Self {
        Self::RequiredField(RequiredFieldConstraint::parse(expression))
    }

    pub fn required_oneof(oneof: impl Into<String>) -> Self {
        Self::RequiredOneof(RequiredOneofConstraint::new(oneof))
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(CustomConstraint::new(name))
    }

    pub const fn kind(&self) -> ConstraintKind {
        match self {
            Self::Range(_) => ConstraintKind::Range,
            Self::Required(_) => ConstraintKind::Required,
            Self::Pattern(_) => ConstraintKind::Pattern,
            Self::Distinct(_) => ConstraintKind::Distinct,
            Self::GoesWith(_) => ConstraintKind::GoesWith,
            Self::Validate(_) => ConstraintKind::Validate,
            Self::RequiredField(_) => ConstraintKind::RequiredField,
            Self::RequiredOneof(_) => ConstraintKind::RequiredOneof,
            Self::Custom(_) => ConstraintKind::Custom,
        }
    }

    /// The single field targeted by field-level constraints.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Range(c) => Some(&c.field),
            Self::Required(c) => Some(&c.field),
            Self::Pattern(c) => Some(&c.field),
            Self::Distinct(c) => Some(&c.field),
            Self::GoesWith(c) => Some(&c.field),
            Self::Validate(c) => Some(&c.field),
            Self::RequiredField(_) | Self::RequiredOneof(_) | Self::Custom(_) => None,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(c) => write!(f, "({}) `{}` on field `{}`", self.kind(), c.range, c.field),
            Self::Pattern(c) => write!(f, "({}) `{}` on field `{}`", self.kind(), c.regex, c.field),
            Self::GoesWith(c) => write!(f, "({}) with `{}` on field `{}`", self.kind(), c.with, c.field),
            Self::Required(_) | Self::Distinct(_) | Self::Validate(_) => {
                write!(f, "({}) on field `{}`", self.kind(), self.field_name().unwrap_or_default())
            }
            Self::RequiredField(c) => write!(f, "({}) `{}`", self.kind(), c.expression),
            Self::RequiredOneof(c) => write!(f, "({}) on oneof `{}`", self.kind(), c.oneof),
            Self::Custom(c) => write!(f, "custom constraint `{}`", c.name),
        }
    }
}

macro_rules! impl_from_constraint {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Constraint {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_constraint!(
    Range(RangeConstraint),
    Required(RequiredConstraint),
    Pattern(PatternConstraint),
    Distinct(DistinctConstraint),
    GoesWith(GoesConstraint),
    Validate(ValidateConstraint),
    RequiredField(RequiredFieldConstraint),
    RequiredOneof(RequiredOneofConstraint),
    Custom(CustomConstraint),
);

fn message_or(error_msg: Option<&str>, default: &str, context: &FieldContext<'_>) -> String {
    let template = error_msg.filter(|msg| !msg.is_empty()).unwrap_or(default);
    error_message(template, context)
}

// ============================================================================
// FIELD CONSTRAINTS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RangeConstraint {
    pub field: String,
    pub range: Range,
    pub error_msg: Option<String>,
}

impl RangeConstraint {
    pub fn new(field: impl Into<String>, range: Range) -> Self {
        Self {
            field: field.into(),
            range,
            error_msg: None,
        }
    }

    #[must_use]
    pub fn with_error_msg(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = Some(msg.into());
        self
    }

    /// Message for a violated bound; the bound value is the only parameter.
    pub fn error_message(&self, side: BoundSide, context: &FieldContext<'_>) -> String {
        let inclusive = self.range.bound(side).is_some_and(|b| b.inclusive);
        let default = match (side, inclusive) {
            (BoundSide::Lower, true) => "The number must be greater than or equal to {}.",
            (BoundSide::Lower, false) => "The number must be greater than {}.",
            (BoundSide::Upper, true) => "The number must be less than or equal to {}.",
            (BoundSide::Upper, false) => "The number must be less than {}.",
        };
        message_or(self.error_msg.as_deref(), default, context)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredConstraint {
    pub field: String,
    pub error_msg: Option<String>,
}

impl RequiredConstraint {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error_msg: None,
        }
    }

    #[must_use]
    pub fn with_error_msg(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = Some(msg.into());
        self
    }

    pub fn error_message(&self, context: &FieldContext<'_>) -> String {
        message_or(self.error_msg.as_deref(), "The field `{field.path}` must be set.", context)
    }
}

/// Regex modifiers of the `(pattern)` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternModifier {
    pub case_insensitive: bool,
    pub multiline: bool,
    pub dot_all: bool,
    /// Search anywhere in the value instead of matching it whole.
    pub partial_match: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternConstraint {
    pub field: String,
    pub regex: String,
    pub modifier: PatternModifier,
    pub error_msg: Option<String>,
}

impl PatternConstraint {
    pub fn new(field: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            regex: regex.into(),
            modifier: PatternModifier::default(),
            error_msg: None,
        }
    }

    #[must_use]
    pub const fn with_modifier(mut self, modifier: PatternModifier) -> Self {
        self.modifier = modifier;
        self
    }

    #[must_use]
    pub fn with_error_msg(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = Some(msg.into());
        self
    }

    pub const fn allows_partial_match(&self) -> bool {
        self.modifier.partial_match
    }

    /// Inline flag group for the modifiers, empty if none is set.
    pub fn flags(&self) -> String {
        let flags: String = [(self.modifier.case_insensitive, 'i'), (self.modifier.multiline, 'm'), (self.modifier.dot_all, 's')]
            .into_iter()
            .filter_map(|(on, flag)| on.then_some(flag))
            .collect();
        if flags.is_empty() { flags } else { format!("(?{flags})") }
    }

    /// Regex source that encodes flags and full or partial matching.
    pub fn regex_source(&self) -> String {
        let flags = self.flags();
        if self.allows_partial_match() {
            format!("{flags}{}", self.regex)
        } else {
            format!(r"{flags}\A(?:{})\z", self.regex)
        }
    }

    /// Message with the regex as the only parameter.
    pub fn error_message(&self, context: &FieldContext<'_>) -> String {
        message_or(self.error_msg.as_deref(), "The string must match the regular expression `{}`.", context)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinctConstraint {
    pub field: String,
    pub error_msg: Option<String>,
}

impl DistinctConstraint {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error_msg: None,
        }
    }

    #[must_use]
    pub fn with_error_msg(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = Some(msg.into());
        self
    }

    pub fn error_message(&self, context: &FieldContext<'_>) -> String {
        message_or(self.error_msg.as_deref(), "Values must be distinct.", context)
    }
}

/// `(goes).with`: the field may only be set together with `with`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoesConstraint {
    pub field: String,
    pub with: String,
    pub error_msg: Option<String>,
}

impl GoesConstraint {
    pub fn new(field: impl Into<String>, with: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            with: with.into(),
            error_msg: None,
        }
    }

    #[must_use]
    pub fn with_error_msg(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = Some(msg.into());
        self
    }

    /// Message with the field name and the paired field name as parameters.
    pub fn error_message(&self, context: &FieldContext<'_>) -> String {
        message_or(self.error_msg.as_deref(), "The field `{}` can only be set when the field `{}` is defined.", context)
    }
}

/// `(if_invalid)` option of a nested message field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IfInvalid {
    pub error_msg: String,
    /// Deprecated spelling of `error_msg`, still honoured.
    pub msg_format: String,
}

impl IfInvalid {
    /// First non-empty of `error_msg` and `msg_format`.
    pub fn message(&self) -> Option<&str> {
        [self.error_msg.as_str(), self.msg_format.as_str()].into_iter().find(|msg| !msg.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateConstraint {
    pub field: String,
    pub if_invalid: Option<IfInvalid>,
}

impl ValidateConstraint {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            if_invalid: None,
        }
    }

    #[must_use]
    pub fn with_if_invalid(mut self, if_invalid: IfInvalid) -> Self {
        self.if_invalid = Some(if_invalid);
        self
    }

    pub fn error_message(&self, context: &FieldContext<'_>) -> String {
        let custom = self.if_invalid.as_ref().and_then(IfInvalid::message);
        message_or(custom, "The message must have valid properties.", context)
    }
}

// ============================================================================
// MESSAGE CONSTRAINTS
// ============================================================================

/// `(required_field)`: at least one group of fields must be set entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFieldConstraint {
    /// Option value as written, reported as the violation parameter.
    pub expression: String,
    pub alternatives: Vec<Vec<String>>,
}

impl RequiredFieldConstraint {
    /// Parse `a & b | c`: `|` separates alternatives, `&` joins fields.
    pub fn parse(expression: &str) -> Self {
        let alternatives = expression
            .split('|')
            .map(|group| group.split('&').map(str::trim).filter(|name| !name.is_empty()).map(ToString::to_string).collect::<Vec<_>>())
            .filter(|group| !group.is_empty())
            .collect();
        Self {
            expression: expression.trim().to_string(),
            alternatives,
        }
    }

    pub fn from_alternatives(alternatives: Vec<Vec<String>>) -> Self {
        let expression = alternatives.iter().map(|group| group.join(" & ")).collect::<Vec<_>>().join(" | ");
        Self { expression, alternatives }
    }

    pub const fn error_message() -> &'static str {
        "Required fields are not set. Must match pattern `{}`."
    }
}

/// `(is_required)` on a oneof: one of its fields must be set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredOneofConstraint {
    pub oneof: String,
    pub error_msg: Option<String>,
}

impl RequiredOneofConstraint {
    pub fn new(oneof: impl Into<String>) -> Self {
        Self {
            oneof: oneof.into(),
            error_msg: None,
        }
    }

    #[must_use]
    pub fn with_error_msg(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = Some(msg.into());
        self
    }

    pub fn error_message(&self, context: &FieldContext<'_>) -> String {
        let default = format!("One of the fields in the `{}` group must be set.", self.oneof);
        message_or(self.error_msg.as_deref(), &default, context)
    }
}

/// A constraint whose check only exists at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomConstraint {
    pub name: String,
}

impl CustomConstraint {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_parsing() {
        let parsed = RequiredFieldConstraint::parse(" a & b | c ");
        assert_eq!(parsed.alternatives, vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]);
        assert_eq!(parsed.expression, "a & b | c");

        let rebuilt = RequiredFieldConstraint::from_alternatives(parsed.alternatives.clone());
        assert_eq!(rebuilt.expression, "a & b | c");

        assert!(RequiredFieldConstraint::parse(" | & ").alternatives.is_empty());
    }

    #[test]
    fn test_pattern_sources() {
        let full = PatternConstraint::new("name", "^[A-Z].*");
        assert_eq!(full.regex_source(), r"\A(?:^[A-Z].*)\z");

        let partial = PatternConstraint::new("name", "ob").with_modifier(PatternModifier {
            case_insensitive: true,
            dot_all: true,
            partial_match: true,
            ..PatternModifier::default()
        });
        assert_eq!(partial.regex_source(), "(?is)ob");
    }

    #[test]
    fn test_if_invalid_prefers_error_msg() {
        let both = IfInvalid {
            error_msg: "new".into(),
            msg_format: "old".into(),
        };
        assert_eq!(both.message(), Some("new"));
        let legacy = IfInvalid {
            msg_format: "old".into(),
            ..IfInvalid::default()
        };
        assert_eq!(legacy.message(), Some("old"));
        assert_eq!(IfInvalid::default().message(), None);
    }

    #[test]
    fn test_range_messages_follow_inclusiveness() {
        let constraint = RangeConstraint::new("age", Range::at_least(0).with_upper(crate::model::Bound::exclusive(130)));
        let ctx = FieldContext::empty();
        assert_eq!(constraint.error_message(BoundSide::Lower, &ctx), "The number must be greater than or equal to {}.");
        assert_eq!(constraint.error_message(BoundSide::Upper, &ctx), "The number must be less than {}.");
    }

    #[test]
    fn test_display_names_the_constraint() {
        assert_eq!(Constraint::custom("checksum").to_string(), "custom constraint `checksum`");
        assert_eq!(Constraint::required("age").to_string(), "(required) on field `age`");
        assert_eq!(Constraint::range("age", Range::at_least(0)).to_string(), "(range) `>= 0` on field `age`");
    }
}
