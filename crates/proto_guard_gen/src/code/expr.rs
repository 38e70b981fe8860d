use std::fmt;
use std::marker::PhantomData;

use crate::code::ConditionalCode;
use crate::code::NewViolation;
use crate::code::Statement;
use crate::model::FieldDeclaration;
use crate::model::Number;

/// Comparison of a numeric value against a bound literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        })
    }
}

/// Untyped generated-code AST. Rendering to a concrete syntax happens last.
#[derive(Debug, Clone, PartialEq)]
pub enum Code {
    /// The validated message parameter.
    Message,
    /// A local variable of the validating method.
    Local(String),
    /// Element of the innermost `ForEach` loop (map value for maps).
    Element,
    /// Value of a field of the validated message.
    FieldValue(FieldDeclaration),
    /// Presence of an explicitly tracked field (message, `Any`, `optional`).
    HasField(FieldDeclaration),
    /// A singular scalar differs from its default value.
    NotDefault(FieldDeclaration),
    /// The case of the field's oneof is this field.
    OneofCase(FieldDeclaration),
    /// No field of the named oneof is set.
    OneofUnset(String),
    Bool(bool),
    Not(Box<Code>),
    And(Vec<Code>),
    Or(Vec<Code>),
    Compare { value: Box<Code>, op: CompareOp, bound: Number },
    IsEmpty(Box<Code>),
    /// Call of the generated is-set helper of a field.
    IsSetCall { method: String, field: FieldDeclaration },
    /// Runtime read of an external validation flag.
    FlagRead(String),
    /// Match of a string value against a pre-built regex source.
    PatternMatch { source: String, value: Box<Code> },
    /// Elements of a collection field that repeat an earlier element.
    Duplicates(FieldDeclaration),
    /// Violations of the field's own compiled checks.
    IntrinsicViolations(FieldDeclaration),
    /// Violations produced by the externally registered validators.
    ExternalViolations { field: FieldDeclaration, path: Vec<String> },
    /// Violations of the custom constraints registered for the message type.
    CustomViolations,
    EmptyList,
    NewViolation(Box<NewViolation>),
}

impl Code {
    /// Whether rendering needs parentheses when nested inside an operator.
    pub const fn is_compound(&self) -> bool {
        matches!(self, Self::And(_) | Self::Or(_) | Self::Compare { .. })
    }
}

// ============================================================================
// SEMANTIC TYPES
// ============================================================================

/// Value of a field or a collection element.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue {}

/// `Vec<ConstraintViolation>`.
#[derive(Debug, Clone, Copy)]
pub enum ViolationList {}

/// Duplicate elements of a collection field.
#[derive(Debug, Clone, Copy)]
pub enum DuplicateSet {}

/// A single `ConstraintViolation`.
#[derive(Debug, Clone, Copy)]
pub enum Violation {}

/// Piece of generated code tagged with what it evaluates to.
#[derive(Debug)]
pub struct Expression<T> {
    code: Code,
    ty: PhantomData<fn() -> T>,
}

pub type BooleanExpression = Expression<bool>;

impl<T> Clone for Expression<T> {
    fn clone(&self) -> Self {
        Self::new(self.code.clone())
    }
}

impl<T> PartialEq for Expression<T> {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl<T> Expression<T> {
    pub const fn new(code: Code) -> Self {
        Self { code, ty: PhantomData }
    }

    pub const fn code(&self) -> &Code {
        &self.code
    }

    pub fn into_code(self) -> Code {
        self.code
    }
}

impl<T> From<Expression<T>> for Code {
    fn from(expression: Expression<T>) -> Self {
        expression.code
    }
}

impl Expression<FieldValue> {
    pub const fn field(field: FieldDeclaration) -> Self {
        Self::new(Code::FieldValue(field))
    }

    pub const fn element() -> Self {
        Self::new(Code::Element)
    }

    pub fn compare(&self, op: CompareOp, bound: Number) -> BooleanExpression {
        BooleanExpression::new(Code::Compare {
            value: Box::new(self.code.clone()),
            op,
            bound,
        })
    }

    pub fn matches(&self, source: impl Into<String>) -> BooleanExpression {
        BooleanExpression::new(Code::PatternMatch {
            source: source.into(),
            value: Box::new(self.code.clone()),
        })
    }
}

impl Expression<ViolationList> {
    pub const fn local(name: String) -> Self {
        Self::new(Code::Local(name))
    }

    pub const fn empty() -> Self {
        Self::new(Code::EmptyList)
    }

    pub fn is_empty(&self) -> BooleanExpression {
        BooleanExpression::new(Code::IsEmpty(Box::new(self.code.clone())))
    }
}

impl Expression<DuplicateSet> {
    pub const fn local(name: String) -> Self {
        Self::new(Code::Local(name))
    }

    pub fn is_empty(&self) -> BooleanExpression {
        BooleanExpression::new(Code::IsEmpty(Box::new(self.code.clone())))
    }
}

impl BooleanExpression {
    pub const TRUE: Self = Self::new(Code::Bool(true));

    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::new(match (self.code, other.code) {
            (Code::Bool(true), code) | (code, Code::Bool(true)) => code,
            (Code::And(mut left), Code::And(right)) => {
                left.extend(right);
                Code::And(left)
            }
            (Code::And(mut left), right) => {
                left.push(right);
                Code::And(left)
            }
            (left, right) => Code::And(vec![left, right]),
        })
    }

    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::new(match (self.code, other.code) {
            (Code::Or(mut left), Code::Or(right)) => {
                left.extend(right);
                Code::Or(left)
            }
            (Code::Or(mut left), right) => {
                left.push(right);
                Code::Or(left)
            }
            (left, right) => Code::Or(vec![left, right]),
        })
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Self::new(match self.code {
            Code::Not(inner) => *inner,
            Code::Bool(value) => Code::Bool(!value),
            code => Code::Not(Box::new(code)),
        })
    }

    /// Start an `if` chain executing `body` when this expression holds.
    pub fn if_true(self, body: Vec<Statement>) -> ConditionalCode {
        ConditionalCode::new(self, body)
    }

    /// Conjunction of all `expressions`, `None` when there is none.
    pub fn all(expressions: impl IntoIterator<Item = Self>) -> Option<Self> {
        expressions.into_iter().reduce(Self::and)
    }

    /// Disjunction of all `expressions`, `None` when there is none.
    pub fn any(expressions: impl IntoIterator<Item = Self>) -> Option<Self> {
        expressions.into_iter().reduce(Self::or)
    }
}
