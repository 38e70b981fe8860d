use crate::code::Code;
use crate::code::Expression;
use crate::code::FieldValue;
use crate::code::Violation;
use crate::code::ViolationList;
use crate::model::FieldContext;

/// Construction of one `ConstraintViolation`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewViolation {
    /// Message template, generation-time placeholders already resolved.
    pub msg_format: String,
    pub params: Vec<String>,
    pub type_name: String,
    pub field_path: Vec<String>,
    /// Offending value, rendered with `{:?}` at runtime.
    pub field_value: Option<Code>,
    pub nested: Option<Code>,
}

impl NewViolation {
    pub fn new(type_name: impl Into<String>, msg_format: impl Into<String>) -> Self {
        Self {
            msg_format: msg_format.into(),
            params: Vec::new(),
            type_name: type_name.into(),
            field_path: Vec::new(),
            field_value: None,
            nested: None,
        }
    }

    #[must_use]
    pub fn at(mut self, context: &FieldContext<'_>) -> Self {
        self.field_path = context.field_path().field_name;
        self
    }

    #[must_use]
    pub fn param(mut self, param: impl ToString) -> Self {
        self.params.push(param.to_string());
        self
    }

    #[must_use]
    pub fn field_value(mut self, value: Expression<FieldValue>) -> Self {
        self.field_value = Some(value.into_code());
        self
    }

    #[must_use]
    pub fn field_value_code(mut self, value: Code) -> Self {
        self.field_value = Some(value);
        self
    }

    #[must_use]
    pub fn nested(mut self, violations: Expression<ViolationList>) -> Self {
        self.nested = Some(violations.into_code());
        self
    }

    pub fn build(self) -> Expression<Violation> {
        Expression::new(Code::NewViolation(Box::new(self)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldDeclaration;
    use crate::model::ScalarType;

    #[test]
    fn test_violation_points_at_field() {
        let age = FieldDeclaration::scalar("age", 1, ScalarType::Int32);
        let root = FieldContext::empty();
        let violation = NewViolation::new("acme.Person", "The number must be greater than {}.")
            .at(&root.for_child(&age))
            .param(0)
            .field_value(Expression::field(age.clone()));

        assert_eq!(violation.field_path, vec!["age".to_string()]);
        assert_eq!(violation.params, vec!["0".to_string()]);
        assert_eq!(violation.field_value, Some(Code::FieldValue(age)));
        assert!(matches!(violation.build().code(), Code::NewViolation(_)));
    }
}
