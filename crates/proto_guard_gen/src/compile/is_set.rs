use crate::code::BooleanExpression;
use crate::code::Code;
use crate::model::FieldDeclaration;
use crate::utils::to_snake_case;

/// Runtime "field holds a value" check of one field.
///
/// The helper name and body depend only on the field, so every constraint
/// referencing the same field shares one generated helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsSet {
    field: FieldDeclaration,
    method: String,
}

impl IsSet {
    pub fn of(field: &FieldDeclaration) -> Self {
        Self {
            field: field.clone(),
            method: format!("{}_is_set", to_snake_case(&field.name)),
        }
    }

    pub fn field(&self) -> &FieldDeclaration {
        &self.field
    }

    pub fn method_name(&self) -> &str {
        &self.method
    }

    /// Body of the helper, evaluated against the message parameter.
    pub fn body(&self) -> BooleanExpression {
        let field = &self.field;
        let code = if field.oneof.is_some() {
            Code::OneofCase(field.clone())
        } else if field.is_collection() {
            Code::Not(Box::new(Code::IsEmpty(Box::new(Code::FieldValue(field.clone())))))
        } else if field.explicit_presence || field.kind.value_type().is_message_like() {
            Code::HasField(field.clone())
        } else {
            Code::NotDefault(field.clone())
        };
        BooleanExpression::new(code)
    }

    /// Call of the helper from the validating method.
    pub fn invocation(&self) -> BooleanExpression {
        BooleanExpression::new(Code::IsSetCall {
            method: self.method.clone(),
            field: self.field.clone(),
        })
    }
}
