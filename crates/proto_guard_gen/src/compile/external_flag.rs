use crate::code::BooleanExpression;
use crate::code::Code;
use crate::model::FieldDeclaration;
use crate::model::MessageType;
use crate::utils::to_upper_snake_case;

/// Switch between intrinsic and external validation of a nested field.
///
/// Generated as a `static AtomicBool` defaulting to `false` (intrinsic);
/// callers wiring in an external validator registry set it at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalConstraintFlag {
    field: FieldDeclaration,
    name: String,
}

impl ExternalConstraintFlag {
    pub fn for_field(message: &MessageType, field: &FieldDeclaration) -> Self {
        let name = format!("{}_{}_EXTERNAL_VALIDATION", to_upper_snake_case(&message.rust_name), to_upper_snake_case(&field.name));
        Self { field: field.clone(), name }
    }

    pub fn field(&self) -> &FieldDeclaration {
        &self.field
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read(&self) -> BooleanExpression {
        BooleanExpression::new(Code::FlagRead(self.name.clone()))
    }
}
