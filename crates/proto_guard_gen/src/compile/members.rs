use crate::compile::ExternalConstraintFlag;
use crate::compile::IsSet;
use crate::compile::ValidateMethod;

/// Everything generated for one message type.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMembers {
    /// Full protobuf name of the message.
    pub type_name: String,
    /// Name of the Rust struct the members belong to.
    pub rust_name: String,
    pub validate: ValidateMethod,
    /// One helper per referenced field, ordered by field number.
    pub is_set: Vec<IsSet>,
    /// One flag per nested-validated field, ordered by field number.
    pub flags: Vec<ExternalConstraintFlag>,
}

impl GeneratedMembers {
    pub fn is_set_helper(&self, method: &str) -> Option<&IsSet> {
        self.is_set.iter().find(|helper| helper.method_name() == method)
    }
}
