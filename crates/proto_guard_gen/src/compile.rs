//! Constraint compiler: one [`CompiledUnit`] per constraint, assembled into
//! the [`GeneratedMembers`] of a message type.

mod constraint_code;
mod external_flag;
mod generator;
mod is_set;
mod members;
mod validate_method;

pub use constraint_code::CompiledUnit;
pub use constraint_code::ConstraintCode;
pub use constraint_code::Policy;
pub use external_flag::ExternalConstraintFlag;
pub use generator::ValidationCodeGenerator;
pub use is_set::IsSet;
pub use members::GeneratedMembers;
pub use validate_method::ACCUMULATOR;
pub use validate_method::ValidateMethod;
