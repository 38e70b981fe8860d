//! Typed intermediate representation of the generated validation code.

mod expr;
mod new_violation;
mod stmt;

pub use expr::*;
pub use new_violation::NewViolation;
pub use stmt::ConditionalCode;
pub use stmt::LocalType;
pub use stmt::Statement;
