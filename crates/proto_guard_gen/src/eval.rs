//! Reference interpreter for generated members.

mod interpreter;
mod value;

pub use interpreter::EvalError;
pub use interpreter::Interpreter;
pub use value::MessageValue;
pub use value::Value;
