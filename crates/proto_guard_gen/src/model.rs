//! Pre-parsed descriptors and the constraints attached to them.

pub mod constraint;
mod field_context;
mod message;
mod range;

pub use constraint::*;
pub use field_context::FieldContext;
pub use field_context::error_message;
pub use message::FieldDeclaration;
pub use message::FieldId;
pub use message::FieldKind;
pub use message::MessageType;
pub use message::NumericClass;
pub use message::OneofDeclaration;
pub use message::ScalarType;
pub use message::ValueType;
pub use range::Bound;
pub use range::BoundSide;
pub use range::Number;
pub use range::ParseRangeError;
pub use range::Range;
