#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

//! Runtime support for validation code generated by `proto_guard_gen`.
//!
//! Generated `validate` methods only reference items of this crate: the
//! violation record, field paths, duplicate detection, pattern matching,
//! `Any` unpacking and the dispatch to external validators and custom
//! constraints.

pub mod any;
mod duplicates;
mod error;
mod field_path;
pub mod pattern;
mod validate;
mod violation;

pub use crate::duplicates::find_duplicates;
pub use crate::error::UnpackError;
pub use crate::field_path::FieldContext;
pub use crate::field_path::FieldPath;
pub use crate::validate::CustomConstraint;
pub use crate::validate::ExternalValidator;
pub use crate::validate::Validate;
pub use crate::validate::register_custom_constraint;
pub use crate::validate::register_external_validator;
pub use crate::validate::validate_at_runtime;
pub use crate::validate::violations_of;
pub use crate::validate::violations_of_custom_constraints;
pub use crate::violation::ConstraintViolation;
pub use crate::violation::format_message;
