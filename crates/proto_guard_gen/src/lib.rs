#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

//! Compiles protobuf validation constraints into Rust validation code.
//!
//! The input is a pre-parsed [`MessageType`] and its ordered [`Constraint`]s.
//! [`ValidationCodeGenerator`] folds the constraints into
//! [`GeneratedMembers`]: the validating method, one is-set helper per
//! referenced field and one external-validation flag per nested-validated
//! field. [`render`](render::render) turns them into Rust items for the prost
//! struct of the message, calling into the `proto_guard` runtime.
//!
//! ```rust,ignore
//! let person = MessageType::new("acme.Person")
//!     .with_field(FieldDeclaration::scalar("age", 1, ScalarType::Int32));
//! let source = generate_source(&person, &[Constraint::range("age", Range::at_least(0))], &GeneratorConfig::default())?;
//! output::write_if_changed(out_dir, "person_validation.rs", &source)?;
//! ```

pub mod code;
pub mod compile;
mod config;
mod error;
pub mod eval;
pub mod model;
pub mod output;
pub mod render;
mod utils;

use proc_macro2::TokenStream;

pub use crate::compile::GeneratedMembers;
pub use crate::compile::ValidationCodeGenerator;
pub use crate::config::GeneratorConfig;
pub use crate::config::should_emit_impl;
pub use crate::error::GenError;
pub use crate::error::GenResult;
use crate::model::Constraint;
use crate::model::MessageType;

/// Compile the constraints of `message` into its validation members.
pub fn generate(message: &MessageType, constraints: &[Constraint], config: &GeneratorConfig) -> GenResult<GeneratedMembers> {
    ValidationCodeGenerator::new(message, config).translate(constraints)
}

/// Compile and render the constraints of `message` as Rust items.
pub fn generate_tokens(message: &MessageType, constraints: &[Constraint], config: &GeneratorConfig) -> GenResult<TokenStream> {
    let members = generate(message, constraints, config)?;
    render::render(&members, config)
}

/// Compile and render the constraints of `message` as Rust source text.
pub fn generate_source(message: &MessageType, constraints: &[Constraint], config: &GeneratorConfig) -> GenResult<String> {
    generate_tokens(message, constraints, config).map(|tokens| tokens.to_string())
}
