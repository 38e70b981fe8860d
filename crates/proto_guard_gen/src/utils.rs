//! Centralized utilities for validation code generation

use proc_macro2::Span;
use syn::Ident;

pub mod string_helpers;

pub use string_helpers::*;

// ============================================================================
// IDENTIFIER HELPERS
// ============================================================================

/// Whether `name` can be used as a plain Rust identifier.
pub fn is_valid_ident(name: &str) -> bool {
    syn::parse_str::<Ident>(name).is_ok()
}

/// Rust identifier for a protobuf name, escaping keywords the way prost does.
pub fn rust_ident(name: &str) -> Ident {
    match name {
        // Not allowed as raw identifiers, prost appends an underscore.
        "self" | "super" | "crate" | "Self" => Ident::new(&format!("{name}_"), Span::call_site()),
        _ if is_valid_ident(name) => Ident::new(name, Span::call_site()),
        _ => Ident::new_raw(name, Span::call_site()),
    }
}
