//! Validation entry points and the process-wide dispatch registries.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::LazyLock;

use parking_lot::RwLock;

use crate::ConstraintViolation;
use crate::FieldContext;

/// A message type with generated (intrinsic) validation.
pub trait Validate {
    /// Run the compiled constraints of this message.
    fn validate(&self) -> Vec<ConstraintViolation>;

    /// Full protobuf name, e.g. `acme.user.Person`.
    fn type_name(&self) -> &'static str;
}

/// Validation logic supplied at runtime in place of the intrinsic checks.
pub trait ExternalValidator: Send + Sync {
    fn validate(&self, message: &dyn Validate, context: &FieldContext) -> Vec<ConstraintViolation>;
}

/// A constraint that cannot be compiled ahead of time.
pub trait CustomConstraint: Send + Sync {
    fn validate(&self, message: &dyn Validate) -> Vec<ConstraintViolation>;
}

type Registry<T> = LazyLock<RwLock<BTreeMap<String, Vec<Arc<T>>>>>;

static EXTERNAL_VALIDATORS: Registry<dyn ExternalValidator> = LazyLock::new(|| RwLock::new(BTreeMap::new()));
static CUSTOM_CONSTRAINTS: Registry<dyn CustomConstraint> = LazyLock::new(|| RwLock::new(BTreeMap::new()));

/// Violations found by the message's own compiled checks.
pub fn violations_of(message: &dyn Validate) -> Vec<ConstraintViolation> {
    message.validate()
}

/// Validate a nested field value with the externally registered validators.
///
/// Types with no registered validator fall back to intrinsic validation.
/// `Any` values that could not be unpacked are never dispatched.
pub fn validate_at_runtime(message: &dyn Validate, context: &FieldContext) -> Vec<ConstraintViolation> {
    if message.type_name() == crate::any::OPAQUE_TYPE_NAME {
        tracing::debug!(path = %context.path, "unpackable Any, skipping external validators");
        return message.validate();
    }
    let validators = registered(&EXTERNAL_VALIDATORS, message.type_name());
    if validators.is_empty() {
        tracing::debug!(type_name = message.type_name(), "no external validator registered, using intrinsic checks");
        return message.validate();
    }
    validators.iter().flat_map(|validator| validator.validate(message, context)).collect()
}

/// Violations reported by the custom constraints registered for the type.
pub fn violations_of_custom_constraints(message: &dyn Validate) -> Vec<ConstraintViolation> {
    registered(&CUSTOM_CONSTRAINTS, message.type_name())
        .iter()
        .flat_map(|constraint| constraint.validate(message))
        .collect()
}

pub fn register_external_validator(type_name: impl Into<String>, validator: Arc<dyn ExternalValidator>) {
    let type_name = type_name.into();
    tracing::debug!(%type_name, "registering external validator");
    EXTERNAL_VALIDATORS.write().entry(type_name).or_default().push(validator);
}

pub fn register_custom_constraint(type_name: impl Into<String>, constraint: Arc<dyn CustomConstraint>) {
    let type_name = type_name.into();
    tracing::debug!(%type_name, "registering custom constraint");
    CUSTOM_CONSTRAINTS.write().entry(type_name).or_default().push(constraint);
}

// Snapshot so registered callbacks run without holding the lock.
fn registered<T: ?Sized>(registry: &Registry<T>, type_name: &str) -> Vec<Arc<T>> {
    registry.read().get(type_name).cloned().unwrap_or_default()
}
