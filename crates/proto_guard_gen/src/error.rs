use crate::model::ConstraintKind;
use crate::model::ParseRangeError;

/// Fatal generation failure. Generation of the message type is aborted and no
/// members are produced.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenError {
    #[error("{type_name}: custom constraint `{name}` cannot be compiled ahead of time")]
    CustomConstraint { type_name: String, name: String },

    #[error("{type_name}: `(required_field)` option `{expression}` declares no field alternatives")]
    EmptyRequiredField { type_name: String, expression: String },

    #[error("{type_name}: unknown field `{field}` referenced by a {kind} constraint")]
    UnknownField { type_name: String, field: String, kind: ConstraintKind },

    #[error("{type_name}: unknown oneof `{oneof}`")]
    UnknownOneof { type_name: String, oneof: String },

    #[error("{type_name}.{field}: invalid regular expression `{regex}`")]
    InvalidPattern {
        type_name: String,
        field: String,
        regex: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("{type_name}.{field}: {reason}")]
    InvalidRange { type_name: String, field: String, reason: String },

    #[error("{type_name}.{field}: {kind} constraint does not apply to this field ({reason})")]
    UnsupportedField {
        type_name: String,
        field: String,
        kind: ConstraintKind,
        reason: &'static str,
    },

    #[error("invalid generator configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse generator configuration")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Range(#[from] ParseRangeError),

    #[error("failed to write generated source")]
    Io(#[from] std::io::Error),
}

pub type GenResult<T> = Result<T, GenError>;
