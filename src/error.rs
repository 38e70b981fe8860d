/// Failure to turn a packed `Any` into a validatable message.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum UnpackError {
    #[error("no message type registered for type url `{type_url}`")]
    UnknownType { type_url: String },

    #[error("failed to decode `{type_url}`: {source}")]
    Decode {
        type_url: String,
        #[source]
        source: prost::DecodeError,
    },
}
