//! Unpacking of `google.protobuf.Any` values for nested validation.

use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::RwLock;
use prost_types::Any;

use crate::ConstraintViolation;
use crate::UnpackError;
use crate::Validate;

/// Type name reported for `Any` values that could not be unpacked.
pub const OPAQUE_TYPE_NAME: &str = "google.protobuf.Any";

type Decoder = fn(&[u8]) -> Result<Box<dyn Validate>, prost::DecodeError>;

static DECODERS: LazyLock<RwLock<HashMap<String, Decoder>>> = LazyLock::new(|| RwLock::new(HashMap::new()));

/// Make `M` unpackable from `Any` values carrying its type url.
pub fn register<M>()
where
    M: prost::Message + prost::Name + Default + Validate + 'static,
{
    fn decode<M>(bytes: &[u8]) -> Result<Box<dyn Validate>, prost::DecodeError>
    where
        M: prost::Message + Default + Validate + 'static,
    {
        Ok(Box::new(M::decode(bytes)?))
    }

    DECODERS.write().insert(M::type_url(), decode::<M>);
}

pub fn try_unpack(any: &Any) -> Result<Box<dyn Validate>, UnpackError> {
    let decoder = DECODERS.read().get(&any.type_url).copied().ok_or_else(|| UnpackError::UnknownType {
        type_url: any.type_url.clone(),
    })?;
    decoder(&any.value).map_err(|source| UnpackError::Decode {
        type_url: any.type_url.clone(),
        source,
    })
}

/// Unpack `any` for validation. Values that cannot be unpacked are logged and
/// validate as empty.
pub fn unpack(any: &Any) -> Box<dyn Validate> {
    match try_unpack(any) {
        Ok(message) => message,
        Err(err) => {
            tracing::warn!(type_url = %any.type_url, error = %err, "skipping validation of unpackable Any");
            Box::new(Opaque)
        }
    }
}

struct Opaque;

impl Validate for Opaque {
    fn validate(&self) -> Vec<ConstraintViolation> {
        Vec::new()
    }

    fn type_name(&self) -> &'static str {
        OPAQUE_TYPE_NAME
    }
}
