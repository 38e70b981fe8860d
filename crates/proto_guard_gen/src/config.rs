//! Generator settings, loadable from TOML.

use serde::Deserialize;

use crate::error::GenError;
use crate::error::GenResult;
use crate::utils::is_valid_ident;

const EMIT_IMPL_ENV: &str = "PROTO_GUARD_EMIT_IMPL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Name of the generated validating method.
    pub method_name: String,
    /// Name of the message parameter of the generated methods.
    pub message_param: String,
    /// Path of the runtime crate as seen from the generated code.
    pub runtime_crate: String,
    /// Emit `impl Validate` for every generated type.
    pub emit_validate_impl: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            method_name: "validate".to_string(),
            message_param: "msg".to_string(),
            runtime_crate: "::proto_guard".to_string(),
            emit_validate_impl: should_emit_impl(),
        }
    }
}

/// Whether to emit `impl Validate`.
/// Priority: env var > feature flag > default (true)
pub fn should_emit_impl() -> bool {
    match std::env::var(EMIT_IMPL_ENV).ok().as_deref() {
        Some("0" | "false" | "False" | "FALSE") => false,
        Some("1" | "true" | "True" | "TRUE") => true,
        _ => cfg!(feature = "validate-impl"),
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(source: &str) -> GenResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validated()
    }

    #[must_use]
    pub fn with_method_name(mut self, name: impl Into<String>) -> Self {
        self.method_name = name.into();
        self
    }

    #[must_use]
    pub fn with_runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }

    #[must_use]
    pub const fn with_validate_impl(mut self, emit: bool) -> Self {
        self.emit_validate_impl = emit;
        self
    }

    pub fn validated(self) -> GenResult<Self> {
        for (what, name) in [("method_name", &self.method_name), ("message_param", &self.message_param)] {
            if !is_valid_ident(name) {
                return Err(GenError::InvalidConfig(format!("{what} `{name}` is not a valid identifier")));
            }
        }
        self.runtime_path()?;
        Ok(self)
    }

    pub(crate) fn runtime_path(&self) -> GenResult<syn::Path> {
        syn::parse_str(&self.runtime_crate).map_err(|err| GenError::InvalidConfig(format!("runtime_crate `{}`: {err}", self.runtime_crate)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.method_name, "validate");
        assert_eq!(config.message_param, "msg");
        assert_eq!(config.runtime_crate, "::proto_guard");
    }

    #[test]
    fn test_from_toml() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            method_name = "check"
            runtime_crate = "crate::runtime"
            emit_validate_impl = false
            "#,
        )
        .unwrap();
        assert_eq!(config.method_name, "check");
        assert_eq!(config.message_param, "msg");
        assert!(!config.emit_validate_impl);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(GeneratorConfig::from_toml_str("method_name = \"fn\""), Err(GenError::InvalidConfig(_))));
        assert!(matches!(GeneratorConfig::from_toml_str("runtime_crate = \"::a::\""), Err(GenError::InvalidConfig(_))));
        assert!(matches!(GeneratorConfig::from_toml_str("unknown = 1"), Err(GenError::Toml(_))));
    }
}
