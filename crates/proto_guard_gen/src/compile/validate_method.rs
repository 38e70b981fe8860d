use crate::code::Code;
use crate::code::Statement;
use crate::compile::CompiledUnit;

/// Name of the violation accumulator of the validating method.
pub const ACCUMULATOR: &str = "violations";

/// The public validating method: accumulator, units in constraint order,
/// custom constraint dispatch, return.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidateMethod {
    name: String,
    units: Vec<CompiledUnit>,
    custom_dispatch: Statement,
}

impl ValidateMethod {
    pub fn new(name: impl Into<String>, units: Vec<CompiledUnit>) -> Self {
        Self {
            name: name.into(),
            units,
            custom_dispatch: Statement::AccumulateAll(Code::CustomViolations),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &[CompiledUnit] {
        &self.units
    }

    /// Everything between the accumulator declaration and the return.
    pub fn body(&self) -> impl Iterator<Item = &Statement> {
        self.units.iter().flat_map(CompiledUnit::statements).chain(std::iter::once(&self.custom_dispatch))
    }
}
