use crate::code::BooleanExpression;
use crate::code::Code;
use crate::model::FieldDeclaration;

/// Type of a local variable of the validating method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalType {
    ViolationList,
    DuplicateSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let name = value;`, or a deferred `let name;` assigned by later branches.
    Declare { name: String, ty: LocalType, value: Option<Code> },
    Assign { name: String, value: Code },
    If { branches: Vec<(Code, Vec<Statement>)>, otherwise: Option<Vec<Statement>> },
    /// Run `body` for every element of a repeated field, every value of a map.
    ForEach { field: FieldDeclaration, body: Vec<Statement> },
    /// Append one violation (a `Code::NewViolation`) to the accumulator.
    Accumulate(Code),
    /// Append every violation of a list to the accumulator.
    AccumulateAll(Code),
}

/// An `if` / `else if` / `else` chain under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalCode {
    branches: Vec<(Code, Vec<Statement>)>,
}

impl ConditionalCode {
    pub fn new(condition: BooleanExpression, body: Vec<Statement>) -> Self {
        Self {
            branches: vec![(condition.into_code(), body)],
        }
    }

    #[must_use]
    pub fn else_if(mut self, condition: BooleanExpression, body: Vec<Statement>) -> Self {
        self.branches.push((condition.into_code(), body));
        self
    }

    pub fn or_else(self, body: Vec<Statement>) -> Statement {
        Statement::If {
            branches: self.branches,
            otherwise: Some(body),
        }
    }
}

impl From<ConditionalCode> for Statement {
    fn from(conditional: ConditionalCode) -> Self {
        Self::If {
            branches: conditional.branches,
            otherwise: None,
        }
    }
}
