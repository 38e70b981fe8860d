use crate::code::BooleanExpression;
use crate::code::Code;
use crate::code::Expression;
use crate::code::FieldValue;
use crate::code::Statement;
use crate::code::Violation;
use crate::compile::IsSet;
use crate::model::ConstraintKind;
use crate::model::FieldDeclaration;

type ConditionCheck<'a> = Box<dyn Fn(&Expression<FieldValue>) -> BooleanExpression + 'a>;
type CreateViolation<'a> = Box<dyn Fn(&Expression<FieldValue>) -> Expression<Violation> + 'a>;

/// Whether a check is guarded by the is-set test of its field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Policy {
    /// Vacuously satisfied on an unset field.
    OnlyIfSet(IsSet),
    /// The condition is complete as is, absence may itself be the violation.
    AsWhole,
    /// The condition encodes its own is-set handling.
    #[default]
    Default,
}

/// Compiled code of one constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledUnit {
    pub kind: ConstraintKind,
    /// Executed unconditionally before the checks.
    pub declarations: Vec<Statement>,
    pub checks: Vec<Statement>,
}

impl CompiledUnit {
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.declarations.iter().chain(&self.checks)
    }
}

struct Check<'a> {
    condition: ConditionCheck<'a>,
    violation: CreateViolation<'a>,
}

/// Builder turning declarations, conditions, violations and a guard policy
/// into a [`CompiledUnit`].
pub struct ConstraintCode<'a> {
    kind: ConstraintKind,
    field: Option<FieldDeclaration>,
    policy: Policy,
    declarations: Vec<Statement>,
    checks: Vec<Check<'a>>,
    pending: Option<ConditionCheck<'a>>,
}

impl<'a> ConstraintCode<'a> {
    /// Unit checking one field; closures receive the field value.
    pub fn for_field(kind: ConstraintKind, field: &FieldDeclaration) -> Self {
        Self::new(kind, Some(field.clone()))
    }

    /// Unit checking the message as a whole.
    pub fn for_message(kind: ConstraintKind) -> Self {
        Self::new(kind, None)
    }

    fn new(kind: ConstraintKind, field: Option<FieldDeclaration>) -> Self {
        Self {
            kind,
            field,
            policy: Policy::Default,
            declarations: Vec::new(),
            checks: Vec::new(),
            pending: None,
        }
    }

    #[must_use]
    pub fn condition_check(mut self, condition: impl Fn(&Expression<FieldValue>) -> BooleanExpression + 'a) -> Self {
        self.pending = Some(Box::new(condition));
        self
    }

    /// Pair the violation with the preceding [`Self::condition_check`].
    #[must_use]
    pub fn create_violation(mut self, violation: impl Fn(&Expression<FieldValue>) -> Expression<Violation> + 'a) -> Self {
        let condition = self.pending.take().unwrap_or_else(|| Box::new(|_: &Expression<FieldValue>| BooleanExpression::TRUE));
        self.checks.push(Check {
            condition,
            violation: Box::new(violation),
        });
        self
    }

    #[must_use]
    pub fn validate_only_if_set(mut self, is_set: IsSet) -> Self {
        self.policy = Policy::OnlyIfSet(is_set);
        self
    }

    #[must_use]
    pub fn validate_as_whole(mut self) -> Self {
        self.policy = Policy::AsWhole;
        self
    }

    #[must_use]
    pub fn preparing_declarations(mut self, declarations: Vec<Statement>) -> Self {
        self.declarations.extend(declarations);
        self
    }

    pub fn compile(self) -> CompiledUnit {
        let checks = match (&self.policy, &self.field) {
            (Policy::OnlyIfSet(is_set), Some(field)) if field.is_collection() => {
                let element = Expression::element();
                let body = self.checks.iter().map(|check| guarded(check, &element, None)).collect();
                vec![
                    is_set
                        .invocation()
                        .if_true(vec![Statement::ForEach {
                            field: field.clone(),
                            body,
                        }])
                        .into(),
                ]
            }
            (Policy::OnlyIfSet(is_set), _) => {
                let value = self.value();
                self.checks.iter().map(|check| guarded(check, &value, Some(is_set))).collect()
            }
            (Policy::AsWhole | Policy::Default, _) => {
                let value = self.value();
                self.checks.iter().map(|check| guarded(check, &value, None)).collect()
            }
        };
        CompiledUnit {
            kind: self.kind,
            declarations: self.declarations,
            checks,
        }
    }

    // Message-level units hand the message itself to their closures.
    fn value(&self) -> Expression<FieldValue> {
        self.field.clone().map_or_else(|| Expression::new(Code::Message), Expression::field)
    }
}

fn guarded(check: &Check<'_>, value: &Expression<FieldValue>, is_set: Option<&IsSet>) -> Statement {
    let condition = (check.condition)(value);
    let condition = match is_set {
        Some(is_set) => is_set.invocation().and(condition),
        None => condition,
    };
    condition.if_true(vec![Statement::Accumulate((check.violation)(value).into_code())]).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CompareOp;
    use crate::code::NewViolation;
    use crate::model::Number;
    use crate::model::ScalarType;
    use crate::model::ValueType;

    fn negative(value: &Expression<FieldValue>) -> BooleanExpression {
        value.compare(CompareOp::Lt, Number::Int(0))
    }

    fn violation(_: &Expression<FieldValue>) -> Expression<Violation> {
        NewViolation::new("t.T", "negative").build()
    }

    #[test]
    fn test_only_if_set_guards_singular_field() {
        let age = FieldDeclaration::scalar("age", 1, ScalarType::Int32);
        let unit = ConstraintCode::for_field(ConstraintKind::Range, &age)
            .condition_check(negative)
            .create_violation(violation)
            .validate_only_if_set(IsSet::of(&age))
            .compile();

        assert_eq!(unit.checks.len(), 1);
        let Statement::If { branches, .. } = &unit.checks[0] else { panic!("expected an if") };
        let Code::And(parts) = &branches[0].0 else { panic!("expected a guarded condition") };
        assert!(matches!(parts[0], Code::IsSetCall { .. }));
        assert!(matches!(parts[1], Code::Compare { .. }));
    }

    #[test]
    fn test_only_if_set_iterates_collections() {
        let scores = FieldDeclaration::repeated("scores", 2, ValueType::Scalar(ScalarType::Int64));
        let unit = ConstraintCode::for_field(ConstraintKind::Range, &scores)
            .condition_check(negative)
            .create_violation(violation)
            .validate_only_if_set(IsSet::of(&scores))
            .compile();

        let Statement::If { branches, .. } = &unit.checks[0] else { panic!("expected an if") };
        assert!(matches!(branches[0].0, Code::IsSetCall { .. }));
        let Statement::ForEach { body, .. } = &branches[0].1[0] else { panic!("expected a loop") };
        let Statement::If { branches, .. } = &body[0] else { panic!("expected an element check") };
        let Code::Compare { value, .. } = &branches[0].0 else { panic!("expected a comparison") };
        assert_eq!(**value, Code::Element);
    }

    #[test]
    fn test_as_whole_keeps_condition_and_declarations() {
        let age = FieldDeclaration::scalar("age", 1, ScalarType::Int32);
        let declaration = Statement::Assign {
            name: "x".into(),
            value: Code::EmptyList,
        };
        let unit = ConstraintCode::for_field(ConstraintKind::Required, &age)
            .preparing_declarations(vec![declaration.clone()])
            .condition_check(negative)
            .create_violation(violation)
            .validate_as_whole()
            .compile();

        assert_eq!(unit.declarations, vec![declaration]);
        let Statement::If { branches, .. } = &unit.checks[0] else { panic!("expected an if") };
        assert!(matches!(branches[0].0, Code::Compare { .. }));
        assert_eq!(unit.statements().count(), 2);
    }
}
