use std::collections::BTreeMap;

use tracing::debug;
use tracing::info;

use crate::code::BooleanExpression;
use crate::code::Code;
use crate::code::CompareOp;
use crate::code::DuplicateSet;
use crate::code::Expression;
use crate::code::LocalType;
use crate::code::NewViolation;
use crate::code::Statement;
use crate::code::ViolationList;
use crate::compile::CompiledUnit;
use crate::compile::ConstraintCode;
use crate::compile::ExternalConstraintFlag;
use crate::compile::GeneratedMembers;
use crate::compile::IsSet;
use crate::compile::ValidateMethod;
use crate::config::GeneratorConfig;
use crate::error::GenError;
use crate::error::GenResult;
use crate::model::BoundSide;
use crate::model::Constraint;
use crate::model::ConstraintKind;
use crate::model::DistinctConstraint;
use crate::model::FieldContext;
use crate::model::FieldDeclaration;
use crate::model::FieldId;
use crate::model::GoesConstraint;
use crate::model::MessageType;
use crate::model::PatternConstraint;
use crate::model::RangeConstraint;
use crate::model::RequiredConstraint;
use crate::model::RequiredFieldConstraint;
use crate::model::RequiredOneofConstraint;
use crate::model::ScalarType;
use crate::model::ValidateConstraint;
use crate::utils::to_snake_case;

/// State threaded through the constraint fold.
#[derive(Debug, Default)]
struct Accumulator {
    units: Vec<CompiledUnit>,
    is_set: BTreeMap<FieldId, IsSet>,
    flags: BTreeMap<FieldId, ExternalConstraintFlag>,
}

impl Accumulator {
    fn is_set(&mut self, field: &FieldDeclaration) -> IsSet {
        self.is_set.entry(field.id()).or_insert_with(|| IsSet::of(field)).clone()
    }

    fn flag(&mut self, message: &MessageType, field: &FieldDeclaration) -> ExternalConstraintFlag {
        self.flags.entry(field.id()).or_insert_with(|| ExternalConstraintFlag::for_field(message, field)).clone()
    }
}

/// Compiles the constraints of one message type into its validation members.
pub struct ValidationCodeGenerator<'a> {
    message: &'a MessageType,
    config: &'a GeneratorConfig,
    context: FieldContext<'a>,
}

impl<'a> ValidationCodeGenerator<'a> {
    pub const fn new(message: &'a MessageType, config: &'a GeneratorConfig) -> Self {
        Self {
            message,
            config,
            context: FieldContext::empty(),
        }
    }

    /// Compile `constraints` in order.
    ///
    /// Either every constraint compiles or nothing is returned.
    pub fn translate(&self, constraints: &[Constraint]) -> GenResult<GeneratedMembers> {
        let accumulator = constraints.iter().try_fold(Accumulator::default(), |acc, constraint| self.visit(acc, constraint))?;
        info!(
            type_name = %self.message.full_name,
            units = accumulator.units.len(),
            helpers = accumulator.is_set.len(),
            flags = accumulator.flags.len(),
            "translated validation constraints"
        );
        Ok(GeneratedMembers {
            type_name: self.message.full_name.clone(),
            rust_name: self.message.rust_name.clone(),
            validate: ValidateMethod::new(self.config.method_name.clone(), accumulator.units),
            is_set: accumulator.is_set.into_values().collect(),
            flags: accumulator.flags.into_values().collect(),
        })
    }

    fn visit(&self, mut acc: Accumulator, constraint: &Constraint) -> GenResult<Accumulator> {
        let unit = match constraint {
            Constraint::Range(range) => self.range(&mut acc, range)?,
            Constraint::Required(required) => self.required(&mut acc, required)?,
            Constraint::Pattern(pattern) => self.pattern(&mut acc, pattern)?,
            Constraint::Distinct(distinct) => self.distinct(distinct)?,
            Constraint::GoesWith(goes) => self.goes_with(&mut acc, goes)?,
            Constraint::Validate(validate) => self.validate(&mut acc, validate)?,
            Constraint::RequiredField(required) => self.required_field(&mut acc, required)?,
            Constraint::RequiredOneof(required) => self.required_oneof(required)?,
            Constraint::Custom(custom) => {
                return Err(GenError::CustomConstraint {
                    type_name: self.message.full_name.clone(),
                    name: custom.name.clone(),
                });
            }
        };
        debug!(type_name = %self.message.full_name, %constraint, "compiled constraint");
        acc.units.push(unit);
        Ok(acc)
    }

    // ------------------------------------------------------------------------
    // field constraints
    // ------------------------------------------------------------------------

    fn range(&self, acc: &mut Accumulator, constraint: &RangeConstraint) -> GenResult<CompiledUnit> {
        let field = self.field(&constraint.field, ConstraintKind::Range)?;
        let scalar = field
            .scalar_type()
            .filter(|scalar| scalar.is_numeric())
            .ok_or_else(|| self.unsupported(field, ConstraintKind::Range, "numeric values required"))?;
        if constraint.range.lower.is_none() && constraint.range.upper.is_none() {
            return Err(self.invalid_range(field, "range declares no bound".to_string()));
        }
        let context = self.context.for_child(field);

        let mut code = ConstraintCode::for_field(ConstraintKind::Range, field);
        for side in [BoundSide::Lower, BoundSide::Upper] {
            let Some(bound) = constraint.range.bound(side) else { continue };
            let value = bound
                .value
                .convert_to(scalar)
                .ok_or_else(|| self.invalid_range(field, format!("bound `{}` is not representable as {}", bound.value, scalar.rust_type())))?;
            let op = admitting_op(side, bound.inclusive);
            let template = self.new_violation(constraint.error_message(side, &context), &context).param(value);
            code = code
                .condition_check(move |value_expr| value_expr.compare(op, value).negate())
                .create_violation(move |value_expr| template.clone().field_value(value_expr.clone()).build());
        }
        Ok(code.validate_only_if_set(acc.is_set(field)).compile())
    }

    fn required(&self, acc: &mut Accumulator, constraint: &RequiredConstraint) -> GenResult<CompiledUnit> {
        let field = self.field(&constraint.field, ConstraintKind::Required)?;
        let context = self.context.for_child(field);
        let is_set = acc.is_set(field);
        let template = self.new_violation(constraint.error_message(&context), &context);
        Ok(ConstraintCode::for_field(ConstraintKind::Required, field)
            .condition_check(move |_| is_set.invocation().negate())
            .create_violation(move |_| template.clone().build())
            .validate_as_whole()
            .compile())
    }

    fn pattern(&self, acc: &mut Accumulator, constraint: &PatternConstraint) -> GenResult<CompiledUnit> {
        let field = self.field(&constraint.field, ConstraintKind::Pattern)?;
        if field.scalar_type() != Some(ScalarType::String) {
            return Err(self.unsupported(field, ConstraintKind::Pattern, "string values required"));
        }
        let source = constraint.regex_source();
        regex::Regex::new(&source).map_err(|err| GenError::InvalidPattern {
            type_name: self.message.full_name.clone(),
            field: field.name.clone(),
            regex: constraint.regex.clone(),
            source: Box::new(err),
        })?;
        let context = self.context.for_child(field);
        let template = self.new_violation(constraint.error_message(&context), &context).param(&constraint.regex);

        Ok(ConstraintCode::for_field(ConstraintKind::Pattern, field)
            .condition_check(move |value| value.matches(source.clone()).negate())
            .create_violation(move |value| template.clone().field_value(value.clone()).build())
            .validate_only_if_set(acc.is_set(field))
            .compile())
    }

    fn distinct(&self, constraint: &DistinctConstraint) -> GenResult<CompiledUnit> {
        let field = self.field(&constraint.field, ConstraintKind::Distinct)?;
        if !field.is_collection() {
            return Err(self.unsupported(field, ConstraintKind::Distinct, "repeated or map field required"));
        }
        let context = self.context.for_child(field);
        let local = format!("{}_duplicates", to_snake_case(&field.name));
        let duplicates = Expression::<DuplicateSet>::local(local.clone());
        let template = self
            .new_violation(constraint.error_message(&context), &context)
            .field_value_code(duplicates.code().clone());

        Ok(ConstraintCode::for_field(ConstraintKind::Distinct, field)
            .preparing_declarations(vec![Statement::Declare {
                name: local,
                ty: LocalType::DuplicateSet,
                value: Some(Code::Duplicates(field.clone())),
            }])
            .condition_check(move |_| duplicates.is_empty().negate())
            .create_violation(move |_| template.clone().build())
            .validate_as_whole()
            .compile())
    }

    fn goes_with(&self, acc: &mut Accumulator, constraint: &GoesConstraint) -> GenResult<CompiledUnit> {
        let field = self.field(&constraint.field, ConstraintKind::GoesWith)?;
        let with = self.field(&constraint.with, ConstraintKind::GoesWith)?;
        let context = self.context.for_child(field);
        let condition = acc.is_set(field).invocation().and(acc.is_set(with).invocation().negate());
        let template = self
            .new_violation(constraint.error_message(&context), &context)
            .param(&field.name)
            .param(&with.name);

        Ok(ConstraintCode::for_field(ConstraintKind::GoesWith, field)
            .condition_check(move |_| condition.clone())
            .create_violation(move |_| template.clone().build())
            .compile())
    }

    /// Nested validation: unset yields no violations, otherwise the external
    /// flag picks external or intrinsic validation of the value.
    fn validate(&self, acc: &mut Accumulator, constraint: &ValidateConstraint) -> GenResult<CompiledUnit> {
        let field = self.field(&constraint.field, ConstraintKind::Validate)?;
        if !field.kind.value_type().is_message_like() {
            return Err(self.unsupported(field, ConstraintKind::Validate, "message or Any values required"));
        }
        let context = self.context.for_child(field);
        let path = context.field_path().field_name;
        let local = format!("{}_violations", to_snake_case(&field.name));
        let nested = Expression::<ViolationList>::local(local.clone());
        let assign = |value: Code| {
            vec![Statement::Assign {
                name: local.clone(),
                value,
            }]
        };
        let obtain_violations = acc
            .is_set(field)
            .invocation()
            .negate()
            .if_true(assign(Expression::<ViolationList>::empty().into_code()))
            .else_if(acc.flag(self.message, field).read(), assign(Code::ExternalViolations { field: field.clone(), path }))
            .or_else(assign(Code::IntrinsicViolations(field.clone())));
        let template = self.new_violation(constraint.error_message(&context), &context).nested(nested.clone());

        Ok(ConstraintCode::for_field(ConstraintKind::Validate, field)
            .preparing_declarations(vec![
                Statement::Declare {
                    name: local.clone(),
                    ty: LocalType::ViolationList,
                    value: None,
                },
                obtain_violations,
            ])
            .condition_check(move |_| nested.is_empty().negate())
            .create_violation(move |_| template.clone().build())
            .compile())
    }

    // ------------------------------------------------------------------------
    // message constraints
    // ------------------------------------------------------------------------

    fn required_field(&self, acc: &mut Accumulator, constraint: &RequiredFieldConstraint) -> GenResult<CompiledUnit> {
        if constraint.alternatives.is_empty() {
            return Err(GenError::EmptyRequiredField {
                type_name: self.message.full_name.clone(),
                expression: constraint.expression.clone(),
            });
        }
        let mut alternatives = Vec::with_capacity(constraint.alternatives.len());
        for group in &constraint.alternatives {
            let mut all_set = Vec::with_capacity(group.len());
            for name in group {
                let field = self.field(name, ConstraintKind::RequiredField)?;
                all_set.push(acc.is_set(field).invocation());
            }
            alternatives.push(BooleanExpression::all(all_set).unwrap_or(BooleanExpression::TRUE));
        }
        let condition = BooleanExpression::any(alternatives).unwrap_or(BooleanExpression::TRUE).negate();
        let template = NewViolation::new(&self.message.full_name, RequiredFieldConstraint::error_message()).param(&constraint.expression);

        Ok(ConstraintCode::for_message(ConstraintKind::RequiredField)
            .condition_check(move |_| condition.clone())
            .create_violation(move |_| template.clone().build())
            .compile())
    }

    fn required_oneof(&self, constraint: &RequiredOneofConstraint) -> GenResult<CompiledUnit> {
        let oneof = self.message.oneof(&constraint.oneof).ok_or_else(|| GenError::UnknownOneof {
            type_name: self.message.full_name.clone(),
            oneof: constraint.oneof.clone(),
        })?;
        let template = NewViolation::new(&self.message.full_name, constraint.error_message(&self.context)).at(&self.context);
        let unset = BooleanExpression::new(Code::OneofUnset(oneof.name.clone()));

        Ok(ConstraintCode::for_message(ConstraintKind::RequiredOneof)
            .condition_check(move |_| unset.clone())
            .create_violation(move |_| template.clone().build())
            .compile())
    }

    // ------------------------------------------------------------------------
    // helpers
    // ------------------------------------------------------------------------

    fn field(&self, name: &str, kind: ConstraintKind) -> GenResult<&'a FieldDeclaration> {
        self.message.field(name).ok_or_else(|| GenError::UnknownField {
            type_name: self.message.full_name.clone(),
            field: name.to_string(),
            kind,
        })
    }

    fn new_violation(&self, msg_format: String, context: &FieldContext<'_>) -> NewViolation {
        NewViolation::new(&self.message.full_name, msg_format).at(context)
    }

    fn unsupported(&self, field: &FieldDeclaration, kind: ConstraintKind, reason: &'static str) -> GenError {
        GenError::UnsupportedField {
            type_name: self.message.full_name.clone(),
            field: field.name.clone(),
            kind,
            reason,
        }
    }

    fn invalid_range(&self, field: &FieldDeclaration, reason: String) -> GenError {
        GenError::InvalidRange {
            type_name: self.message.full_name.clone(),
            field: field.name.clone(),
            reason,
        }
    }
}

/// Comparison that holds for a value on the allowed `side` of a bound.
///
/// Checks negate it, so NaN falls outside every range.
const fn admitting_op(side: BoundSide, inclusive: bool) -> CompareOp {
    match (side, inclusive) {
        (BoundSide::Lower, true) => CompareOp::Ge,
        (BoundSide::Lower, false) => CompareOp::Gt,
        (BoundSide::Upper, true) => CompareOp::Le,
        (BoundSide::Upper, false) => CompareOp::Lt,
    }
}
