use std::collections::BTreeMap;
use std::collections::BTreeSet;

use proto_guard::ConstraintViolation;
use proto_guard::FieldPath;

use crate::code::Code;
use crate::code::CompareOp;
use crate::code::NewViolation;
use crate::code::Statement;
use crate::compile::GeneratedMembers;
use crate::eval::MessageValue;
use crate::eval::Value;
use crate::eval::value::debug_list;
use crate::model::FieldDeclaration;
use crate::model::FieldKind;
use crate::model::Number;
use crate::model::ScalarType;
use crate::model::ValueType;

type ExternalFn = Box<dyn Fn(&MessageValue, &proto_guard::FieldContext) -> Vec<ConstraintViolation> + Send + Sync>;
type CustomFn = Box<dyn Fn(&MessageValue) -> Vec<ConstraintViolation> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EvalError {
    #[error("no members registered for `{0}`")]
    UnknownType(String),
    #[error("`{type_name}` has no is-set helper `{method}`")]
    UnknownHelper { type_name: String, method: String },
    #[error("local `{0}` read before assignment")]
    UnassignedLocal(String),
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: String },
}

/// Result of evaluating one expression.
#[derive(Debug, Clone)]
enum Data {
    Bool(bool),
    Value(Option<Value>),
    Violations(Vec<ConstraintViolation>),
    Duplicates(Vec<Value>),
    Violation(ConstraintViolation),
}

impl Data {
    fn describe(&self) -> String {
        format!("{self:?}")
    }

    fn into_bool(self) -> Result<bool, EvalError> {
        match self {
            Self::Bool(value) => Ok(value),
            other => Err(mismatch("a boolean", &other)),
        }
    }

    fn into_violations(self) -> Result<Vec<ConstraintViolation>, EvalError> {
        match self {
            Self::Violations(violations) => Ok(violations),
            other => Err(mismatch("a violation list", &other)),
        }
    }

    fn is_empty(&self) -> Result<bool, EvalError> {
        match self {
            Self::Violations(items) => Ok(items.is_empty()),
            Self::Duplicates(items) => Ok(items.is_empty()),
            Self::Value(None) => Ok(true),
            Self::Value(Some(value @ (Value::List(_) | Value::Map(_) | Value::String(_) | Value::Bytes(_)))) => Ok(value.is_default()),
            other => Err(mismatch("a collection", other)),
        }
    }

    fn debug_string(&self) -> String {
        match self {
            Self::Value(Some(value)) => value.debug_string(),
            Self::Duplicates(items) => debug_list(items.iter()),
            other => other.describe(),
        }
    }
}

fn mismatch(expected: &'static str, found: &Data) -> EvalError {
    EvalError::TypeMismatch {
        expected,
        found: found.describe(),
    }
}

/// Executes generated members against dynamic messages.
///
/// Produces the violations the rendered code produces for the equivalent
/// prost message.
#[derive(Default)]
pub struct Interpreter {
    members: BTreeMap<String, GeneratedMembers>,
    flags: BTreeSet<String>,
    external: Option<ExternalFn>,
    custom: Option<CustomFn>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the members of one message type, replacing earlier ones.
    #[must_use]
    pub fn with_members(mut self, members: GeneratedMembers) -> Self {
        self.members.insert(members.type_name.clone(), members);
        self
    }

    /// Stand-in for the external validator registry.
    #[must_use]
    pub fn with_external_validator(mut self, validator: impl Fn(&MessageValue, &proto_guard::FieldContext) -> Vec<ConstraintViolation> + Send + Sync + 'static) -> Self {
        self.external = Some(Box::new(validator));
        self
    }

    /// Stand-in for the custom constraint registry.
    #[must_use]
    pub fn with_custom_constraints(mut self, constraints: impl Fn(&MessageValue) -> Vec<ConstraintViolation> + Send + Sync + 'static) -> Self {
        self.custom = Some(Box::new(constraints));
        self
    }

    /// Store `enabled` in the external validation flag `name`.
    pub fn set_flag(&mut self, name: &str, enabled: bool) {
        if enabled {
            self.flags.insert(name.to_string());
        } else {
            self.flags.remove(name);
        }
    }

    /// Run the validating method of the message's type.
    pub fn validate(&self, message: &MessageValue) -> Result<Vec<ConstraintViolation>, EvalError> {
        let members = self.members.get(&message.type_name).ok_or_else(|| EvalError::UnknownType(message.type_name.clone()))?;
        let mut frame = Frame {
            interpreter: self,
            members,
            message,
            locals: BTreeMap::new(),
            element: None,
            violations: Vec::new(),
        };
        for statement in members.validate.body() {
            frame.execute(statement)?;
        }
        Ok(frame.violations)
    }

    fn custom_violations(&self, message: &MessageValue) -> Vec<ConstraintViolation> {
        self.custom.as_ref().map(|custom| custom(message)).unwrap_or_default()
    }

    // Types without an external validator fall back to intrinsic validation.
    fn external_violations(&self, message: &MessageValue, context: &proto_guard::FieldContext) -> Result<Vec<ConstraintViolation>, EvalError> {
        match &self.external {
            Some(external) => Ok(external(message, context)),
            None => self.validate(message),
        }
    }
}

/// Execution state of one validating-method call.
struct Frame<'a> {
    interpreter: &'a Interpreter,
    members: &'a GeneratedMembers,
    message: &'a MessageValue,
    locals: BTreeMap<String, Data>,
    element: Option<Value>,
    violations: Vec<ConstraintViolation>,
}

impl Frame<'_> {
    fn execute(&mut self, statement: &Statement) -> Result<(), EvalError> {
        match statement {
            Statement::Declare { name, value, .. } => {
                if let Some(value) = value {
                    let value = self.eval(value)?;
                    self.locals.insert(name.clone(), value);
                } else {
                    self.locals.remove(name);
                }
            }
            Statement::Assign { name, value } => {
                let value = self.eval(value)?;
                self.locals.insert(name.clone(), value);
            }
            Statement::If { branches, otherwise } => {
                for (condition, body) in branches {
                    if self.eval(condition)?.into_bool()? {
                        return self.execute_all(body);
                    }
                }
                if let Some(body) = otherwise {
                    self.execute_all(body)?;
                }
            }
            Statement::ForEach { field, body } => {
                let elements: Vec<Value> = self.field(field).map(|value| value.elements().into_iter().cloned().collect()).unwrap_or_default();
                for element in elements {
                    self.element = Some(element);
                    self.execute_all(body)?;
                }
                self.element = None;
            }
            Statement::Accumulate(violation) => match self.eval(violation)? {
                Data::Violation(violation) => self.violations.push(violation),
                other => return Err(mismatch("a violation", &other)),
            },
            Statement::AccumulateAll(violations) => {
                let violations = self.eval(violations)?.into_violations()?;
                self.violations.extend(violations);
            }
        }
        Ok(())
    }

    fn execute_all(&mut self, statements: &[Statement]) -> Result<(), EvalError> {
        statements.iter().try_for_each(|statement| self.execute(statement))
    }

    fn eval(&self, code: &Code) -> Result<Data, EvalError> {
        let data = match code {
            Code::Message => Data::Value(Some(Value::Message(self.message.clone()))),
            Code::Local(name) => self.locals.get(name).cloned().ok_or_else(|| EvalError::UnassignedLocal(name.clone()))?,
            Code::Element => Data::Value(self.element.clone()),
            Code::FieldValue(field) => Data::Value(Some(self.field_value(field))),
            Code::HasField(field) => Data::Bool(self.field(field).is_some()),
            Code::NotDefault(field) => Data::Bool(self.field(field).is_some_and(|value| !value.is_default())),
            Code::OneofCase(field) => Data::Bool(field.oneof.as_ref().is_some_and(|oneof| self.message.oneofs.get(oneof) == Some(&field.name))),
            Code::OneofUnset(oneof) => Data::Bool(!self.message.oneofs.contains_key(oneof)),
            Code::Bool(value) => Data::Bool(*value),
            Code::Not(inner) => Data::Bool(!self.eval(inner)?.into_bool()?),
            Code::And(operands) => {
                for operand in operands {
                    if !self.eval(operand)?.into_bool()? {
                        return Ok(Data::Bool(false));
                    }
                }
                Data::Bool(true)
            }
            Code::Or(operands) => {
                for operand in operands {
                    if self.eval(operand)?.into_bool()? {
                        return Ok(Data::Bool(true));
                    }
                }
                Data::Bool(false)
            }
            Code::Compare { value, op, bound } => {
                let value = self.number(value)?;
                Data::Bool(compare(value, *op, *bound))
            }
            Code::IsEmpty(inner) => Data::Bool(self.eval(inner)?.is_empty()?),
            Code::IsSetCall { method, .. } => {
                let helper = self.members.is_set_helper(method).ok_or_else(|| EvalError::UnknownHelper {
                    type_name: self.members.type_name.clone(),
                    method: method.clone(),
                })?;
                self.eval(helper.body().code())?
            }
            Code::FlagRead(name) => Data::Bool(self.interpreter.flags.contains(name)),
            Code::PatternMatch { source, value } => {
                let value = self.eval(value)?;
                let text = match &value {
                    Data::Value(Some(value)) => value.as_str().unwrap_or_default(),
                    Data::Value(None) => "",
                    other => return Err(mismatch("a string", other)),
                };
                Data::Bool(proto_guard::pattern::matches(source, text))
            }
            Code::Duplicates(field) => {
                let values = self.field(field).map(Value::elements).unwrap_or_default();
                Data::Duplicates(proto_guard::find_duplicates(values).into_iter().cloned().collect())
            }
            Code::IntrinsicViolations(field) => Data::Violations(self.nested(field, |message| self.interpreter.validate(message))?),
            Code::ExternalViolations { field, path } => {
                let context = proto_guard::FieldContext::new(&field.declaring_type, field.number, FieldPath::new(path));
                Data::Violations(self.nested(field, |message| self.interpreter.external_violations(message, &context))?)
            }
            Code::CustomViolations => Data::Violations(self.interpreter.custom_violations(self.message)),
            Code::EmptyList => Data::Violations(Vec::new()),
            Code::NewViolation(violation) => Data::Violation(self.new_violation(violation)?),
        };
        Ok(data)
    }

    fn new_violation(&self, violation: &NewViolation) -> Result<ConstraintViolation, EvalError> {
        let mut built = ConstraintViolation::new(&violation.msg_format).with_type_name(&violation.type_name);
        if !violation.field_path.is_empty() {
            built = built.with_field_path(FieldPath::new(&violation.field_path));
        }
        for param in &violation.params {
            built = built.with_param(param);
        }
        if let Some(value) = &violation.field_value {
            built = built.with_field_value(self.eval(value)?.debug_string());
        }
        if let Some(nested) = &violation.nested {
            built = built.with_nested(self.eval(nested)?.into_violations()?);
        }
        Ok(built)
    }

    fn number(&self, code: &Code) -> Result<Number, EvalError> {
        match self.eval(code)? {
            Data::Value(Some(value)) => value.number().ok_or_else(|| mismatch("a number", &Data::Value(Some(value)))),
            Data::Value(None) => Ok(Number::Int(0)),
            other => Err(mismatch("a number", &other)),
        }
    }

    fn field(&self, field: &FieldDeclaration) -> Option<&'_ Value> {
        self.message.get(&field.name)
    }

    /// The field's value, falling back to the default of its type.
    fn field_value(&self, field: &FieldDeclaration) -> Value {
        if let Some(value) = self.field(field) {
            return value.clone();
        }
        match &field.kind {
            FieldKind::Repeated(_) => Value::List(Vec::new()),
            FieldKind::Map { .. } => Value::Map(Vec::new()),
            FieldKind::Singular(value_type) => default_value(value_type),
        }
    }

    /// Violations of every message held by `field`.
    fn nested(
        &self,
        field: &FieldDeclaration,
        violations: impl Fn(&MessageValue) -> Result<Vec<ConstraintViolation>, EvalError>,
    ) -> Result<Vec<ConstraintViolation>, EvalError> {
        let Some(value) = self.field(field) else { return Ok(Vec::new()) };
        let messages: Vec<&MessageValue> = match value {
            Value::Message(message) => vec![message],
            Value::List(_) | Value::Map(_) => value
                .elements()
                .into_iter()
                .filter_map(|element| match element {
                    Value::Message(message) => Some(message),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        let mut all = Vec::new();
        for message in messages {
            all.extend(violations(message)?);
        }
        Ok(all)
    }
}

fn compare(value: Number, op: CompareOp, bound: Number) -> bool {
    match op {
        CompareOp::Lt => value < bound,
        CompareOp::Le => value <= bound,
        CompareOp::Gt => value > bound,
        CompareOp::Ge => value >= bound,
    }
}

fn default_value(value_type: &ValueType) -> Value {
    match value_type {
        ValueType::Scalar(ScalarType::Double | ScalarType::Float) => Value::Float(0.0),
        ValueType::Scalar(ScalarType::Int32 | ScalarType::Int64 | ScalarType::SInt32 | ScalarType::SInt64 | ScalarType::SFixed32 | ScalarType::SFixed64) => Value::Int(0),
        ValueType::Scalar(ScalarType::UInt32 | ScalarType::UInt64 | ScalarType::Fixed32 | ScalarType::Fixed64) => Value::UInt(0),
        ValueType::Scalar(ScalarType::Bool) => Value::Bool(false),
        ValueType::Scalar(ScalarType::String) => Value::String(String::new()),
        ValueType::Scalar(ScalarType::Bytes) => Value::Bytes(Vec::new()),
        ValueType::Enum(_) => Value::Enum(0),
        ValueType::Message(type_name) => Value::Message(MessageValue::new(type_name)),
        ValueType::Any => Value::Message(MessageValue::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::ValidationCodeGenerator;
    use crate::config::GeneratorConfig;
    use crate::model::Constraint;
    use crate::model::MessageType;
    use crate::model::Range;

    fn interpreter(message: &MessageType, constraints: &[Constraint]) -> Interpreter {
        let config = GeneratorConfig::default();
        let members = ValidationCodeGenerator::new(message, &config).translate(constraints).unwrap();
        Interpreter::new().with_members(members)
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let err = Interpreter::new().validate(&MessageValue::new("acme.Missing")).unwrap_err();
        assert!(matches!(err, EvalError::UnknownType(name) if name == "acme.Missing"));
    }

    #[test]
    fn test_elementwise_range_reports_offending_element() {
        let message = MessageType::new("acme.Scores").with_field(FieldDeclaration::repeated("values", 1, ValueType::Scalar(ScalarType::SInt32)));
        let interpreter = interpreter(&message, &[Constraint::range("values", Range::at_least(0))]);

        let violations = interpreter.validate(&MessageValue::new("acme.Scores").with("values", vec![3, -1, 4, -5])).unwrap();
        let values: Vec<_> = violations.iter().filter_map(|v| v.field_value.as_deref()).collect();
        assert_eq!(values, vec!["-1", "-5"]);
        assert_eq!(violations[0].message(), "The number must be greater than or equal to 0.");

        assert!(interpreter.validate(&MessageValue::new("acme.Scores")).unwrap().is_empty());
    }

    #[test]
    fn test_custom_dispatch_runs_last() {
        let message = MessageType::new("acme.Note").with_field(FieldDeclaration::scalar("text", 1, ScalarType::String));
        let interpreter = interpreter(&message, &[Constraint::required("text")]).with_custom_constraints(|_| vec![ConstraintViolation::new("custom")]);

        let violations = interpreter.validate(&MessageValue::new("acme.Note")).unwrap();
        let formats: Vec<_> = violations.iter().map(|v| v.msg_format.as_str()).collect();
        assert_eq!(formats, vec!["The field `text` must be set.", "custom"]);
    }
}
