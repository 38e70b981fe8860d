use proto_guard::ConstraintViolation;
use proto_guard_gen::GenError;
use proto_guard_gen::GeneratorConfig;
use proto_guard_gen::eval::Interpreter;
use proto_guard_gen::eval::MessageValue;
use proto_guard_gen::eval::Value;
use proto_guard_gen::generate;
use proto_guard_gen::generate_source;
use proto_guard_gen::model::Bound;
use proto_guard_gen::model::Constraint;
use proto_guard_gen::model::FieldDeclaration;
use proto_guard_gen::model::IfInvalid;
use proto_guard_gen::model::MessageType;
use proto_guard_gen::model::PatternConstraint;
use proto_guard_gen::model::PatternModifier;
use proto_guard_gen::model::Range;
use proto_guard_gen::model::ScalarType;
use proto_guard_gen::model::ValidateConstraint;
use proto_guard_gen::model::ValueType;

fn interpreter_for(message: &MessageType, constraints: &[Constraint]) -> Interpreter {
    let members = generate(message, constraints, &GeneratorConfig::default()).unwrap();
    Interpreter::new().with_members(members)
}

fn person() -> MessageType {
    MessageType::new("acme.Person")
        .with_field(FieldDeclaration::scalar("age", 1, ScalarType::Int32))
        .with_field(FieldDeclaration::scalar("name", 2, ScalarType::String))
}

#[test]
fn person_age_and_name() {
    let interpreter = interpreter_for(&person(), &[
        Constraint::range("age", Range::at_least(0)),
        Constraint::pattern("name", "^[A-Z].*"),
    ]);

    let violations = interpreter.validate(&MessageValue::new("acme.Person").with("age", -1).with("name", "bob")).unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].field_path.to_string(), "age");
    assert_eq!(violations[0].message(), "The number must be greater than or equal to 0.");
    assert_eq!(violations[0].field_value.as_deref(), Some("-1"));
    assert_eq!(violations[1].field_path.to_string(), "name");
    assert_eq!(violations[1].message(), "The string must match the regular expression `^[A-Z].*`.");
    assert_eq!(violations[1].field_value.as_deref(), Some("\"bob\""));
    assert!(violations.iter().all(|v| v.type_name == "acme.Person"));

    let valid = interpreter.validate(&MessageValue::new("acme.Person").with("age", 5).with("name", "Bob")).unwrap();
    assert!(valid.is_empty());
}

#[test]
fn nan_is_outside_every_range() {
    let message = MessageType::new("acme.Grade").with_field(FieldDeclaration::scalar("score", 1, ScalarType::Double));
    let interpreter = interpreter_for(&message, &[
        Constraint::range("score", Range::less_than(1).with_lower(Bound::inclusive(0))),
        Constraint::range("score", Range::at_most(10)),
    ]);

    let violations = interpreter.validate(&MessageValue::new("acme.Grade").with("score", f64::NAN)).unwrap();
    let formats: Vec<_> = violations.iter().map(|v| v.message()).collect();
    assert_eq!(formats, vec![
        "The number must be greater than or equal to 0.",
        "The number must be less than 1.",
        "The number must be less than or equal to 10."
    ]);
    assert!(violations.iter().all(|v| v.field_value.as_deref() == Some("NaN")));

    assert!(interpreter.validate(&MessageValue::new("acme.Grade").with("score", 0.5)).unwrap().is_empty());

    let source = generate_source(&message, &[Constraint::range("score", Range::at_least(0))], &GeneratorConfig::default()).unwrap();
    assert!(source.contains("! (msg . score >= 0.0)"));
}

#[test]
fn goes_with_names_both_fields() {
    let message = MessageType::new("acme.Shipment")
        .with_field(FieldDeclaration::scalar("tracking_code", 1, ScalarType::String))
        .with_field(FieldDeclaration::scalar("carrier", 2, ScalarType::String));
    let interpreter = interpreter_for(&message, &[Constraint::goes_with("tracking_code", "carrier")]);

    let only_code = MessageValue::new("acme.Shipment").with("tracking_code", "1Z999");
    let violations = interpreter.validate(&only_code).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].param, vec!["tracking_code".to_string(), "carrier".to_string()]);
    assert_eq!(
        violations[0].message(),
        "The field `tracking_code` can only be set when the field `carrier` is defined."
    );

    let both = only_code.with("carrier", "UPS");
    assert!(interpreter.validate(&both).unwrap().is_empty());
    assert!(interpreter.validate(&MessageValue::new("acme.Shipment")).unwrap().is_empty());
}

#[test]
fn distinct_reports_duplicates() {
    let message = MessageType::new("acme.Lottery").with_field(FieldDeclaration::repeated("numbers", 1, ValueType::Scalar(ScalarType::Int64)));
    let interpreter = interpreter_for(&message, &[Constraint::distinct("numbers")]);

    let violations = interpreter.validate(&MessageValue::new("acme.Lottery").with("numbers", vec![1i64, 2, 2, 3])).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message(), "Values must be distinct.");
    assert_eq!(violations[0].field_value.as_deref(), Some("[2]"));

    assert!(interpreter.validate(&MessageValue::new("acme.Lottery").with("numbers", vec![1i64, 2, 3])).unwrap().is_empty());
}

#[test]
fn distinct_on_map_checks_values() {
    let message = MessageType::new("acme.Seating").with_field(FieldDeclaration::map("seats", 1, ScalarType::String, ValueType::Scalar(ScalarType::UInt32)));
    let interpreter = interpreter_for(&message, &[Constraint::distinct("seats")]);

    let taken = MessageValue::new("acme.Seating").with_map("seats", [(Value::from("ann"), Value::from(4u32)), (Value::from("bob"), Value::from(4u32))]);
    assert_eq!(interpreter.validate(&taken).unwrap().len(), 1);

    let free = MessageValue::new("acme.Seating").with_map("seats", [(Value::from("ann"), Value::from(4u32)), (Value::from("bob"), Value::from(5u32))]);
    assert!(interpreter.validate(&free).unwrap().is_empty());
}

#[test]
fn pattern_partial_and_full_match() {
    let full = Constraint::pattern("name", "bob");
    let partial: Constraint = PatternConstraint::new("name", "bob")
        .with_modifier(PatternModifier {
            partial_match: true,
            ..PatternModifier::default()
        })
        .into();
    let value = MessageValue::new("acme.Person").with("name", "xbobx");

    assert_eq!(interpreter_for(&person(), &[full]).validate(&value).unwrap().len(), 1);
    assert!(interpreter_for(&person(), &[partial]).validate(&value).unwrap().is_empty());
}

#[test]
fn pattern_modifiers_apply() {
    let insensitive: Constraint = PatternConstraint::new("name", "[a-z]+")
        .with_modifier(PatternModifier {
            case_insensitive: true,
            ..PatternModifier::default()
        })
        .into();
    let interpreter = interpreter_for(&person(), &[insensitive]);
    assert!(interpreter.validate(&MessageValue::new("acme.Person").with("name", "Bob")).unwrap().is_empty());
    assert_eq!(interpreter.validate(&MessageValue::new("acme.Person").with("name", "Bob!")).unwrap().len(), 1);
}

#[test]
fn unset_fields_skip_range_and_pattern() {
    let interpreter = interpreter_for(&person(), &[
        Constraint::range("age", Range::at_least(18)),
        Constraint::pattern("name", "^[A-Z].*"),
    ]);
    assert!(interpreter.validate(&MessageValue::new("acme.Person")).unwrap().is_empty());
}

#[test]
fn required_field_alternatives() {
    let message = MessageType::new("acme.Contact")
        .with_field(FieldDeclaration::scalar("first_name", 1, ScalarType::String))
        .with_field(FieldDeclaration::scalar("last_name", 2, ScalarType::String))
        .with_field(FieldDeclaration::scalar("email", 3, ScalarType::String));
    let interpreter = interpreter_for(&message, &[Constraint::required_field("first_name & last_name | email")]);

    let partial_name = MessageValue::new("acme.Contact").with("first_name", "Ada");
    let violations = interpreter.validate(&partial_name).unwrap();
    assert_eq!(violations.len(), 1);
    assert!(violations[0].field_path.is_empty());
    assert_eq!(violations[0].message(), "Required fields are not set. Must match pattern `first_name & last_name | email`.");

    assert!(interpreter.validate(&partial_name.clone().with("last_name", "Lovelace")).unwrap().is_empty());
    assert!(interpreter.validate(&MessageValue::new("acme.Contact").with("email", "ada@example.org")).unwrap().is_empty());
}

#[test]
fn required_oneof() {
    let message = MessageType::new("acme.Payment")
        .with_field(FieldDeclaration::scalar("card", 1, ScalarType::String).in_oneof("method"))
        .with_field(FieldDeclaration::scalar("iban", 2, ScalarType::String).in_oneof("method"));
    let interpreter = interpreter_for(&message, &[Constraint::required_oneof("method")]);

    let violations = interpreter.validate(&MessageValue::new("acme.Payment")).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message(), "One of the fields in the `method` group must be set.");
    assert!(violations[0].field_path.is_empty());
    assert_eq!(violations[0].to_string(), "One of the fields in the `method` group must be set.");

    assert!(interpreter.validate(&MessageValue::new("acme.Payment").with_oneof("method", "iban", "DE89")).unwrap().is_empty());
}

#[test]
fn required_reports_path() {
    let interpreter = interpreter_for(&person(), &[Constraint::required("name")]);
    let violations = interpreter.validate(&MessageValue::new("acme.Person").with("age", 30)).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].to_string(), "name: The field `name` must be set.");
}

fn order_and_address() -> (MessageType, MessageType) {
    let address = MessageType::new("acme.Address").with_field(FieldDeclaration::scalar("zip", 1, ScalarType::String));
    let order = MessageType::new("acme.Order")
        .with_field(FieldDeclaration::message("address", 1, "acme.Address"))
        .with_field(FieldDeclaration::any("attachment", 2))
        .with_field(FieldDeclaration::repeated("stops", 3, ValueType::Message("acme.Address".into())));
    (order, address)
}

fn nested_interpreter(validate: ValidateConstraint) -> Interpreter {
    let (order, address) = order_and_address();
    let config = GeneratorConfig::default();
    let address_members = generate(&address, &[Constraint::pattern("zip", "[0-9]{5}")], &config).unwrap();
    let order_members = generate(&order, &[validate.into(), Constraint::validate("attachment"), Constraint::validate("stops")], &config).unwrap();
    Interpreter::new().with_members(address_members).with_members(order_members)
}

#[test]
fn nested_validation_uses_intrinsic_checks() {
    let interpreter = nested_interpreter(ValidateConstraint::new("address"));
    let bad_address = MessageValue::new("acme.Address").with("zip", "abc");
    let order = MessageValue::new("acme.Order")
        .with("address", bad_address.clone())
        .with("attachment", bad_address.clone())
        .with("stops", vec![bad_address.clone(), MessageValue::new("acme.Address").with("zip", "12345"), bad_address]);

    let violations = interpreter.validate(&order).unwrap();
    let paths: Vec<_> = violations.iter().map(|v| v.field_path.to_string()).collect();
    assert_eq!(paths, vec!["address", "attachment", "stops"]);
    assert_eq!(violations[0].message(), "The message must have valid properties.");
    assert_eq!(violations[0].violation.len(), 1);
    assert_eq!(violations[0].violation[0].field_path.to_string(), "zip");
    assert_eq!(violations[2].violation.len(), 2);

    assert!(interpreter.validate(&MessageValue::new("acme.Order")).unwrap().is_empty());
}

#[test]
fn nested_validation_honours_if_invalid() {
    let legacy = IfInvalid {
        msg_format: "Bad address.".into(),
        ..IfInvalid::default()
    };
    let interpreter = nested_interpreter(ValidateConstraint::new("address").with_if_invalid(legacy));
    let order = MessageValue::new("acme.Order").with("address", MessageValue::new("acme.Address").with("zip", "x"));
    assert_eq!(interpreter.validate(&order).unwrap()[0].msg_format, "Bad address.");
}

#[test]
fn external_flag_switches_to_external_validator() {
    let mut interpreter = nested_interpreter(ValidateConstraint::new("address")).with_external_validator(|message, context| {
        vec![
            ConstraintViolation::new("external")
                .with_type_name(&message.type_name)
                .with_field_path(context.path.clone()),
        ]
    });
    let order = MessageValue::new("acme.Order").with("address", MessageValue::new("acme.Address").with("zip", "12345"));
    assert!(interpreter.validate(&order).unwrap().is_empty());

    interpreter.set_flag("ORDER_ADDRESS_EXTERNAL_VALIDATION", true);
    let violations = interpreter.validate(&order).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].violation[0].msg_format, "external");
    assert_eq!(violations[0].violation[0].field_path.to_string(), "address");

    interpreter.set_flag("ORDER_ADDRESS_EXTERNAL_VALIDATION", false);
    assert!(interpreter.validate(&order).unwrap().is_empty());
}

#[test]
fn custom_constraint_fails_generation() {
    let constraints = [Constraint::required("name"), Constraint::custom("name_is_unique")];
    let err = generate(&person(), &constraints, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(&err, GenError::CustomConstraint { name, type_name } if name == "name_is_unique" && type_name == "acme.Person"));
    assert!(generate_source(&person(), &constraints, &GeneratorConfig::default()).is_err());
}

#[test]
fn units_follow_constraint_order() {
    let constraints = [
        Constraint::pattern("name", "^[A-Z].*"),
        Constraint::required("age"),
        Constraint::range("age", Range::greater_than(0)),
        Constraint::required("name"),
    ];
    let members = generate(&person(), &constraints, &GeneratorConfig::default()).unwrap();
    assert_eq!(members.validate.units().len(), constraints.len());
    let kinds: Vec<_> = members.validate.units().iter().map(|unit| unit.kind).collect();
    let expected: Vec<_> = constraints.iter().map(Constraint::kind).collect();
    assert_eq!(kinds, expected);

    let helpers: Vec<_> = members.is_set.iter().map(|helper| helper.method_name().to_string()).collect();
    assert_eq!(helpers, vec!["age_is_set", "name_is_set"]);

    let interpreter = Interpreter::new().with_members(members);
    let violations = interpreter.validate(&MessageValue::new("acme.Person").with("name", "bob")).unwrap();
    let formats: Vec<_> = violations.iter().map(|v| v.message()).collect();
    assert_eq!(formats, vec![
        "The string must match the regular expression `^[A-Z].*`.".to_string(),
        "The field `age` must be set.".to_string(),
    ]);
}

#[test]
fn generated_source_is_deterministic() {
    let constraints = [
        Constraint::range("age", Range::at_least(0).with_upper(proto_guard_gen::model::Bound::inclusive(150))),
        Constraint::pattern("name", "^[A-Z].*"),
        Constraint::required_field("name | age"),
    ];
    let config = GeneratorConfig::default();
    let first = generate_source(&person(), &constraints, &config).unwrap();
    let second = generate_source(&person(), &constraints, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.matches("fn age_is_set").count(), 1);
}
