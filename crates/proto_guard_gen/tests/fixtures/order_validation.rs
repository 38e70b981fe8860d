// Rendered for:
//
//   message Address { string zip = 1 [(pattern).regex = "[0-9]{5}"]; }
//   message Order {
//     Address address = 1 [(validate) = true, (required) = true];
//     repeated string tags = 2 [(distinct) = true];
//     oneof payment { string card = 3; string iban = 4; }
//     double weight = 5 [(min).value = "0"];
//     option (is_required) for payment;
//   }

#[allow(clippy::all, clippy::pedantic, unused_mut)]
impl Address {
    pub fn validate(msg: &Self) -> ::std::vec::Vec<::proto_guard::ConstraintViolation> {
        let mut violations: ::std::vec::Vec<::proto_guard::ConstraintViolation> = ::std::vec::Vec::new();
        if Self::zip_is_set(msg) && !::proto_guard::pattern::matches("\\A(?:[0-9]{5})\\z", msg.zip.as_str()) {
            violations.push(
                ::proto_guard::ConstraintViolation::new("The string must match the regular expression `{}`.")
                    .with_type_name("acme.Address")
                    .with_field_path(::proto_guard::FieldPath::new(["zip"]))
                    .with_param("[0-9]{5}")
                    .with_field_value(::std::format!("{:?}", msg.zip.as_str())),
            );
        }
        violations.extend(::proto_guard::violations_of_custom_constraints(msg));
        violations
    }

    fn zip_is_set(msg: &Self) -> bool {
        !msg.zip.is_empty()
    }
}

impl ::proto_guard::Validate for Address {
    fn validate(&self) -> ::std::vec::Vec<::proto_guard::ConstraintViolation> {
        Self::validate(self)
    }

    fn type_name(&self) -> &'static str {
        "acme.Address"
    }
}

#[doc = " Validate `address` with the registered external validators."]
pub static ORDER_ADDRESS_EXTERNAL_VALIDATION: ::core::sync::atomic::AtomicBool = ::core::sync::atomic::AtomicBool::new(false);

#[allow(clippy::all, clippy::pedantic, unused_mut)]
impl Order {
    pub fn validate(msg: &Self) -> ::std::vec::Vec<::proto_guard::ConstraintViolation> {
        let mut violations: ::std::vec::Vec<::proto_guard::ConstraintViolation> = ::std::vec::Vec::new();
        let address_violations: ::std::vec::Vec<::proto_guard::ConstraintViolation>;
        if !Self::address_is_set(msg) {
            address_violations = ::std::vec::Vec::new();
        } else if ORDER_ADDRESS_EXTERNAL_VALIDATION.load(::core::sync::atomic::Ordering::Relaxed) {
            address_violations = msg
                .address
                .as_ref()
                .map(|value| ::proto_guard::validate_at_runtime(
                    value,
                    &::proto_guard::FieldContext::new("acme.Order", 1u32, ::proto_guard::FieldPath::new(["address"])),
                ))
                .unwrap_or_default();
        } else {
            address_violations = msg.address.as_ref().map(|value| ::proto_guard::violations_of(value)).unwrap_or_default();
        }
        if !address_violations.is_empty() {
            violations.push(
                ::proto_guard::ConstraintViolation::new("The message must have valid properties.")
                    .with_type_name("acme.Order")
                    .with_field_path(::proto_guard::FieldPath::new(["address"]))
                    .with_nested(address_violations),
            );
        }
        if !Self::address_is_set(msg) {
            violations.push(
                ::proto_guard::ConstraintViolation::new("The field `address` must be set.")
                    .with_type_name("acme.Order")
                    .with_field_path(::proto_guard::FieldPath::new(["address"])),
            );
        }
        let tags_duplicates = ::proto_guard::find_duplicates(msg.tags.iter());
        if !tags_duplicates.is_empty() {
            violations.push(
                ::proto_guard::ConstraintViolation::new("Values must be distinct.")
                    .with_type_name("acme.Order")
                    .with_field_path(::proto_guard::FieldPath::new(["tags"]))
                    .with_field_value(::std::format!("{:?}", tags_duplicates)),
            );
        }
        if msg.payment.is_none() {
            violations.push(::proto_guard::ConstraintViolation::new("One of the fields in the `payment` group must be set.").with_type_name("acme.Order"));
        }
        if Self::weight_is_set(msg) && !(msg.weight >= 0.0) {
            violations.push(
                ::proto_guard::ConstraintViolation::new("The number must be greater than or equal to {}.")
                    .with_type_name("acme.Order")
                    .with_field_path(::proto_guard::FieldPath::new(["weight"]))
                    .with_param("0")
                    .with_field_value(::std::format!("{:?}", msg.weight)),
            );
        }
        violations.extend(::proto_guard::violations_of_custom_constraints(msg));
        violations
    }

    fn address_is_set(msg: &Self) -> bool {
        msg.address.is_some()
    }

    fn weight_is_set(msg: &Self) -> bool {
        msg.weight != 0.0
    }
}

impl ::proto_guard::Validate for Order {
    fn validate(&self) -> ::std::vec::Vec<::proto_guard::ConstraintViolation> {
        Self::validate(self)
    }

    fn type_name(&self) -> &'static str {
        "acme.Order"
    }
}
