use proc_macro2::TokenStream;
use proto_guard_gen::GeneratorConfig;
use proto_guard_gen::generate_tokens;
use proto_guard_gen::model::Constraint;
use proto_guard_gen::model::FieldDeclaration;
use proto_guard_gen::model::MessageType;
use proto_guard_gen::model::Range;
use proto_guard_gen::model::ScalarType;
use proto_guard_gen::model::ValueType;
use quote::ToTokens;

const ORDER_VALIDATION: &str = include_str!("fixtures/order_validation.rs");

fn address() -> MessageType {
    MessageType::new("acme.Address").with_field(FieldDeclaration::scalar("zip", 1, ScalarType::String))
}

fn order() -> MessageType {
    MessageType::new("acme.Order")
        .with_field(FieldDeclaration::message("address", 1, "acme.Address"))
        .with_field(FieldDeclaration::repeated("tags", 2, ValueType::Scalar(ScalarType::String)))
        .with_field(FieldDeclaration::scalar("card", 3, ScalarType::String).in_oneof("payment"))
        .with_field(FieldDeclaration::scalar("iban", 4, ScalarType::String).in_oneof("payment"))
        .with_field(FieldDeclaration::scalar("weight", 5, ScalarType::Double))
}

#[test]
fn renders_the_checked_in_order_items() {
    let config = GeneratorConfig::default().with_validate_impl(true);
    let mut tokens = TokenStream::new();
    tokens.extend(generate_tokens(&address(), &[Constraint::pattern("zip", "[0-9]{5}")], &config).unwrap());
    tokens.extend(
        generate_tokens(
            &order(),
            &[
                Constraint::validate("address"),
                Constraint::required("address"),
                Constraint::distinct("tags"),
                Constraint::required_oneof("payment"),
                Constraint::range("weight", Range::at_least(0)),
            ],
            &config,
        )
        .unwrap(),
    );

    let rendered: syn::File = syn::parse2(tokens).unwrap();
    let expected = syn::parse_file(ORDER_VALIDATION).unwrap();
    assert_eq!(rendered.items.len(), expected.items.len());
    for (rendered, expected) in rendered.items.iter().zip(&expected.items) {
        assert_eq!(rendered.to_token_stream().to_string(), expected.to_token_stream().to_string());
    }
}
