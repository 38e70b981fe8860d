//! Rendering of generated members as Rust items for prost-generated structs.
//!
//! Field access follows prost conventions: scalars by value, `optional`
//! scalars and messages as `Option`, oneofs as `Option<module::Oneof>`,
//! repeated fields as `Vec` and maps as `HashMap`.

use proc_macro2::Literal;
use proc_macro2::TokenStream;
use quote::format_ident;
use quote::quote;
use syn::Ident;

use crate::code::Code;
use crate::code::CompareOp;
use crate::code::LocalType;
use crate::code::NewViolation;
use crate::code::Statement;
use crate::compile::ACCUMULATOR;
use crate::compile::GeneratedMembers;
use crate::config::GeneratorConfig;
use crate::error::GenResult;
use crate::model::FieldDeclaration;
use crate::model::FieldKind;
use crate::model::Number;
use crate::model::ScalarType;
use crate::model::ValueType;
use crate::utils::rust_ident;
use crate::utils::to_pascal_case;
use crate::utils::to_snake_case;

/// Render `members` as flag statics, an inherent impl block and, if
/// configured, an `impl Validate`.
pub fn render(members: &GeneratedMembers, config: &GeneratorConfig) -> GenResult<TokenStream> {
    let renderer = Renderer::new(members, config)?;
    Ok(renderer.items())
}

struct Renderer<'a> {
    members: &'a GeneratedMembers,
    config: &'a GeneratorConfig,
    rt: syn::Path,
    msg: Ident,
    ty: Ident,
}

impl<'a> Renderer<'a> {
    fn new(members: &'a GeneratedMembers, config: &'a GeneratorConfig) -> GenResult<Self> {
        Ok(Self {
            members,
            config,
            rt: config.runtime_path()?,
            msg: rust_ident(&config.message_param),
            ty: rust_ident(&members.rust_name),
        })
    }

    fn items(&self) -> TokenStream {
        let rt = &self.rt;
        let ty = &self.ty;
        let msg = &self.msg;
        let accumulator = format_ident!("{}", ACCUMULATOR);
        let method = rust_ident(self.members.validate.name());
        let body = self.block(self.members.validate.body(), None);

        let flags = self.members.flags.iter().map(|flag| {
            let name = format_ident!("{}", flag.name());
            let doc = format!(" Validate `{}` with the registered external validators.", flag.field().name);
            quote! {
                #[doc = #doc]
                pub static #name: ::core::sync::atomic::AtomicBool = ::core::sync::atomic::AtomicBool::new(false);
            }
        });

        let helpers = self.members.is_set.iter().map(|helper| {
            let name = format_ident!("{}", helper.method_name());
            let check = self.expr(helper.body().code(), None);
            quote! {
                fn #name(#msg: &Self) -> bool {
                    #check
                }
            }
        });

        let validate_impl = self.config.emit_validate_impl.then(|| {
            let type_name = &self.members.type_name;
            quote! {
                impl #rt::Validate for #ty {
                    fn validate(&self) -> ::std::vec::Vec<#rt::ConstraintViolation> {
                        Self::#method(self)
                    }

                    fn type_name(&self) -> &'static str {
                        #type_name
                    }
                }
            }
        });

        quote! {
            #(#flags)*

            #[allow(clippy::all, clippy::pedantic, unused_mut)]
            impl #ty {
                pub fn #method(#msg: &Self) -> ::std::vec::Vec<#rt::ConstraintViolation> {
                    let mut #accumulator: ::std::vec::Vec<#rt::ConstraintViolation> = ::std::vec::Vec::new();
                    #body
                    #accumulator
                }

                #(#helpers)*
            }

            #validate_impl
        }
    }

    // ========================================================================
    // STATEMENTS
    // ========================================================================

    fn block<'s>(&self, statements: impl IntoIterator<Item = &'s Statement>, element: Option<&FieldDeclaration>) -> TokenStream {
        let statements = statements.into_iter().map(|statement| self.statement(statement, element));
        quote! { #(#statements)* }
    }

    fn statement(&self, statement: &Statement, element: Option<&FieldDeclaration>) -> TokenStream {
        let rt = &self.rt;
        let accumulator = format_ident!("{}", ACCUMULATOR);
        match statement {
            Statement::Declare { name, value: Some(value), .. } => {
                let name = format_ident!("{}", name);
                let value = self.expr(value, element);
                quote! { let #name = #value; }
            }
            Statement::Declare { name, ty, value: None } => {
                let name = format_ident!("{}", name);
                let ty = match ty {
                    LocalType::ViolationList => quote! { ::std::vec::Vec<#rt::ConstraintViolation> },
                    LocalType::DuplicateSet => quote! { ::std::vec::Vec<_> },
                };
                quote! { let #name: #ty; }
            }
            Statement::Assign { name, value } => {
                let name = format_ident!("{}", name);
                let value = self.expr(value, element);
                quote! { #name = #value; }
            }
            Statement::If { branches, otherwise } => {
                let branches = branches.iter().map(|(condition, body)| {
                    let condition = self.expr(condition, element);
                    let body = self.block(body, element);
                    quote! { if #condition { #body } }
                });
                let chain = join(branches, &quote! { else });
                let otherwise = otherwise.as_ref().map(|body| {
                    let body = self.block(body, element);
                    quote! { else { #body } }
                });
                quote! { #chain #otherwise }
            }
            Statement::ForEach { field, body } => {
                let iter = self.elements(field);
                let body = self.block(body, Some(field));
                quote! {
                    for element in #iter {
                        #body
                    }
                }
            }
            Statement::Accumulate(violation) => {
                let violation = self.expr(violation, element);
                quote! { #accumulator.push(#violation); }
            }
            Statement::AccumulateAll(violations) => {
                let violations = self.expr(violations, element);
                quote! { #accumulator.extend(#violations); }
            }
        }
    }

    // ========================================================================
    // EXPRESSIONS
    // ========================================================================

    fn expr(&self, code: &Code, element: Option<&FieldDeclaration>) -> TokenStream {
        let rt = &self.rt;
        let msg = &self.msg;
        match code {
            Code::Message => quote! { #msg },
            Code::Local(name) => {
                let name = format_ident!("{}", name);
                quote! { #name }
            }
            Code::Element => element.and_then(FieldDeclaration::scalar_type).map_or_else(|| quote! { element }, |scalar| read_scalar(scalar, &quote! { element })),
            Code::FieldValue(field) => self.field_value(field),
            Code::HasField(field) => {
                let access = self.access(field);
                quote! { #access.is_some() }
            }
            Code::NotDefault(field) => self.not_default(field),
            Code::OneofCase(field) => {
                let (access, variant) = self.oneof_variant(field);
                quote! { matches!(&#access, ::core::option::Option::Some(#variant(_))) }
            }
            Code::OneofUnset(oneof) => {
                let access = self.member(oneof);
                quote! { #access.is_none() }
            }
            Code::Bool(value) => quote! { #value },
            Code::Not(inner) => {
                let inner = self.operand(inner, element);
                quote! { !#inner }
            }
            Code::And(operands) => join(operands.iter().map(|operand| self.operand(operand, element)), &quote! { && }),
            Code::Or(operands) => join(operands.iter().map(|operand| self.operand(operand, element)), &quote! { || }),
            Code::Compare { value, op, bound } => {
                let value = self.expr(value, element);
                let bound = number_literal(*bound);
                let op = match op {
                    CompareOp::Lt => quote! { < },
                    CompareOp::Le => quote! { <= },
                    CompareOp::Gt => quote! { > },
                    CompareOp::Ge => quote! { >= },
                };
                quote! { #value #op #bound }
            }
            Code::IsEmpty(inner) => {
                let inner = self.expr(inner, element);
                quote! { #inner.is_empty() }
            }
            Code::IsSetCall { method, .. } => {
                let method = format_ident!("{}", method);
                quote! { Self::#method(#msg) }
            }
            Code::FlagRead(name) => {
                let name = format_ident!("{}", name);
                quote! { #name.load(::core::sync::atomic::Ordering::Relaxed) }
            }
            Code::PatternMatch { source, value } => {
                let value = self.expr(value, element);
                quote! { #rt::pattern::matches(#source, #value) }
            }
            Code::Duplicates(field) => {
                let iter = self.elements(field);
                quote! { #rt::find_duplicates(#iter) }
            }
            Code::IntrinsicViolations(field) => self.nested_violations(field, |value| quote! { #rt::violations_of(#value) }),
            Code::ExternalViolations { field, path } => {
                let declaring_type = &field.declaring_type;
                let number = field.number;
                self.nested_violations(field, |value| {
                    quote! {
                        #rt::validate_at_runtime(
                            #value,
                            &#rt::FieldContext::new(#declaring_type, #number, #rt::FieldPath::new([#(#path),*])),
                        )
                    }
                })
            }
            Code::CustomViolations => quote! { #rt::violations_of_custom_constraints(#msg) },
            Code::EmptyList => quote! { ::std::vec::Vec::new() },
            Code::NewViolation(violation) => self.new_violation(violation, element),
        }
    }

    fn operand(&self, code: &Code, element: Option<&FieldDeclaration>) -> TokenStream {
        let tokens = self.expr(code, element);
        if code.is_compound() { quote! { (#tokens) } } else { tokens }
    }

    fn new_violation(&self, violation: &NewViolation, element: Option<&FieldDeclaration>) -> TokenStream {
        let rt = &self.rt;
        let NewViolation {
            msg_format,
            params,
            type_name,
            field_path,
            field_value,
            nested,
        } = violation;
        let path = (!field_path.is_empty()).then(|| quote! { .with_field_path(#rt::FieldPath::new([#(#field_path),*])) });
        let value = field_value.as_ref().map(|value| {
            let value = self.expr(value, element);
            quote! { .with_field_value(::std::format!("{:?}", #value)) }
        });
        let nested = nested.as_ref().map(|nested| {
            let nested = self.expr(nested, element);
            quote! { .with_nested(#nested) }
        });
        quote! {
            #rt::ConstraintViolation::new(#msg_format)
                .with_type_name(#type_name)
                #path
                #(.with_param(#params))*
                #value
                #nested
        }
    }

    // ========================================================================
    // FIELD ACCESS
    // ========================================================================

    fn member(&self, name: &str) -> TokenStream {
        let msg = &self.msg;
        let ident = rust_ident(&to_snake_case(name));
        quote! { #msg.#ident }
    }

    fn access(&self, field: &FieldDeclaration) -> TokenStream {
        self.member(field.oneof.as_deref().unwrap_or(&field.name))
    }

    /// Oneof member access and the path of the field's enum variant.
    fn oneof_variant(&self, field: &FieldDeclaration) -> (TokenStream, TokenStream) {
        let oneof = field.oneof.as_deref().unwrap_or_default();
        let module = rust_ident(&to_snake_case(&self.members.rust_name));
        let enum_ident = rust_ident(&to_pascal_case(oneof));
        let variant = rust_ident(&to_pascal_case(&field.name));
        (self.member(oneof), quote! { #module::#enum_ident::#variant })
    }

    /// Iterator over the elements of a collection field, map values for maps.
    fn elements(&self, field: &FieldDeclaration) -> TokenStream {
        let access = self.access(field);
        match field.kind {
            FieldKind::Map { .. } => quote! { #access.values() },
            FieldKind::Repeated(_) | FieldKind::Singular(_) => quote! { #access.iter() },
        }
    }

    fn field_value(&self, field: &FieldDeclaration) -> TokenStream {
        let access = self.access(field);
        if field.is_collection() {
            return access;
        }
        let Some(scalar) = field.scalar_type() else {
            return if field.oneof.is_some() {
                let (access, variant) = self.oneof_variant(field);
                quote! {
                    match &#access {
                        ::core::option::Option::Some(#variant(value)) => ::core::option::Option::Some(value),
                        _ => ::core::option::Option::None,
                    }
                }
            } else {
                quote! { #access.as_ref() }
            };
        };
        if field.oneof.is_some() {
            let (access, variant) = self.oneof_variant(field);
            let read = read_scalar(scalar, &quote! { value });
            let default = scalar_default(scalar);
            return quote! {
                match &#access {
                    ::core::option::Option::Some(#variant(value)) => #read,
                    _ => #default,
                }
            };
        }
        match (field.explicit_presence, scalar) {
            (true, ScalarType::String | ScalarType::Bytes) => quote! { #access.as_deref().unwrap_or_default() },
            (true, _) => quote! { #access.unwrap_or_default() },
            (false, ScalarType::String) => quote! { #access.as_str() },
            (false, ScalarType::Bytes) => quote! { #access.as_slice() },
            (false, _) => access,
        }
    }

    fn not_default(&self, field: &FieldDeclaration) -> TokenStream {
        let access = self.access(field);
        match field.kind.value_type() {
            ValueType::Scalar(ScalarType::String | ScalarType::Bytes) => quote! { !#access.is_empty() },
            ValueType::Scalar(ScalarType::Bool) => access,
            ValueType::Scalar(ScalarType::Double | ScalarType::Float) => quote! { #access != 0.0 },
            ValueType::Scalar(_) | ValueType::Enum(_) => quote! { #access != 0 },
            ValueType::Message(_) | ValueType::Any => quote! { #access.is_some() },
        }
    }

    /// Violations of every message held by `field`, computed by `violations`
    /// for each `&dyn Validate` value.
    fn nested_violations(&self, field: &FieldDeclaration, violations: impl Fn(TokenStream) -> TokenStream) -> TokenStream {
        let rt = &self.rt;
        let value = if field.is_any() { quote! { &*#rt::any::unpack(value) } } else { quote! { value } };
        let violations = violations(value);
        let access = self.access(field);
        match &field.kind {
            FieldKind::Singular(_) if field.oneof.is_some() => {
                let (access, variant) = self.oneof_variant(field);
                quote! {
                    match &#access {
                        ::core::option::Option::Some(#variant(value)) => #violations,
                        _ => ::std::vec::Vec::new(),
                    }
                }
            }
            FieldKind::Singular(_) => quote! { #access.as_ref().map(|value| #violations).unwrap_or_default() },
            FieldKind::Repeated(_) | FieldKind::Map { .. } => {
                let iter = self.elements(field);
                quote! { #iter.flat_map(|value| #violations).collect::<::std::vec::Vec<_>>() }
            }
        }
    }
}

fn join(items: impl IntoIterator<Item = TokenStream>, separator: &TokenStream) -> TokenStream {
    let mut tokens = TokenStream::new();
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            tokens.extend(separator.clone());
        }
        tokens.extend(item);
    }
    tokens
}

/// Read a scalar through the reference `value`.
fn read_scalar(scalar: ScalarType, value: &TokenStream) -> TokenStream {
    match scalar {
        ScalarType::String => quote! { #value.as_str() },
        ScalarType::Bytes => quote! { #value.as_slice() },
        _ => quote! { *#value },
    }
}

fn scalar_default(scalar: ScalarType) -> TokenStream {
    match scalar {
        ScalarType::String => quote! { "" },
        ScalarType::Bytes => quote! { &[][..] },
        ScalarType::Bool => quote! { false },
        _ => quote! { ::core::default::Default::default() },
    }
}

fn number_literal(number: Number) -> Literal {
    match number {
        Number::Int(value) => Literal::i64_unsuffixed(value),
        Number::UInt(value) => Literal::u64_unsuffixed(value),
        Number::Float(value) => Literal::f64_unsuffixed(value),
    }
}
