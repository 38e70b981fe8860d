use proto_guard::FieldPath;

use crate::model::FieldDeclaration;

/// Position of a field inside a (possibly nested) message.
///
/// Contexts form a chain of back-references from the innermost field to the
/// top-level message; they borrow, never own, their parents.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldContext<'a> {
    parent: Option<&'a FieldContext<'a>>,
    field: Option<&'a FieldDeclaration>,
}

impl<'a> FieldContext<'a> {
    /// The context of the validated message itself.
    pub const fn empty() -> Self {
        Self { parent: None, field: None }
    }

    pub const fn for_child(&'a self, field: &'a FieldDeclaration) -> Self {
        Self {
            parent: Some(self),
            field: Some(field),
        }
    }

    pub const fn target(&self) -> Option<&'a FieldDeclaration> {
        self.field
    }

    pub const fn parent(&self) -> Option<&'a FieldContext<'a>> {
        self.parent
    }

    pub const fn is_empty(&self) -> bool {
        self.field.is_none()
    }

    pub fn field_path(&self) -> FieldPath {
        let mut names = Vec::new();
        let mut current = Some(self);
        while let Some(context) = current {
            if let Some(field) = context.field {
                names.push(field.name.clone());
            }
            current = context.parent;
        }
        names.reverse();
        FieldPath::new(names)
    }
}

/// Resolve the generation-time placeholders of an error message template.
///
/// `{field.name}`, `{field.path}` and `{field.type}` are replaced from
/// `context`; `{}` placeholders are left for the runtime parameters.
pub fn error_message(template: &str, context: &FieldContext<'_>) -> String {
    if !template.contains("{field.") {
        return template.to_string();
    }
    let target = context.target();
    let name = target.map(|f| f.name.as_str()).unwrap_or_default();
    let declaring_type = target.map(|f| f.declaring_type.as_str()).unwrap_or_default();
    template
        .replace("{field.name}", name)
        .replace("{field.path}", &context.field_path().to_string())
        .replace("{field.type}", declaring_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScalarType;

    #[test]
    fn test_nested_path() {
        let address = FieldDeclaration::message("address", 3, "acme.Address");
        let zip = FieldDeclaration::scalar("zip", 1, ScalarType::String);
        let root = FieldContext::empty();
        let address_ctx = root.for_child(&address);
        let zip_ctx = address_ctx.for_child(&zip);

        assert!(root.is_empty());
        assert_eq!(zip_ctx.field_path().to_string(), "address.zip");
        assert_eq!(zip_ctx.target().unwrap().name, "zip");
        assert_eq!(zip_ctx.parent().unwrap().target().unwrap().name, "address");
        assert!(root.field_path().is_empty());
    }

    #[test]
    fn test_error_message_placeholders() {
        let mut age = FieldDeclaration::scalar("age", 1, ScalarType::Int32);
        age.declaring_type = "acme.Person".into();
        let root = FieldContext::empty();
        let ctx = root.for_child(&age);
        assert_eq!(error_message("The field `{field.path}` must be set.", &ctx), "The field `age` must be set.");
        assert_eq!(error_message("{field.type}.{field.name} >= {}", &ctx), "acme.Person.age >= {}");
        assert_eq!(error_message("{field.name}", &root), "");
    }
}
