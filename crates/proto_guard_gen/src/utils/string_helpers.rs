//! String manipulation utilities

/// Convert identifier to `UPPER_SNAKE_CASE` for generated statics
pub fn to_upper_snake_case(s: &str) -> String {
    to_snake_case(s).to_ascii_uppercase()
}

/// Convert identifier to `snake_case`
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    let mut prev_is_lower = false;
    let mut prev_is_upper = false;

    while let Some(c) = chars.next() {
        let next_is_lower = chars.peek().is_some_and(|ch| ch.is_lowercase());

        if c.is_uppercase() && !result.is_empty() && !result.ends_with('_') && (prev_is_lower || prev_is_upper && next_is_lower) {
            result.push('_');
        }

        result.push(c.to_ascii_lowercase());
        prev_is_lower = c.is_lowercase() || c.is_ascii_digit();
        prev_is_upper = c.is_uppercase();
    }

    result
}

/// Convert identifier to `PascalCase`
pub fn to_pascal_case(s: &str) -> String {
    s.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Last segment of a dotted protobuf name
pub fn simple_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}
