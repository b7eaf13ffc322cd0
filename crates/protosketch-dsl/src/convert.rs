//! Conversion of raw sketch type expressions to output declaration types.

/// Converts a raw field-type lexeme into the output declaration type.
///
/// - `map[K]V` becomes `map<K, V>` with both sides alias-resolved
/// - `[]T` becomes `repeated T`
/// - anything else becomes `optional T`
///
/// Only the fixed builtin alias table is consulted; user-defined type names
/// pass through unchanged. A `map[` lexeme with no closing bracket falls
/// back to the bare-type rule.
pub fn convert_type(raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix("map[") {
        if let Some(close) = rest.find(']') {
            let key = &rest[..close];
            let value = &rest[close + 1..];
            return format!("map<{}, {}>", to_builtin(key), to_builtin(value));
        }
    }
    if let Some(element) = raw.strip_prefix("[]") {
        return format!("repeated {}", to_builtin(element));
    }
    format!("optional {}", to_builtin(raw))
}

/// The builtin alias table. Everything not listed passes through.
fn to_builtin(name: &str) -> &str {
    match name {
        "str" => "string",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_builtin() {
        assert_eq!(convert_type("str"), "optional string");
    }

    #[test]
    fn bare_passthrough() {
        assert_eq!(convert_type("int"), "optional int");
        assert_eq!(convert_type("Person"), "optional Person");
    }

    #[test]
    fn array_type() {
        assert_eq!(convert_type("[]int"), "repeated int");
        assert_eq!(convert_type("[]str"), "repeated string");
    }

    #[test]
    fn map_type() {
        assert_eq!(convert_type("map[str]int"), "map<string, int>");
        assert_eq!(convert_type("map[int]str"), "map<int, string>");
    }

    #[test]
    fn map_of_user_types_passes_through() {
        assert_eq!(convert_type("map[str]Person"), "map<string, Person>");
    }

    #[test]
    fn unclosed_map_falls_back_to_bare_rule() {
        assert_eq!(convert_type("map[str"), "optional map[str");
    }

    #[test]
    fn conversion_is_pure() {
        // Same input, same output, in any order.
        let a = convert_type("map[str]int");
        let b = convert_type("[]int");
        assert_eq!(convert_type("map[str]int"), a);
        assert_eq!(convert_type("[]int"), b);
    }
}
