/// Lowercases `value` and drops every character that is not alphanumeric.
///
/// `"Contact No."` and `"contact_no"` both normalize to `"contactno"`.
pub fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Storage key for a user-supplied custom column name.
pub fn custom_column_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_key("Contact No."), "contactno");
        assert_eq!(normalize_key("  Package (LPA) "), "packagelpa");
        assert_eq!(normalize_key("S.No"), "sno");
    }

    #[test]
    fn custom_key_joins_words() {
        assert_eq!(custom_column_key("  Bond  Period "), "bond_period");
    }
}
