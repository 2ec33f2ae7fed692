//! Account display helpers.

/// Derive display initials from a first and last name.
///
/// Takes the first alphabetic character of each, uppercased. Either part may
/// be empty.
pub fn initials(first_name: &str, last_name: &str) -> String {
    [first_name, last_name]
        .iter()
        .filter_map(|part| part.trim().chars().find(|c| c.is_alphabetic()))
        .flat_map(char::to_uppercase)
        .collect()
}
