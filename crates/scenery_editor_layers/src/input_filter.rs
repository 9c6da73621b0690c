// SPDX-License-Identifier: MIT OR Apache-2.0
//! Character filters for text fields.

/// Accept ASCII letters and digits only
pub fn alphanumeric(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Keep only the characters accepted by `filter`
pub fn apply(text: &str, filter: fn(char) -> bool) -> String {
    text.chars().filter(|c| filter(*c)).collect()
}
