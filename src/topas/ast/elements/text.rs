//! Leaf nodes carrying a single string

use std::fmt;

/// Verbatim source captured when no structured rule matched
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text {
    pub value: String,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Append another capture, space separated
    pub fn join(&mut self, other: &Text) {
        if self.value.is_empty() {
            self.value.push_str(&other.value);
        } else if !other.value.is_empty() {
            self.value.push(' ');
            self.value.push_str(&other.value);
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Identifier naming a parameter
///
/// The first character is a letter, the rest are letters, digits or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterName {
    pub name: String,
}

impl ParameterName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn is_valid(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
