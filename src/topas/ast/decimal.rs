//! Exact decimal numbers
//!
//! Refinement values must survive a text → tree → JSON → tree → text trip
//! unchanged, so numbers are never converted to binary floating point. A
//! [`Decimal`] keeps the digits as text, normalized just enough that equal
//! spellings compare equal (`+1` and `1`, `.5` and `0.5`, `1.` and `1`).

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?)([0-9]+(?:\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$").unwrap()
});

/// A decimal number stored in canonical textual form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a decimal number: {0:?}")]
pub struct DecimalError(pub String);

impl Decimal {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the number has no fraction and no exponent
    pub fn is_integer(&self) -> bool {
        !self.0.contains(['.', 'e', 'E'])
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let caps = DECIMAL
            .captures(text)
            .ok_or_else(|| DecimalError(text.to_string()))?;

        let sign = if &caps[1] == "-" { "-" } else { "" };
        let mut mantissa = caps[2].to_string();
        if mantissa.starts_with('.') {
            mantissa.insert(0, '0');
        }
        if mantissa.ends_with('.') {
            mantissa.pop();
        }
        let exponent = caps.get(3).map(|m| m.as_str()).unwrap_or("");

        Ok(Decimal(format!("{}{}{}", sign, mantissa, exponent)))
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Decimal(value.to_string())
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
