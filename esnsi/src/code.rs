//! Administrative-division codes (OKATO and alike): validation, padding, hierarchy levels.
//!
//! Two spellings occur in the registries:
//!   - dotted:  "01.201.800.001" (2, 5, 8 or 11 digits in groups);
//!   - plain:   "01201800" (2..=11 digits), possibly as a comma separated list.

use std::sync::LazyLock;

use regex::Regex;

use crate::{constants::CANONICAL_WIDTH, error::ValidationError};

static DOTTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}(\.[0-9]{3}(\.[0-9]{3}(\.[0-9]{3})?)?)?$").expect("valid dotted code regex")
});

static PLAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2,11}$").expect("valid plain code regex"));

/// Boundaries of the hierarchy levels within a canonical code.
const REGION_END: usize = 2;
const LEVEL1_END: usize = 5;
const LEVEL2_END: usize = 8;
const LEVEL3_END: usize = 11;

/// A validated code split into its hierarchy levels.
///
/// Levels the source code did not reach are empty, never the padding zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchicalCode {
    /// Digits without separators, e.g. "01201800".
    pub digits: String,
    /// `digits` right-padded with zeros, e.g. "01201800000".
    pub canonical: String,
    /// "01"
    pub region: String,
    /// district / city: "201"
    pub level1: String,
    /// settlement council: "800"
    pub level2: String,
    /// locality: "001"
    pub level3: String,
}

impl HierarchicalCode {
    /// Parse a dotted code. `None` when it does not match the strict dotted pattern.
    pub fn parse_dotted(code: &str) -> Option<Self> {
        if !DOTTED_RE.is_match(code) {
            return None;
        }
        Some(Self::from_digits(code.chars().filter(|c| *c != '.').collect()))
    }

    /// Parse a plain digit code of 2 to 11 digits.
    pub fn parse_plain(code: &str) -> Option<Self> {
        is_plain(code).then(|| Self::from_digits(code.to_string()))
    }

    fn from_digits(digits: String) -> Self {
        let level = |start: usize, end: usize| {
            if digits.len() >= end {
                digits[start..end].to_string()
            } else {
                String::new()
            }
        };
        Self {
            canonical: canonical(&digits),
            region: level(0, REGION_END),
            level1: level(REGION_END, LEVEL1_END),
            level2: level(LEVEL1_END, LEVEL2_END),
            level3: level(LEVEL2_END, LEVEL3_END),
            digits,
        }
    }
}

/// Region codes are the two-digit roots of the hierarchy.
pub fn is_region(digits: &str) -> bool {
    digits.len() == REGION_END
}

/// `code` right-padded with '0' to the canonical width. Longer codes are returned as is.
pub fn canonical(code: &str) -> String {
    format!("{code:0<CANONICAL_WIDTH$}")
}

/// First `len` characters of a canonical code.
pub fn prefix(canonical: &str, len: usize) -> &str {
    &canonical[..len.min(canonical.len())]
}

pub fn is_plain(code: &str) -> bool {
    PLAIN_RE.is_match(code)
}

/// Split a comma separated list of plain codes.
///
/// Tokens are trimmed; empty tokens are skipped. Any other token that is not a
/// plain code fails the whole list.
pub fn split_plain_list(list: &str, scheme: &'static str) -> Result<Vec<String>, ValidationError> {
    let mut out = Vec::new();
    for token in list.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }
        if !is_plain(token) {
            return Err(ValidationError::InvalidCode {
                scheme,
                code: token.to_string(),
            });
        }
        out.push(token.to_string());
    }
    Ok(out)
}
