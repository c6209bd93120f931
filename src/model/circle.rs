//! Circle code types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A circle code: the short identifier label that groups related
/// material specs on an engineering drawing (`P1`, `T3`, `UT7a`, `14`).
///
/// The token is stored as found in the document, whitespace-stripped.
/// Equality is case-sensitive; requested-code filtering compares the
/// case-normalized form (see [`CircleCodeSet`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircleCode(String);

impl CircleCode {
    /// Create a circle code from a raw token, stripping surrounding
    /// whitespace.
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(token.as_ref().trim().to_string())
    }

    /// The code as it appeared in the document.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The case/whitespace-normalized form used for filter comparison.
    pub fn normalized(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl fmt::Display for CircleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A set of requested circle codes, parsed from the caller's
/// comma-separated input.
///
/// Membership is case/whitespace-normalized: requesting `p1` matches an
/// extracted `P1`. Requested codes that never occur in the document are
/// simply absent from the filtered view, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircleCodeSet {
    codes: Vec<String>,
}

impl CircleCodeSet {
    /// Parse a comma-separated list of circle codes.
    ///
    /// Empty items are skipped; duplicates collapse to the first
    /// occurrence.
    ///
    /// # Example
    ///
    /// ```
    /// use rebarex::CircleCodeSet;
    ///
    /// let set = CircleCodeSet::parse("P1, t3,,P1");
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn parse(input: &str) -> Self {
        let mut codes = Vec::new();
        for token in input.split(',') {
            let normalized = token.trim().to_ascii_uppercase();
            if !normalized.is_empty() && !codes.contains(&normalized) {
                codes.push(normalized);
            }
        }
        Self { codes }
    }

    /// Check whether an extracted code is in the requested set.
    pub fn contains(&self, code: &CircleCode) -> bool {
        self.codes.contains(&code.normalized())
    }

    /// Number of distinct requested codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The normalized requested codes, in input order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }
}
