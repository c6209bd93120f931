//! Tolerant recognizers for material codes and circle codes.
//!
//! All tolerance rules live here, compiled once into a
//! [`PatternLibrary`], so the association engine never inspects raw
//! text itself. Recognizers are pure functions of their input segment:
//! same text, same matches, leftmost first.

mod normalize;

pub use normalize::{map_digit_confusions, parse_numeric_field, OcrCleaner};

use crate::model::{CircleCode, MaterialCode};
use regex::Regex;
use std::ops::Range;

/// A numeric field inside a material-code candidate. Besides digits it
/// admits the letters of the digit-confusion table and a decimal comma;
/// both are resolved during validation.
const NUM_FIELD: &str = r"[0-9OoIlSsZzB]+(?:[.,][0-9OoIlSsZzB]+)?";

/// A recognized material code with its character span.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialMatch {
    /// Parsed material code
    pub code: MaterialCode,
    /// Span of the match within the scanned segment
    pub span: Range<usize>,
}

/// A recognized circle code with its character span.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleMatch {
    /// Parsed circle code
    pub code: CircleCode,
    /// Span of the match within the scanned segment
    pub span: Range<usize>,
}

/// Result of scanning one segment with both recognizers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentMatches {
    /// Material codes, leftmost first
    pub materials: Vec<MaterialMatch>,
    /// Circle codes on leftover spans, leftmost first
    pub circles: Vec<CircleMatch>,
    /// Candidates that failed semantic validation
    pub rejected: usize,
}

/// Precompiled recognizers for material and circle codes.
pub struct PatternLibrary {
    material: Regex,
    circle: Regex,
}

impl PatternLibrary {
    /// Compile the recognizers.
    pub fn new() -> Self {
        // <quantity> Rfi <d>[/<d>...] [cm] [,L=<len>m]
        // The length payload is captured loosely and validated in code,
        // so a corrupted length rejects the whole candidate instead of
        // silently degrading to a spacing-only spec.
        let material = format!(
            r"(\d+)\s*[Rr](?:[Ff][Iil1]|ﬁ)\s*({n}(?:\s*/\s*{n})*)\s*([Cc][Mm])?\s*(?:[,.]?\s*[Ll]\s*=\s*(\S{{1,12}}?)\s*[Mm])?",
            n = NUM_FIELD
        );

        // P1, T3, UT7a, R14, or a bare 1-3 digit number
        let circle = r"\b(?:[A-Z]{1,2}[0-9]{1,3}[a-z]?|[0-9]{1,3})\b";

        Self {
            material: Regex::new(&material).unwrap(),
            circle: Regex::new(circle).unwrap(),
        }
    }

    /// Recognize all material codes in a text segment, leftmost first.
    pub fn material_codes(&self, text: &str) -> Vec<MaterialMatch> {
        self.material_candidates(text).0
    }

    /// Recognize all circle codes in a text segment, leftmost first.
    ///
    /// This is the bare recognizer; it does not apply the
    /// material-over-circle precedence. Use [`scan_segment`](Self::scan_segment)
    /// for precedence-resolved matches.
    pub fn circle_codes(&self, text: &str) -> Vec<CircleMatch> {
        self.circle_candidates(text).0
    }

    /// Run both recognizers over a segment, with material matching
    /// taking precedence: circle candidates overlapping a material span
    /// are discarded.
    pub fn scan_segment(&self, text: &str) -> SegmentMatches {
        let (materials, rejected_materials) = self.material_candidates(text);
        let (circles, rejected_circles) = self.circle_candidates(text);

        let circles = circles
            .into_iter()
            .filter(|c| {
                !materials
                    .iter()
                    .any(|m| c.span.start < m.span.end && m.span.start < c.span.end)
            })
            .collect();

        SegmentMatches {
            materials,
            circles,
            rejected: rejected_materials + rejected_circles,
        }
    }

    fn material_candidates(&self, text: &str) -> (Vec<MaterialMatch>, usize) {
        let mut matches = Vec::new();
        let mut rejected = 0;

        for caps in self.material.captures_iter(text) {
            let whole = caps.get(0).expect("whole match");
            match validate_material(&caps) {
                Some(code) => matches.push(MaterialMatch {
                    code,
                    span: whole.range(),
                }),
                None => rejected += 1,
            }
        }

        (matches, rejected)
    }

    fn circle_candidates(&self, text: &str) -> (Vec<CircleMatch>, usize) {
        let mut matches = Vec::new();
        let mut rejected = 0;

        for m in self.circle.find_iter(text) {
            let token = m.as_str();
            // a bare zero is never a circle code
            if token.chars().all(|c| c == '0') {
                rejected += 1;
                continue;
            }
            matches.push(CircleMatch {
                code: CircleCode::new(token),
                span: m.range(),
            });
        }

        (matches, rejected)
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Semantic validation of a material candidate.
///
/// Returns `None` when a numeric field does not survive confusion
/// mapping, a value is impossible, or neither the `cm` unit nor a
/// length clause anchors the candidate.
fn validate_material(caps: &regex::Captures<'_>) -> Option<MaterialCode> {
    let quantity: u32 = caps.get(1)?.as_str().parse().ok()?;
    if quantity == 0 {
        return None;
    }

    let mut diameters = Vec::new();
    for field in caps.get(2)?.as_str().split('/') {
        let value = parse_numeric_field(field.trim())?;
        if value <= 0.0 {
            return None;
        }
        diameters.push(value);
    }

    let has_unit = caps.get(3).is_some();
    let length_m = match caps.get(4) {
        Some(field) => {
            let value = parse_numeric_field(field.as_str())?;
            if value <= 0.0 {
                return None;
            }
            Some(value)
        }
        None => None,
    };

    // at least one anchor: the cm unit or an explicit length
    if !has_unit && length_m.is_none() {
        return None;
    }

    Some(MaterialCode::new(quantity, diameters, length_m))
}
