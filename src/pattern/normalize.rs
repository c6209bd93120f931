//! OCR text cleanup and the digit confusion table.
//!
//! OCR output of engineering drawings arrives with a recurring set of
//! defects: ligatures, table borders, stray punctuation, decimal commas
//! and letter/digit confusions inside numeric fields. Cleanup is applied
//! once, to OCR text only, before segmentation; the confusion table is
//! applied later, inside material-code candidates, and only to fields
//! where a digit is the sole valid reading.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Characters OCR engines commonly emit in place of digits, with the
/// digit they stand for. Applied only inside numeric fields of a
/// material-code candidate, never to circle codes.
const DIGIT_CONFUSIONS: &[(char, char)] = &[
    ('O', '0'),
    ('o', '0'),
    ('I', '1'),
    ('l', '1'),
    ('S', '5'),
    ('s', '5'),
    ('Z', '2'),
    ('z', '2'),
    ('B', '8'),
];

/// Cleanup pass over raw OCR page text.
pub struct OcrCleaner {
    hyphen_break: Regex,
    unit_misread: Regex,
    noise: Regex,
    spaces: Regex,
}

impl OcrCleaner {
    /// Create a cleaner with the standard rules.
    pub fn new() -> Self {
        Self {
            // material code split across lines with a trailing hyphen
            hyphen_break: Regex::new(r"(\d+\s*[Rr](?:[Ff][Iil1]|ﬁ)[^\n]*)-\s*\n\s*(\d)").unwrap(),
            // `em` misread for `cm` directly after a digit
            unit_misread: Regex::new(r"(\d)\s*[Ee][Mm]\b").unwrap(),
            // table borders and stray punctuation become spaces
            noise: Regex::new(r#"[|!"'’;~_]"#).unwrap(),
            spaces: Regex::new(r"[ \t]+").unwrap(),
        }
    }

    /// Clean raw OCR text while preserving line structure.
    ///
    /// Line breaks are kept: they are the engine's segment boundaries.
    /// Only horizontal whitespace collapses.
    pub fn clean(&self, text: &str) -> String {
        let text: String = text.nfc().collect();
        let text = text.replace('ﬁ', "fi").replace('ﬂ', "fl");
        let text = text.replace("..", ".");
        let text = self.hyphen_break.replace_all(&text, "$1$2");
        let text = self.unit_misread.replace_all(&text, "${1}cm");
        let text = self.noise.replace_all(&text, " ");
        let text = self.spaces.replace_all(&text, " ");

        text.lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for OcrCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Map confused letters in a numeric field back to digits.
///
/// Characters outside the confusion table pass through unchanged, so a
/// corruption the table does not cover still fails the numeric parse and
/// is rejected as a whole.
pub fn map_digit_confusions(field: &str) -> String {
    field
        .chars()
        .map(|c| {
            DIGIT_CONFUSIONS
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// Parse a numeric field after confusion mapping, accepting a decimal
/// comma as well as a decimal point.
pub fn parse_numeric_field(field: &str) -> Option<f64> {
    let mapped = map_digit_confusions(field).replace(',', ".");
    match mapped.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}
