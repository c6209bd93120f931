//! Material code types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A structured rebar material specification.
///
/// Canonical text form is `<quantity>Rfi<d>/<d>[/<d>]cm,L=<length>m`,
/// e.g. `39Rfi12/15cm,L=2.5m`. Multiple `/`-separated diameters describe
/// composite bar groups. The length clause is absent for spacing-only
/// specs (`8Rfi6/25cm`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCode {
    /// Bar count
    pub quantity: u32,

    /// Bar diameters in millimetres, in written order
    pub diameters: Vec<f64>,

    /// Bar length in metres, when the spec carries one
    pub length_m: Option<f64>,

    /// Canonical normalized text form
    text: String,
}

impl MaterialCode {
    /// Build a material code from parsed fields; the canonical text is
    /// derived from them.
    pub fn new(quantity: u32, diameters: Vec<f64>, length_m: Option<f64>) -> Self {
        let text = render_canonical(quantity, &diameters, length_m);
        Self {
            quantity,
            diameters,
            length_m,
            text,
        }
    }

    /// The canonical normalized text form.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for MaterialCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn render_canonical(quantity: u32, diameters: &[f64], length_m: Option<f64>) -> String {
    let dims = diameters
        .iter()
        .map(|d| format_number(*d))
        .collect::<Vec<_>>()
        .join("/");
    match length_m {
        Some(len) => format!("{}Rfi{}cm,L={}m", quantity, dims, format_number(len)),
        None => format!("{}Rfi{}cm", quantity, dims),
    }
}

/// Format a numeric field without a trailing `.0` for whole values.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
