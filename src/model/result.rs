//! Extraction result, filter views, warnings and statistics.

use super::{Association, CircleCode, CircleCodeSet, MaterialRecord};
use serde::{Deserialize, Serialize};

/// How a page's text was obtained.
///
/// Exactly one source is chosen per page; sources are never mixed within
/// a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// Embedded text layer read directly from the PDF
    Native,
    /// Optical character recognition over a rendered page image
    Ocr,
}

/// Per-page provenance recorded by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    /// 1-based page number
    pub number: u32,

    /// Where the page's text came from
    pub source: TextSource,
}

/// A recoverable per-page failure.
///
/// Produced when both native extraction and OCR fail for a page, or when
/// a page was skipped by cancellation. The page contributes empty text
/// and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWarning {
    /// 1-based page number
    pub page: u32,

    /// Human-readable failure reason
    pub reason: String,
}

impl PageWarning {
    /// Create a warning for a page.
    pub fn new(page: u32, reason: impl Into<String>) -> Self {
        Self {
            page,
            reason: reason.into(),
        }
    }
}

/// Aggregate diagnostics for one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractStats {
    /// Pages whose text came from the embedded text layer
    pub native_pages: usize,

    /// Pages whose text came from OCR
    pub ocr_pages: usize,

    /// Candidate tokens that partially matched a pattern but failed
    /// semantic validation and were discarded
    pub rejected_tokens: usize,
}

/// The complete output of one extraction run.
///
/// Immutable once the association engine completes. The three filter
/// views ([`filter_by_circle_codes`](Self::filter_by_circle_codes),
/// [`all_circle_codes`](Self::all_circle_codes),
/// [`all_materials`](Self::all_materials)) preserve document order:
/// page ascending, then first occurrence within the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Per-page text provenance, in page order
    pub pages: Vec<PageSummary>,

    /// Circle-bearing associations (including circle-only entries),
    /// in document order
    pub associations: Vec<Association>,

    /// Every material occurrence with its optional owner, in document
    /// order; orphans have no owner
    pub materials: Vec<MaterialRecord>,

    /// Recoverable per-page failures
    pub warnings: Vec<PageWarning>,

    /// Aggregate diagnostics
    pub stats: ExtractStats,
}

impl ExtractionResult {
    /// Associations whose circle code is in the requested set.
    ///
    /// Comparison is case/whitespace-normalized; requested codes absent
    /// from the document simply produce no entries.
    pub fn filter_by_circle_codes(&self, requested: &CircleCodeSet) -> Vec<&Association> {
        self.associations
            .iter()
            .filter(|assoc| {
                assoc
                    .circle
                    .as_ref()
                    .is_some_and(|code| requested.contains(code))
            })
            .collect()
    }

    /// Every circle-bearing association, including circle-only entries.
    pub fn all_circle_codes(&self) -> Vec<&Association> {
        self.associations
            .iter()
            .filter(|assoc| assoc.circle.is_some())
            .collect()
    }

    /// Every material occurrence, orphans included.
    pub fn all_materials(&self) -> &[MaterialRecord] {
        &self.materials
    }

    /// Materials claimed by no circle window.
    pub fn orphans(&self) -> impl Iterator<Item = &MaterialRecord> {
        self.materials.iter().filter(|record| record.is_orphan())
    }

    /// Per-circle material counts, in first-occurrence order.
    pub fn count_by_circle(&self) -> Vec<(&CircleCode, usize)> {
        let mut counts: Vec<(&CircleCode, usize)> = Vec::new();
        for assoc in &self.associations {
            let Some(circle) = assoc.circle.as_ref() else {
                continue;
            };
            match counts.iter_mut().find(|(code, _)| *code == circle) {
                Some((_, count)) => *count += assoc.materials.len(),
                None => counts.push((circle, assoc.materials.len())),
            }
        }
        counts
    }
}

/// One self-contained tabular row for an external exporter.
///
/// Each row is independently renderable: page, nullable circle code and
/// the material fields are all inline, never references to other rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    /// 1-based page number
    pub page: u32,

    /// Circle code, absent for orphan materials
    pub circle: Option<String>,

    /// Canonical material text, absent for circle-only entries
    pub material: Option<String>,

    /// Bar count
    pub quantity: Option<u32>,

    /// Bar diameters in millimetres
    pub diameters: Vec<f64>,

    /// Bar length in metres
    pub length_m: Option<f64>,
}

impl ExportRow {
    /// Flatten an association into rows, one per material.
    ///
    /// A circle-only entry yields a single row with empty material
    /// fields.
    pub fn from_association(assoc: &Association) -> Vec<ExportRow> {
        let circle = assoc.circle.as_ref().map(|c| c.as_str().to_string());
        if assoc.materials.is_empty() {
            return vec![ExportRow {
                page: assoc.page,
                circle,
                material: None,
                quantity: None,
                diameters: Vec::new(),
                length_m: None,
            }];
        }
        assoc
            .materials
            .iter()
            .map(|material| ExportRow {
                page: assoc.page,
                circle: circle.clone(),
                material: Some(material.as_str().to_string()),
                quantity: Some(material.quantity),
                diameters: material.diameters.clone(),
                length_m: material.length_m,
            })
            .collect()
    }

    /// Convert one material record into a row.
    pub fn from_record(record: &MaterialRecord) -> ExportRow {
        ExportRow {
            page: record.page,
            circle: record.circle.as_ref().map(|c| c.as_str().to_string()),
            material: Some(record.material.as_str().to_string()),
            quantity: Some(record.material.quantity),
            diameters: record.material.diameters.clone(),
            length_m: record.material.length_m,
        }
    }
}
