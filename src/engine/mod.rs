//! Association engine: turns per-page text into associations, orphans
//! and statistics.
//!
//! Pages are processed strictly in index order; proximity is a bounded
//! window of segments, never the whole page, so unrelated table rows do
//! not group together.

use std::collections::HashSet;

use crate::model::{Association, CircleCode, MaterialRecord};
use crate::options::{DedupScope, ExtractOptions};
use crate::pattern::{PatternLibrary, SegmentMatches};
use crate::provider::PageText;

/// Output of one engine run.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    /// Circle-bearing associations (including circle-only entries), in
    /// document order
    pub associations: Vec<Association>,

    /// Every material occurrence with its optional owner, in document
    /// order
    pub materials: Vec<MaterialRecord>,

    /// Candidates discarded by semantic validation
    pub rejected_tokens: usize,
}

/// Scans page text and builds the association set.
pub struct AssociationEngine {
    patterns: PatternLibrary,
    lookahead: usize,
    dedup: DedupScope,
}

impl AssociationEngine {
    /// Create an engine from extraction options.
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            patterns: PatternLibrary::new(),
            lookahead: options.lookahead,
            dedup: options.dedup,
        }
    }

    /// Process all pages, in order.
    pub fn run(&self, pages: &[PageText]) -> EngineOutput {
        let mut output = EngineOutput::default();

        // (page?, circle, material) pairs already emitted; the page
        // component is dropped under document-wide dedup so a repeat on
        // a later page collapses too
        let mut seen: HashSet<(Option<u32>, String, String)> = HashSet::new();

        for page in pages {
            self.run_page(page, &mut seen, &mut output);
        }

        output
    }

    fn run_page(
        &self,
        page: &PageText,
        seen: &mut HashSet<(Option<u32>, String, String)>,
        output: &mut EngineOutput,
    ) {
        let segments: Vec<&str> = page.text.lines().collect();
        let scans: Vec<SegmentMatches> = segments
            .iter()
            .map(|segment| self.patterns.scan_segment(segment))
            .collect();
        output.rejected_tokens += scans.iter().map(|s| s.rejected).sum::<usize>();

        let owners = self.claim_materials(&scans);

        // one association per (page, circle code), in first-occurrence
        // order; repeated occurrences of the same code merge
        let mut page_assocs: Vec<Association> = Vec::new();
        for scan in &scans {
            for circle in &scan.circles {
                if !page_assocs
                    .iter()
                    .any(|a| a.circle.as_ref() == Some(&circle.code))
                {
                    page_assocs.push(Association::new(page.number, circle.code.clone()));
                }
            }
        }

        // attach materials in textual order, deduplicating pairs
        for (si, scan) in scans.iter().enumerate() {
            for (mi, material) in scan.materials.iter().enumerate() {
                let owner = owners[si][mi].clone();
                let page_key = match self.dedup {
                    DedupScope::Page => Some(page.number),
                    DedupScope::Document => None,
                };
                let circle_key = owner
                    .as_ref()
                    .map(|c| c.as_str().to_string())
                    .unwrap_or_default();
                let key = (page_key, circle_key, material.code.as_str().to_string());
                if !seen.insert(key) {
                    continue;
                }

                if let Some(circle) = owner.as_ref() {
                    if let Some(assoc) = page_assocs
                        .iter_mut()
                        .find(|a| a.circle.as_ref() == Some(circle))
                    {
                        assoc.materials.push(material.code.clone());
                    }
                }

                output.materials.push(MaterialRecord {
                    page: page.number,
                    circle: owner,
                    material: material.code.clone(),
                });
            }
        }

        output.associations.append(&mut page_assocs);
    }

    /// Decide which circle, if any, claims each material occurrence.
    ///
    /// Two passes: materials first bind to the nearest circle on their
    /// own segment, then circles claim leftover materials in the
    /// following `lookahead` segments, in document order. A material is
    /// claimed at most once.
    fn claim_materials(&self, scans: &[SegmentMatches]) -> Vec<Vec<Option<CircleCode>>> {
        let mut owners: Vec<Vec<Option<CircleCode>>> = scans
            .iter()
            .map(|scan| vec![None; scan.materials.len()])
            .collect();

        // pass 1: same-segment binding, nearest circle wins
        for (si, scan) in scans.iter().enumerate() {
            if scan.circles.is_empty() {
                continue;
            }
            for (mi, material) in scan.materials.iter().enumerate() {
                let nearest = scan
                    .circles
                    .iter()
                    .min_by_key(|circle| span_distance(&circle.span, &material.span));
                if let Some(circle) = nearest {
                    owners[si][mi] = Some(circle.code.clone());
                }
            }
        }

        // pass 2: forward window over following segments
        for si in 0..scans.len() {
            for circle in &scans[si].circles {
                let end = (si + self.lookahead).min(scans.len().saturating_sub(1));
                for sj in (si + 1)..=end {
                    for owner in owners[sj].iter_mut() {
                        if owner.is_none() {
                            *owner = Some(circle.code.clone());
                        }
                    }
                }
            }
        }

        owners
    }
}

/// Character gap between two non-overlapping spans on a segment.
fn span_distance(a: &std::ops::Range<usize>, b: &std::ops::Range<usize>) -> usize {
    if a.end <= b.start {
        b.start - a.end
    } else if b.end <= a.start {
        a.start - b.end
    } else {
        0
    }
}
