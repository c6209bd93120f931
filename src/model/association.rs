//! Association types binding circle codes to material codes.

use super::{CircleCode, MaterialCode};
use serde::{Deserialize, Serialize};

/// A circle code and the material codes claimed by its proximity window
/// on one page.
///
/// An empty material list is a circle-only entry: the code was found but
/// no material fell inside its window. Orphan materials (no circle at
/// all) are not represented as associations; they appear in
/// [`ExtractionResult::all_materials`](super::ExtractionResult::all_materials)
/// with no owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Association {
    /// 1-based page the association was found on
    pub page: u32,

    /// The owning circle code; `None` is reserved for callers that
    /// regroup orphans into association form
    pub circle: Option<CircleCode>,

    /// Claimed materials, in claim order
    pub materials: Vec<MaterialCode>,
}

impl Association {
    /// Create an association for a circle code on a page.
    pub fn new(page: u32, circle: CircleCode) -> Self {
        Self {
            page,
            circle: Some(circle),
            materials: Vec::new(),
        }
    }

    /// Whether this is a circle-only entry (no claimed materials).
    pub fn is_circle_only(&self) -> bool {
        self.materials.is_empty()
    }
}

/// One material occurrence with its optional owning circle code.
///
/// This is the flattened, document-ordered record behind the
/// "all materials" view; `circle` is `None` for orphans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    /// 1-based page the material was found on
    pub page: u32,

    /// Owning circle code, if any window claimed this occurrence
    pub circle: Option<CircleCode>,

    /// The material code
    pub material: MaterialCode,
}

impl MaterialRecord {
    /// Whether this material was claimed by no circle window.
    pub fn is_orphan(&self) -> bool {
        self.circle.is_none()
    }
}
