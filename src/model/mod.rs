//! Data model for extraction results.

mod association;
mod circle;
mod material;
mod result;

pub use association::{Association, MaterialRecord};
pub use circle::{CircleCode, CircleCodeSet};
pub use material::MaterialCode;
pub use result::{
    ExportRow, ExtractStats, ExtractionResult, PageSummary, PageWarning, TextSource,
};
