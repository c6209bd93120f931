//! Shared helpers for integration tests: synthetic PDFs and fake OCR
//! engines.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use rebarex::{Error, OcrEngine, PageRenderer, Result};

/// Build a PDF whose pages carry an embedded text layer, one text
/// string per page.
pub fn text_pdf(pages: &[&str]) -> Vec<u8> {
    build_pdf(pages.iter().map(|text| Some(*text)).collect())
}

/// Build a PDF with the given number of pages and no text layer at all.
pub fn blank_pdf(page_count: usize) -> Vec<u8> {
    build_pdf(vec![None; page_count])
}

fn build_pdf(pages: Vec<Option<&str>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in &pages {
        let operations = match text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 750.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => Vec::new(),
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}

/// Fake renderer that "renders" a page by writing the scripted page
/// text into the image file, where [`FakeOcr`] reads it back.
pub struct FakeRenderer {
    texts: Vec<String>,
}

impl FakeRenderer {
    pub fn new(texts: &[&str]) -> Self {
        Self {
            texts: texts.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl PageRenderer for FakeRenderer {
    fn render_page(&self, _pdf: &Path, page: u32, _dpi: u32, scratch: &Path) -> Result<PathBuf> {
        let text = self
            .texts
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default();
        let path = scratch.join(format!("page-{}.png", page));
        std::fs::write(&path, text)?;
        Ok(path)
    }
}

/// Fake OCR engine that returns whatever [`FakeRenderer`] wrote.
pub struct FakeOcr;

impl OcrEngine for FakeOcr {
    fn recognize(&self, image: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(image)?)
    }
}

/// Renderer that always fails, for exercising degradation paths.
pub struct FailingRenderer;

impl PageRenderer for FailingRenderer {
    fn render_page(&self, _pdf: &Path, page: u32, _dpi: u32, _scratch: &Path) -> Result<PathBuf> {
        Err(Error::PageRender(format!("no renderer for page {}", page)))
    }
}

/// OCR engine that always fails.
pub struct FailingOcr;

impl OcrEngine for FailingOcr {
    fn recognize(&self, _image: &Path) -> Result<String> {
        Err(Error::Ocr("engine offline".to_string()))
    }
}
