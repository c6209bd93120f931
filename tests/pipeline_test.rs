//! Integration tests for the extraction pipeline: page text sourcing,
//! OCR fallback, degradation and cancellation.

mod common;

use std::sync::Arc;

use common::{blank_pdf, text_pdf, FailingOcr, FailingRenderer, FakeOcr, FakeRenderer};
use rebarex::{CancelToken, Extractor, TextSource};

#[test]
fn test_native_text_layer_never_invokes_ocr() {
    let pdf = text_pdf(&["P1  12Rfi8/10cm,L=1m", "T3  5Rfi12cm,L=2m"]);

    // a failing renderer guarantees the test would notice any OCR call
    let result = Extractor::new()
        .with_renderer(Arc::new(FailingRenderer))
        .with_ocr_engine(Arc::new(FailingOcr))
        .extract_bytes(&pdf)
        .unwrap();

    assert_eq!(result.pages.len(), 2);
    assert!(result
        .pages
        .iter()
        .all(|page| page.source == TextSource::Native));
    assert!(result.warnings.is_empty());
    assert_eq!(result.stats.native_pages, 2);
    assert_eq!(result.stats.ocr_pages, 0);
}

#[test]
fn test_empty_text_layer_falls_back_to_ocr() {
    let pdf = blank_pdf(1);

    let result = Extractor::new()
        .with_renderer(Arc::new(FakeRenderer::new(&["P1  12Rfi8/10cm,L=1m"])))
        .with_ocr_engine(Arc::new(FakeOcr))
        .extract_bytes(&pdf)
        .unwrap();

    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.pages[0].source, TextSource::Ocr);
    assert_eq!(result.stats.ocr_pages, 1);

    assert_eq!(result.associations.len(), 1);
    let assoc = &result.associations[0];
    assert_eq!(assoc.circle.as_ref().unwrap().as_str(), "P1");
    assert_eq!(assoc.materials[0].quantity, 12);
    assert_eq!(assoc.materials[0].diameters, vec![8.0, 10.0]);
    assert_eq!(assoc.materials[0].length_m, Some(1.0));
}

#[test]
fn test_source_is_chosen_per_page() {
    let with_layer = text_pdf(&["P1  12Rfi8/10cm,L=1m"]);
    let result = Extractor::new()
        .with_renderer(Arc::new(FakeRenderer::new(&["unused"])))
        .with_ocr_engine(Arc::new(FakeOcr))
        .extract_bytes(&with_layer)
        .unwrap();
    assert_eq!(result.pages[0].source, TextSource::Native);

    let without_layer = blank_pdf(1);
    let result = Extractor::new()
        .with_renderer(Arc::new(FakeRenderer::new(&["T3 5Rfi12cm,L=2m"])))
        .with_ocr_engine(Arc::new(FakeOcr))
        .extract_bytes(&without_layer)
        .unwrap();
    assert_eq!(result.pages[0].source, TextSource::Ocr);
}

#[test]
fn test_ocr_failure_degrades_to_warning() {
    let pdf = blank_pdf(2);

    let result = Extractor::new()
        .with_renderer(Arc::new(FakeRenderer::new(&["a", "b"])))
        .with_ocr_engine(Arc::new(FailingOcr))
        .extract_bytes(&pdf)
        .unwrap();

    assert_eq!(result.warnings.len(), 2);
    assert_eq!(result.warnings[0].page, 1);
    assert_eq!(result.warnings[1].page, 2);
    assert!(result.associations.is_empty());
    assert!(result.materials.is_empty());
}

#[test]
fn test_render_failure_degrades_to_warning() {
    let pdf = blank_pdf(1);

    let result = Extractor::new()
        .with_renderer(Arc::new(FailingRenderer))
        .with_ocr_engine(Arc::new(FakeOcr))
        .extract_bytes(&pdf)
        .unwrap();

    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].reason.contains("no renderer"));
}

#[test]
fn test_empty_document_yields_empty_result() {
    let pdf = text_pdf(&[]);

    let result = rebarex::extract_bytes(&pdf).unwrap();

    assert!(result.pages.is_empty());
    assert!(result.associations.is_empty());
    assert!(result.materials.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_pipeline_is_idempotent_with_parallel_ocr() {
    let pdf = blank_pdf(4);
    let texts = [
        "P1 12Rfi8/10cm,L=1m",
        "T3 5Rfi12cm,L=2m\n39Rfi12/15cm,L=2.5m",
        "10Rfi10/10/10cm,L=3.5m",
        "UT7a 8Rfi6/25cm",
    ];

    let run = || {
        Extractor::new()
            .with_renderer(Arc::new(FakeRenderer::new(&texts)))
            .with_ocr_engine(Arc::new(FakeOcr))
            .extract_bytes(&pdf)
            .unwrap()
    };

    let first = serde_json::to_string(&run()).unwrap();
    let second = serde_json::to_string(&run()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_sequential_and_parallel_agree() {
    let pdf = blank_pdf(3);
    let texts = ["P1 12Rfi8/10cm,L=1m", "T3 5Rfi12cm,L=2m", "R14 8Rfi6/25cm"];

    let parallel = Extractor::new()
        .with_renderer(Arc::new(FakeRenderer::new(&texts)))
        .with_ocr_engine(Arc::new(FakeOcr))
        .extract_bytes(&pdf)
        .unwrap();

    let sequential = Extractor::new()
        .sequential()
        .with_renderer(Arc::new(FakeRenderer::new(&texts)))
        .with_ocr_engine(Arc::new(FakeOcr))
        .extract_bytes(&pdf)
        .unwrap();

    assert_eq!(
        serde_json::to_string(&parallel).unwrap(),
        serde_json::to_string(&sequential).unwrap()
    );
}

#[test]
fn test_cancelled_run_starts_no_pages() {
    let pdf = text_pdf(&["P1  12Rfi8/10cm,L=1m", "T3  5Rfi12cm,L=2m"]);

    let token = CancelToken::new();
    token.cancel();

    let result = Extractor::new()
        .with_renderer(Arc::new(FailingRenderer))
        .with_ocr_engine(Arc::new(FailingOcr))
        .with_cancel_token(token)
        .extract_bytes(&pdf)
        .unwrap();

    // every page was skipped: empty text, one warning each
    assert_eq!(result.warnings.len(), 2);
    assert!(result
        .warnings
        .iter()
        .all(|w| w.reason.contains("cancelled")));
    assert!(result.associations.is_empty());
}

#[test]
fn test_ocr_noise_is_tolerated_through_the_pipeline() {
    let pdf = blank_pdf(1);

    // ligature in the prefix, S misread for 5 in the length digits
    let result = Extractor::new()
        .with_renderer(Arc::new(FakeRenderer::new(&["P1 39Rﬁ12/15cm,L=2.Sm"])))
        .with_ocr_engine(Arc::new(FakeOcr))
        .extract_bytes(&pdf)
        .unwrap();

    assert_eq!(result.associations.len(), 1);
    let material = &result.associations[0].materials[0];
    assert_eq!(material.quantity, 39);
    assert_eq!(material.diameters, vec![12.0, 15.0]);
    assert_eq!(material.length_m, Some(2.5));
}

#[test]
fn test_unmapped_ocr_corruption_is_rejected_and_counted() {
    let pdf = blank_pdf(1);

    let result = Extractor::new()
        .with_renderer(Arc::new(FakeRenderer::new(&["P1 39Rfi12/15cm,L=2.#m"])))
        .with_ocr_engine(Arc::new(FakeOcr))
        .extract_bytes(&pdf)
        .unwrap();

    assert!(result.materials.is_empty());
    assert!(result.stats.rejected_tokens >= 1);
}

#[test]
fn test_unreadable_document_is_fatal() {
    let result = rebarex::extract_bytes(b"this is not a pdf");
    assert!(result.is_err());
}
