//! Routing and fallback behaviour of the extraction router with fake clients.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use folio_extractors::{
    BlobLocation, ExtractError, ExtractResult, ExtractionRouter, MemoryBlobStore, OcrEngine,
    TextAnnotation, TextDetector,
};
use image::{DynamicImage, ImageFormat, RgbImage};

/// Vision fake returning a canned response and counting calls.
struct FakeVision {
    response: Result<Vec<TextAnnotation>, String>,
    calls: AtomicUsize,
}

impl FakeVision {
    fn returning(annotations: Vec<TextAnnotation>) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(annotations),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextDetector for FakeVision {
    async fn detect_text(&self, _location: &BlobLocation) -> ExtractResult<Vec<TextAnnotation>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(ExtractError::Network)
    }

    fn name(&self) -> &str {
        "fake-vision"
    }
}

/// OCR fake that records every buffer it is handed.
struct FakeOcr {
    response: Result<String, String>,
    seen: Mutex<Vec<Vec<u8>>>,
}

impl FakeOcr {
    fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(message.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn last_buffer(&self) -> Vec<u8> {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl OcrEngine for FakeOcr {
    async fn recognize(&self, buffer: &[u8]) -> ExtractResult<String> {
        self.seen.lock().unwrap().push(buffer.to_vec());
        self.response.clone().map_err(ExtractError::Ocr)
    }

    fn name(&self) -> &str {
        "fake-ocr"
    }
}

fn sample_png() -> Vec<u8> {
    let img = RgbImage::from_fn(12, 12, |x, y| image::Rgb([(x * 20) as u8, (y * 20) as u8, 40]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

async fn blobs_with(path: &str, bytes: Vec<u8>) -> Arc<MemoryBlobStore> {
    let store = Arc::new(MemoryBlobStore::new());
    store.put(BlobLocation::new("notes", path), bytes).await;
    store
}

fn router(
    blobs: Arc<MemoryBlobStore>,
    ocr: Arc<FakeOcr>,
    vision: Arc<FakeVision>,
) -> ExtractionRouter {
    ExtractionRouter::builder()
        .fetcher(blobs)
        .ocr(ocr)
        .detector(vision)
        .build()
}

#[tokio::test]
async fn test_pdf_uses_local_ocr_only_on_raw_bytes() {
    let pdf = b"%PDF-1.4 raw".to_vec();
    let blobs = blobs_with("content/abc/a.pdf", pdf.clone()).await;
    let ocr = FakeOcr::returning("Hello");
    let vision = FakeVision::returning(vec![TextAnnotation::new("never")]);

    let text = router(blobs, ocr.clone(), vision.clone())
        .extract("notes", "content/abc/a.pdf", "application/pdf")
        .await
        .unwrap();

    assert_eq!(text.as_deref(), Some("Hello"));
    assert_eq!(vision.calls(), 0);
    assert_eq!(ocr.last_buffer(), pdf, "PDF bytes must reach OCR unprocessed");
}

#[tokio::test]
async fn test_image_vision_success_skips_ocr() {
    let blobs = blobs_with("content/abc/b.jpg", sample_png()).await;
    let ocr = FakeOcr::returning("ocr text");
    let vision = FakeVision::returning(vec![
        TextAnnotation::new("World\npage"),
        TextAnnotation::new("World"),
    ]);

    let text = router(blobs.clone(), ocr.clone(), vision.clone())
        .extract("notes", "content/abc/b.jpg", "image/jpeg")
        .await
        .unwrap();

    assert_eq!(text.as_deref(), Some("World\npage"));
    assert_eq!(vision.calls(), 1);
    assert_eq!(ocr.calls(), 0);
    assert_eq!(blobs.download_count(), 0);
}

#[tokio::test]
async fn test_image_zero_annotations_is_empty_text() {
    let blobs = blobs_with("content/abc/blank.png", sample_png()).await;
    let ocr = FakeOcr::returning("should not run");
    let vision = FakeVision::returning(Vec::new());

    let text = router(blobs, ocr.clone(), vision)
        .extract("notes", "content/abc/blank.png", "image/png")
        .await
        .unwrap();

    assert_eq!(text.as_deref(), Some(""));
    assert_eq!(ocr.calls(), 0);
}

#[tokio::test]
async fn test_image_vision_failure_falls_back_to_preprocessed_ocr() {
    let original = sample_png();
    let blobs = blobs_with("content/abc/c.png", original.clone()).await;
    let ocr = FakeOcr::returning("from tesseract");
    let vision = FakeVision::failing("quota exceeded");

    let text = router(blobs, ocr.clone(), vision.clone())
        .extract("notes", "content/abc/c.png", "image/png")
        .await
        .unwrap();

    assert_eq!(text.as_deref(), Some("from tesseract"));
    assert_eq!(vision.calls(), 1);

    let seen = ocr.last_buffer();
    assert_ne!(seen, original, "fallback OCR must receive preprocessed bytes");
    let decoded = image::load_from_memory(&seen).unwrap();
    assert_eq!(decoded.color(), image::ColorType::L8);
}

#[tokio::test]
async fn test_fallback_failure_propagates() {
    let blobs = blobs_with("content/abc/d.png", sample_png()).await;
    let ocr = FakeOcr::failing("engine crashed");
    let vision = FakeVision::failing("unavailable");

    let err = router(blobs, ocr, vision)
        .extract("notes", "content/abc/d.png", "image/png")
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::Ocr(ref m) if m == "engine crashed"));
}

#[tokio::test]
async fn test_fallback_preprocess_failure_is_fatal() {
    let blobs = blobs_with("content/abc/e.png", b"corrupt image bytes".to_vec()).await;
    let ocr = FakeOcr::returning("unused");
    let vision = FakeVision::failing("unavailable");

    let err = router(blobs, ocr.clone(), vision)
        .extract("notes", "content/abc/e.png", "image/png")
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::Preprocess(_)));
    assert_eq!(ocr.calls(), 0);
}

#[tokio::test]
async fn test_pdf_download_failure_propagates() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let ocr = FakeOcr::returning("unused");
    let vision = FakeVision::returning(Vec::new());

    let err = router(blobs, ocr, vision)
        .extract("notes", "content/abc/missing.pdf", "application/pdf")
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::BlobNotFound(_)));
}

#[tokio::test]
async fn test_unsupported_type_touches_nothing() {
    let blobs = blobs_with("content/abc/v.mp4", b"video".to_vec()).await;
    let ocr = FakeOcr::returning("unused");
    let vision = FakeVision::returning(Vec::new());

    let result = router(blobs.clone(), ocr.clone(), vision.clone())
        .extract("notes", "content/abc/v.mp4", "video/mp4")
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(vision.calls(), 0);
    assert_eq!(ocr.calls(), 0);
    assert_eq!(blobs.download_count(), 0);
}
