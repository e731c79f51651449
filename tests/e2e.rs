mod common;

use common::synthetic_page::{barcode_box, blank_page_with_barcode, raster, signed_page};
use sigscan::export::{export_records, to_csv_string};
use sigscan::replay::ReplayEngine;
use sigscan::scan::{BatchScanner, ScanInput, ScanOptions};
use sigscan::vision::SignatureRegion;
use sigscan::{classify_signatures, detect_signature, BarcodeSymbol, EngineDetection, SignatureConfig};

#[test]
fn signed_page_is_detected() {
    let page = raster(signed_page());
    let corners = barcode_box().to_quad().points().to_vec();

    let verdict = detect_signature(&page, &corners, &SignatureConfig::default());

    assert!(verdict.detected, "expected a signature, got {:?}", verdict);
    assert!(
        verdict.confidence > 40.0 && verdict.confidence < 100.0,
        "confidence out of range: {:.2}",
        verdict.confidence
    );
    assert_eq!(verdict.potential_blocks, 2);
    assert_eq!(verdict.max_block_length, 150);
    assert_eq!(
        verdict.region,
        Some(SignatureRegion {
            x: 440,
            y: 90,
            width: 450,
            height: 350,
        })
    );
}

#[test]
fn white_area_is_not_detected() {
    let page = raster(blank_page_with_barcode());
    let corners = barcode_box().to_quad().points().to_vec();

    let verdict = detect_signature(&page, &corners, &SignatureConfig::default());

    assert!(!verdict.detected);
    assert_eq!(verdict.pixel_density, 0.0);
    assert!(verdict.confidence < 1.0, "confidence {:.2}", verdict.confidence);
}

#[test]
fn repeated_detection_is_identical() {
    let page = raster(signed_page());
    let corners = barcode_box().to_quad().points().to_vec();
    let config = SignatureConfig::default();

    let first = detect_signature(&page, &corners, &config);
    let second = detect_signature(&page, &corners, &config);

    assert_eq!(first, second);
    assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
}

fn symbol_at(text: &str, x: f64, y: f64) -> BarcodeSymbol {
    let mut symbol = BarcodeSymbol::from_detection(EngineDetection::new(text, "CODE_39"), Some(1));
    symbol.center = sigscan::Point2D::new(x, y);
    symbol
}

#[test]
fn symbols_come_back_in_reading_order() {
    let page = raster(blank_page_with_barcode());
    let symbols = vec![
        symbol_at("A", 50.0, 10.0),
        symbol_at("B", 10.0, 15.0),
        symbol_at("C", 5.0, 200.0),
    ];

    let sorted = classify_signatures(&page, symbols, &ScanOptions::default());
    let order: Vec<&str> = sorted.iter().map(|s| s.text.as_str()).collect();

    assert_eq!(order, vec!["B", "A", "C"]);
    assert!(sorted.iter().all(|s| s.has_signature == Some(false)));
}

#[tokio::test]
async fn batch_from_files_and_recording() {
    let dir = tempfile::tempdir().unwrap();
    signed_page().save(dir.path().join("signed.png")).unwrap();
    blank_page_with_barcode()
        .save(dir.path().join("blank.png"))
        .unwrap();

    let recording = r#"{
        "signed.png": [ { "detections": [ {
            "text": "INV-1", "format": "CODE_39",
            "quadPoints": [ {"x":100,"y":100}, {"x":300,"y":100}, {"x":300,"y":150}, {"x":100,"y":150} ]
        } ] } ],
        "blank.png": [ { "detections": [ {
            "text": "INV-2", "format": "CODE_39",
            "boundingBox": { "x1": 100, "y1": 100, "x2": 300, "y2": 150 }
        } ] } ]
    }"#;
    let engine = ReplayEngine::from_json(recording).unwrap();
    let mut scanner = BatchScanner::new(Box::new(engine), ScanOptions::default());

    let inputs = vec![
        ScanInput::file(dir.path().join("signed.png")),
        ScanInput::file(dir.path().join("blank.png")),
        ScanInput::file(dir.path().join("missing.png")),
    ];
    let results = scanner.scan_batch(inputs).await.into_results();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[0].signature);
    assert_eq!(results[0].symbols[0].text, "INV-1");
    assert!(results[1].is_ok());
    assert!(!results[1].signature);
    assert!(results[2].error.is_some());

    let csv = to_csv_string(&export_records(&results));
    assert_eq!(csv, "Barcode,Signature\n\"INV-1\",\"1\"\n\"INV-2\",\"0\"\n");
}
