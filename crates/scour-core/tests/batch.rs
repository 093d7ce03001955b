//! Batch pipeline: discovery, worker pool, per-item outcomes, persistence.

mod common;

use common::*;
use scour_core::{discover, Config, ItemStatus, Processor};
use std::path::PathBuf;

#[tokio::test]
async fn batch_cleans_directory_in_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");

    let gps_jpeg = {
        let mut tiff = TiffBuilder::new();
        tiff.ifd0.push(Entry::ascii(0x010F, "Canon"));
        tiff.gps = gps_berlin();
        jpeg_with_exif(4, 4, &tiff.build())
    };
    std::fs::write(dir.path().join("a.png"), png_with_text(4, 4, "Author", "me")).unwrap();
    std::fs::write(dir.path().join("b.jpg"), &gps_jpeg).unwrap();
    std::fs::write(dir.path().join("corrupt.jpg"), b"\xFF\xD8 not really").unwrap();
    std::fs::write(dir.path().join("d.png"), encode_png(4, 4)).unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"skipped by discovery").unwrap();

    let inputs = discover(&[dir.path().to_path_buf()]);
    assert_eq!(inputs.len(), 4);

    let mut config = Config::default();
    config.general.output_dir = Some(out_dir.clone());
    let processor = Processor::new(&config);
    let results = processor.submit(inputs.clone()).collect().await;

    assert_eq!(results.len(), 4);
    for (result, input) in results.iter().zip(&inputs) {
        assert_eq!(&result.input, input);
    }

    assert!(results[0].status.is_success());
    assert!(results[1].status.is_success());
    assert!(matches!(results[2].status, ItemStatus::DecodeFailure { .. }));
    assert!(results[3].status.is_success());

    // GPS was found before cleaning and is gone after.
    assert_eq!(
        results[1].report.get("GPS-Koordinaten"),
        Some("52.520008, 13.404954")
    );
    assert!(!results[1].cleaned_report.as_ref().unwrap().has_sensitive());

    for (result, name) in [
        (&results[0], "a_cleaned.png"),
        (&results[1], "b_cleaned.jpg"),
        (&results[3], "d_cleaned.png"),
    ] {
        let output = out_dir.join(name);
        assert_eq!(result.output.as_deref(), Some(output.as_path()));
        let written = std::fs::metadata(&output).unwrap().len();
        assert_eq!(result.bytes_written, Some(written));
    }
}

#[tokio::test]
async fn unsupported_input_reported_without_reading() {
    let processor = Processor::new(&Config::default());
    let results = processor
        .submit(vec![PathBuf::from("/definitely/missing/clip.gif")])
        .collect()
        .await;

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].status,
        ItemStatus::UnsupportedFormat {
            extension: "gif".to_string()
        }
    );
}

#[tokio::test]
async fn oversized_file_reported_as_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    let big = dir.path().join("big.png");
    std::fs::write(&big, vec![0u8; 3 * 1024 * 1024]).unwrap();

    let mut config = Config::default();
    config.limits.max_file_size_mb = 2;
    config.general.output_dir = Some(dir.path().join("out"));
    let processor = Processor::new(&config);
    let results = processor.submit(vec![big]).collect().await;

    match &results[0].status {
        ItemStatus::IoFailure { message } => assert!(message.contains("too large")),
        other => panic!("expected IoFailure, got {:?}", other),
    }
}
