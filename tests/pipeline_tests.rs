// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Pipeline and frame integration tests.
//!
//! Tests cover:
//! - Frames produced by one registry and read by another
//! - Processor ordering on the way back
//! - Option handling through a full pipeline
//! - Frames naming unregistered plugins

mod common;

use std::sync::Arc;

use common::{builtin_registry, XorProcessor};
use serde_json::json;
use transcodec::pipeline::{self, Pipeline};
use transcodec::plugin::builtin::{Crc32Processor, JsonSerializer, ZstdProcessor};
use transcodec::registry::{PluginRegistry, StaticSource};
use transcodec::{CodecError, Options, PluginKind, Processor};

fn sample() -> serde_json::Value {
    json!({
        "topic": "/camera/front",
        "frames": [1, 2, 3, 5, 8, 13],
        "calibration": {"fx": 615.3, "fy": 615.9},
        "note": "x".repeat(512),
    })
}

#[test]
fn test_frame_read_by_separate_registry() {
    let writer = builtin_registry();
    let reader = builtin_registry();

    let pipeline = Pipeline::from_names(&writer, "json", &["lz4", "bzip2", "crc32"]).unwrap();
    let frame = pipeline.to_frame(&sample(), &Options::new()).unwrap();

    let restored = pipeline::from_frame(&reader, &frame, &Options::new()).unwrap();
    assert_eq!(restored, sample());
}

#[test]
fn test_processors_reversed_in_order() {
    let registry = builtin_registry();
    registry.add_processor(XorProcessor::<0x50>::new("xor50")).unwrap();

    let pipeline = Pipeline::from_names(&registry, "json", &["zstd", "xor50"]).unwrap();
    let payload = pipeline.encode_payload(&sample(), &Options::new()).unwrap();

    // The outermost layer is the XOR, so undoing it yields a zstd stream.
    let xor = registry.processor_named("xor50").unwrap();
    let unxored = xor.reverse_bytes(&payload, &Options::new()).unwrap();
    assert!(ZstdProcessor
        .reverse_bytes(&unxored, &Options::new())
        .is_ok());

    assert_eq!(
        pipeline.decode_payload(&payload, &Options::new()).unwrap(),
        sample()
    );
}

#[test]
fn test_toml_pipeline_with_options() {
    let registry = builtin_registry();
    let pipeline = Pipeline::from_names(&registry, "toml", &["zstd"]).unwrap();

    let mut options = Options::new();
    options.insert("zstd.level".to_string(), "19".to_string());

    let value = json!({"name": "lidar", "rate": 10, "enabled": true});
    let frame = pipeline.to_frame(&value, &options).unwrap();
    assert_eq!(
        pipeline::from_frame(&registry, &frame, &Options::new()).unwrap(),
        value
    );
}

#[test]
fn test_invalid_option_surfaces() {
    let registry = builtin_registry();
    let pipeline = Pipeline::from_names(&registry, "json", &["zstd"]).unwrap();

    let mut options = Options::new();
    options.insert("zstd.level".to_string(), "99".to_string());

    let err = pipeline.to_frame(&sample(), &options).unwrap_err();
    assert!(matches!(err, CodecError::InvalidOption { .. }));
}

#[test]
fn test_frame_with_unregistered_processor() {
    let writer = builtin_registry();
    writer.add_processor(XorProcessor::<0x51>::new("private")).unwrap();
    let pipeline = Pipeline::from_names(&writer, "json", &["private"]).unwrap();
    let frame = pipeline.to_frame(&sample(), &Options::new()).unwrap();

    let reader = builtin_registry();
    let err = pipeline::from_frame(&reader, &frame, &Options::new()).unwrap_err();
    assert!(matches!(
        err,
        CodecError::UnknownIdentifier {
            kind: PluginKind::Processor,
            identifier: 0x51
        }
    ));
}

#[test]
fn test_corrupted_frame_detected() {
    let registry = builtin_registry();
    let pipeline = Pipeline::from_names(&registry, "json", &["crc32"]).unwrap();
    let mut frame = pipeline.to_frame(&sample(), &Options::new()).unwrap();

    let middle = frame.len() / 2;
    frame[middle] ^= 0x01;
    assert!(pipeline::from_frame(&registry, &frame, &Options::new()).is_err());
}

#[test]
fn test_short_frame_rejected() {
    let registry = builtin_registry();
    let err = pipeline::from_frame(&registry, &[0x01, 0x10], &Options::new()).unwrap_err();
    assert!(matches!(err, CodecError::Frame { .. }));
}

#[test]
fn test_resolve_frame_reports_pipeline() {
    let source = StaticSource::new()
        .with_serializer(JsonSerializer)
        .with_processor(ZstdProcessor)
        .with_processor(Crc32Processor);
    let registry = PluginRegistry::from_source(&source).unwrap();

    let pipeline = Pipeline::new(
        registry.serializer_named("json").unwrap(),
        vec![
            registry.processor_named("zstd").unwrap(),
            registry.processor_named("crc32").unwrap(),
        ],
    )
    .unwrap();
    let frame = pipeline.to_frame(&sample(), &Options::new()).unwrap();

    let resolved = pipeline::resolve_frame(&registry, &mut frame.as_slice()).unwrap();
    assert_eq!(resolved.id(), pipeline.id());
    assert_eq!(resolved.serializer().name(), "json");
    let names: Vec<_> = resolved.processors().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["zstd", "crc32"]);
}

#[test]
fn test_pipeline_rejects_eight_processors() {
    let registry = builtin_registry();
    let zstd = registry.processor_named("zstd").unwrap();
    let chain: Vec<Arc<dyn Processor>> = (0..8).map(|_| Arc::clone(&zstd)).collect();

    let err = Pipeline::new(registry.serializer_named("json").unwrap(), chain).unwrap_err();
    assert!(matches!(err, CodecError::TooManyProcessors { .. }));
}
