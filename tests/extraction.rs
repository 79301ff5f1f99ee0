//! End-to-end extraction tests.
//!
//! Each test synthesises its input into a temporary directory, runs the
//! extractor and inspects both the returned record and the written files.

mod common;

use std::time::Duration;

use frameinfo::{
    AnimatedImage, ExtractOptions, ExtractPaths, FrameMetadata, FrameMetadataExtractor,
    FrameProbe, GifOptions,
};

use common::{HEIGHT, WIDTH, outputs, write_animated_webp, write_apng, write_gif, write_png};

// ── Frame counting and timing ─────────────────────────────────────

#[test]
fn ten_frames_at_100ms() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("run.gif");
    write_gif(&input, &[10; 10]);
    let (gif_path, json_path) = outputs(directory.path());

    let metadata = frameinfo::extract(&input, &gif_path, &json_path).expect("extract");

    assert_eq!(metadata.original_format, "GIF");
    assert_eq!(metadata.output_format, "GIF");
    assert_eq!(metadata.size, (u32::from(WIDTH), u32::from(HEIGHT)));
    assert_eq!(metadata.n_frames, 10);
    assert_eq!(metadata.frame_duration, vec![100; 10]);
    assert_eq!(metadata.average_fps, 10.0);
    assert!(metadata.defaulted_frames.is_empty());
}

#[test]
fn mixed_durations_average() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("mixed.gif");
    write_gif(&input, &[5, 10, 15]);
    let (gif_path, json_path) = outputs(directory.path());

    let metadata = frameinfo::extract(&input, &gif_path, &json_path).expect("extract");

    assert_eq!(metadata.n_frames, 3);
    assert_eq!(metadata.frame_duration, vec![50, 100, 150]);
    assert_eq!(metadata.average_fps, 10.0);
}

#[test]
fn frame_count_matches_duration_list() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("seven.gif");
    write_gif(&input, &[2, 3, 4, 5, 6, 7, 8]);

    let metadata = FrameProbe::probe(&input).expect("probe");
    assert_eq!(metadata.n_frames, 7);
    assert_eq!(metadata.frame_duration.len(), metadata.n_frames);

    let total: u32 = metadata.frame_duration.iter().sum();
    let mean = f64::from(total) / metadata.n_frames as f64;
    assert_eq!(
        metadata.average_fps,
        (1000.0 / mean * 100.0).round() / 100.0
    );
}

// ── Output files ──────────────────────────────────────────────────

#[test]
fn output_gif_round_trips_frame_count_and_timing() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("run.gif");
    write_gif(&input, &[4, 8, 12, 16]);
    let (gif_path, json_path) = outputs(directory.path());

    let original = frameinfo::extract(&input, &gif_path, &json_path).expect("extract");
    let copy = FrameProbe::probe(&gif_path).expect("probe output");

    assert_eq!(copy.n_frames, original.n_frames);
    assert_eq!(copy.frame_duration, original.frame_duration);
    assert_eq!(copy.size, original.size);
}

#[test]
fn sidecar_matches_returned_record() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("run.gif");
    write_gif(&input, &[10, 20]);
    let (gif_path, json_path) = outputs(directory.path());

    let metadata = frameinfo::extract(&input, &gif_path, &json_path).expect("extract");
    let loaded = FrameMetadata::load_json(&json_path).expect("load sidecar");

    assert_eq!(loaded.original_format, metadata.original_format);
    assert_eq!(loaded.size, metadata.size);
    assert_eq!(loaded.n_frames, metadata.n_frames);
    assert_eq!(loaded.frame_duration, metadata.frame_duration);
    assert_eq!(loaded.average_fps, metadata.average_fps);
}

#[test]
fn sidecar_key_order_and_size_array() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("run.gif");
    write_gif(&input, &[10, 10]);
    let (gif_path, json_path) = outputs(directory.path());

    frameinfo::extract(&input, &gif_path, &json_path).expect("extract");
    let text = std::fs::read_to_string(&json_path).expect("read sidecar");

    let keys = [
        "\"original_format\"",
        "\"output_format\"",
        "\"size\"",
        "\"n_frames\"",
        "\"frame_duration\"",
        "\"average_fps\"",
    ];
    let positions: Vec<usize> = keys
        .iter()
        .map(|key| text.find(key).unwrap_or_else(|| panic!("missing {key}")))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(text.starts_with("{\n    \"original_format\""));

    let value: serde_json::Value = serde_json::from_str(&text).expect("parse sidecar");
    assert_eq!(
        value["size"],
        serde_json::json!([u32::from(WIDTH), u32::from(HEIGHT)])
    );
    assert_eq!(value["average_fps"], serde_json::json!(10.0));
    assert_eq!(value.as_object().map(|object| object.len()), Some(6));
}

// ── Other animated formats ────────────────────────────────────────

#[test]
fn apng_frames_and_delays() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("run.png");
    write_apng(&input, &[50, 50, 50]);
    let (gif_path, json_path) = outputs(directory.path());

    let image = AnimatedImage::open(&input).expect("open");
    assert!(image.is_animated());

    let metadata = frameinfo::extract(&input, &gif_path, &json_path).expect("extract");
    assert_eq!(metadata.original_format, "PNG");
    assert_eq!(metadata.size, (u32::from(WIDTH), u32::from(HEIGHT)));
    assert_eq!(metadata.n_frames, 3);
    assert_eq!(metadata.frame_duration, vec![50, 50, 50]);
    assert_eq!(metadata.average_fps, 20.0);
    assert!(metadata.defaulted_frames.is_empty());

    let copy = FrameProbe::probe(&gif_path).expect("probe output");
    assert_eq!(copy.n_frames, 3);
    assert_eq!(copy.frame_duration, vec![50, 50, 50]);
}

#[test]
fn apng_mixed_delays() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("mixed.png");
    write_apng(&input, &[40, 80]);

    let metadata = FrameProbe::probe(&input).expect("probe");
    assert_eq!(metadata.frame_duration, vec![40, 80]);
    assert_eq!(metadata.average_fps, 16.67);
}

#[test]
fn animated_webp_frames_and_delays() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("run.webp");
    write_animated_webp(&input, &[30, 60, 90]);
    let (gif_path, json_path) = outputs(directory.path());

    let image = AnimatedImage::open(&input).expect("open");
    assert!(image.is_animated());
    assert_eq!(image.format_name(), "WEBP");

    let metadata = frameinfo::extract(&input, &gif_path, &json_path).expect("extract");
    assert_eq!(metadata.original_format, "WEBP");
    assert_eq!(metadata.size, (u32::from(WIDTH), u32::from(HEIGHT)));
    assert_eq!(metadata.n_frames, 3);
    assert_eq!(metadata.frame_duration, vec![30, 60, 90]);
    assert_eq!(metadata.average_fps, 16.67);

    let copy = FrameProbe::probe(&gif_path).expect("probe output");
    assert_eq!(copy.n_frames, 3);
    assert_eq!(copy.frame_duration, vec![30, 60, 90]);
}

// ── Fallback durations ────────────────────────────────────────────

#[test]
fn still_png_is_one_default_frame() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("still.png");
    write_png(&input, 5, 3);
    let (gif_path, json_path) = outputs(directory.path());

    let metadata = frameinfo::extract(&input, &gif_path, &json_path).expect("extract");

    assert_eq!(metadata.original_format, "PNG");
    assert_eq!(metadata.size, (5, 3));
    assert_eq!(metadata.n_frames, 1);
    assert_eq!(metadata.frame_duration, vec![100]);
    assert_eq!(metadata.average_fps, 10.0);
    assert_eq!(metadata.defaulted_frames, vec![0]);

    let copy = FrameProbe::probe(&gif_path).expect("probe output");
    assert_eq!(copy.n_frames, 1);
    assert_eq!(copy.frame_duration, vec![100]);
}

#[test]
fn zero_delay_frames_use_default() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("zero.gif");
    write_gif(&input, &[0, 5, 0]);

    let metadata = FrameProbe::probe(&input).expect("probe");
    assert_eq!(metadata.frame_duration, vec![100, 50, 100]);
    assert_eq!(metadata.defaulted_frames, vec![0, 2]);
}

#[test]
fn configured_default_duration() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("still.png");
    write_png(&input, 4, 4);
    let (gif_path, json_path) = outputs(directory.path());

    let options = ExtractOptions::new().with_default_frame_duration(Duration::from_millis(40));
    let metadata = FrameMetadataExtractor::new(options)
        .extract(&ExtractPaths::new(&input, &gif_path, &json_path))
        .expect("extract");

    assert_eq!(metadata.frame_duration, vec![40]);
    assert_eq!(metadata.average_fps, 25.0);
}

// ── GIF options ───────────────────────────────────────────────────

#[test]
fn finite_repeat_still_writes_every_frame() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("run.gif");
    write_gif(&input, &[3, 3, 3]);
    let (gif_path, json_path) = outputs(directory.path());

    let options = ExtractOptions::new().with_gif_options(GifOptions::new().repeat(Some(2)).speed(30));
    FrameMetadataExtractor::new(options)
        .extract(&ExtractPaths::new(&input, &gif_path, &json_path))
        .expect("extract");

    assert_eq!(FrameProbe::probe(&gif_path).expect("probe").n_frames, 3);
}

// ── Frame iteration ───────────────────────────────────────────────

#[test]
fn frame_iterator_ends_cleanly_and_restarts() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("run.gif");
    write_gif(&input, &[10, 20]);

    let image = AnimatedImage::open(&input).expect("open");
    assert!(image.is_animated());
    assert_eq!(image.format_name(), "GIF");

    let mut frames = image.frames().expect("frames");
    let first = frames.next_frame().expect("first frame").expect("decode");
    assert_eq!(first.index, 0);
    assert_eq!(first.delay_ms, Some(100));
    assert_eq!(first.image.dimensions(), image.dimensions());

    let second = frames.next_frame().expect("second frame").expect("decode");
    assert_eq!(second.delay_ms, Some(200));
    assert!(frames.next_frame().is_none());
    assert!(frames.next_frame().is_none());
    assert_eq!(frames.position(), 2);

    // A new pass starts again at frame 0.
    let restarted: Vec<_> = image
        .frames()
        .expect("frames")
        .map(|frame| frame.expect("decode").index)
        .collect();
    assert_eq!(restarted, vec![0, 1]);
}

#[test]
fn still_image_iterates_once() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("still.png");
    write_png(&input, 3, 2);

    let image = AnimatedImage::open(&input).expect("open");
    assert!(!image.is_animated());

    let frames: Vec<_> = image
        .frames()
        .expect("frames")
        .collect::<Result<_, _>>()
        .expect("decode");
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].delay_ms, None);
}

#[test]
fn derived_paths_write_next_to_each_other() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = directory.path().join("walk.gif");
    write_gif(&input, &[10]);
    let out_dir = directory.path().join("out");
    std::fs::create_dir(&out_dir).expect("create out dir");

    let paths = ExtractPaths::derived(&input, &out_dir);
    FrameMetadataExtractor::default()
        .extract(&paths)
        .expect("extract");

    assert!(out_dir.join("walk.gif").exists());
    assert!(out_dir.join("walk.json").exists());
}
