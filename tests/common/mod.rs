//! Fixture builders shared by the integration tests.
//!
//! Fixtures are synthesised into temporary directories with the `gif`, `png`
//! and `image` encoders, so the tests need no checked-in media.

#![allow(dead_code)]

use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

use gif::{Encoder, Frame, Repeat};
use image::{ImageFormat, Rgba, RgbaImage};

pub const WIDTH: u16 = 8;
pub const HEIGHT: u16 = 6;

/// Write an animated GIF with one frame per entry of `delays_cs`
/// (centiseconds). Each frame gets a distinct solid colour.
pub fn write_gif(path: &Path, delays_cs: &[u16]) {
    let file = File::create(path).expect("create fixture gif");
    let mut encoder = Encoder::new(file, WIDTH, HEIGHT, &[]).expect("gif encoder");
    encoder.set_repeat(Repeat::Infinite).expect("gif repeat");

    for (index, &delay) in delays_cs.iter().enumerate() {
        let mut pixels = solid_frame(index).into_raw();
        let mut frame = Frame::from_rgba_speed(WIDTH, HEIGHT, &mut pixels, 10);
        frame.delay = delay;
        encoder.write_frame(&frame).expect("write fixture frame");
    }
}

/// Solid canvas for frame `index`, distinct per frame.
fn solid_frame(index: usize) -> RgbaImage {
    let shade = (index * 37 % 256) as u8;
    RgbaImage::from_pixel(
        u32::from(WIDTH),
        u32::from(HEIGHT),
        Rgba([shade, 255 - shade, 128, 255]),
    )
}

/// Write an APNG with one frame per entry of `delays_ms`.
pub fn write_apng(path: &Path, delays_ms: &[u16]) {
    let file = BufWriter::new(File::create(path).expect("create fixture apng"));
    let mut encoder = png::Encoder::new(file, u32::from(WIDTH), u32::from(HEIGHT));
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder
        .set_animated(delays_ms.len() as u32, 0)
        .expect("apng frame count");

    let mut writer = encoder.write_header().expect("apng header");
    for (index, &delay) in delays_ms.iter().enumerate() {
        writer.set_frame_delay(delay, 1000).expect("apng delay");
        writer
            .write_image_data(solid_frame(index).as_raw())
            .expect("write apng frame");
    }
    writer.finish().expect("finish apng");
}

/// Write an animated WebP with one lossless frame per entry of `delays_ms`.
///
/// Each frame is encoded as a still lossless WebP, and its `VP8L` chunk is
/// wrapped in an `ANMF` chunk of an extended (`VP8X` + `ANIM`) container.
pub fn write_animated_webp(path: &Path, delays_ms: &[u32]) {
    let (width, height) = (u32::from(WIDTH), u32::from(HEIGHT));

    let mut body = Vec::new();
    body.extend_from_slice(b"WEBP");

    let mut vp8x = vec![0x02 | 0x10, 0, 0, 0];
    push_u24(&mut vp8x, width - 1);
    push_u24(&mut vp8x, height - 1);
    push_chunk(&mut body, b"VP8X", &vp8x);

    // Background colour, then loop forever.
    push_chunk(&mut body, b"ANIM", &[0, 0, 0, 0, 0, 0]);

    for (index, &delay) in delays_ms.iter().enumerate() {
        let mut still = Vec::new();
        solid_frame(index)
            .write_to(&mut Cursor::new(&mut still), ImageFormat::WebP)
            .expect("encode webp frame");

        let mut anmf = Vec::new();
        push_u24(&mut anmf, 0);
        push_u24(&mut anmf, 0);
        push_u24(&mut anmf, width - 1);
        push_u24(&mut anmf, height - 1);
        push_u24(&mut anmf, delay);
        // No blending, no disposal.
        anmf.push(0b10);
        anmf.extend_from_slice(riff_chunk(&still, b"VP8L"));
        push_chunk(&mut body, b"ANMF", &anmf);
    }

    let mut file = Vec::new();
    file.extend_from_slice(b"RIFF");
    file.extend_from_slice(&(body.len() as u32).to_le_bytes());
    file.extend_from_slice(&body);
    std::fs::write(path, file).expect("write fixture webp");
}

fn push_u24(buffer: &mut Vec<u8>, value: u32) {
    buffer.extend_from_slice(&value.to_le_bytes()[..3]);
}

fn push_chunk(buffer: &mut Vec<u8>, fourcc: &[u8; 4], payload: &[u8]) {
    buffer.extend_from_slice(fourcc);
    buffer.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buffer.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        buffer.push(0);
    }
}

/// The full chunk (header, payload, padding) named `fourcc` in a RIFF file.
fn riff_chunk<'a>(file: &'a [u8], fourcc: &[u8; 4]) -> &'a [u8] {
    let mut offset = 12;
    while offset + 8 <= file.len() {
        let size = u32::from_le_bytes(file[offset + 4..offset + 8].try_into().unwrap()) as usize;
        let end = (offset + 8 + size + size % 2).min(file.len());
        if &file[offset..offset + 4] == fourcc {
            return &file[offset..end];
        }
        offset = end;
    }
    panic!("fixture webp has no {} chunk", String::from_utf8_lossy(fourcc));
}

/// Write a still PNG.
pub fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]))
        .save(path)
        .expect("write fixture png");
}

/// Output paths inside `directory`.
pub fn outputs(directory: &Path) -> (PathBuf, PathBuf) {
    (directory.join("out.gif"), directory.join("out.json"))
}
