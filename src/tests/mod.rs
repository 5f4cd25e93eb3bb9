use alloc::vec;
use alloc::vec::Vec;
use std::io;

use jpeg_decoder::{Decoder, ImageInfo, PixelFormat};
use rgb::RGB8;

use crate::image_buffer::rgb_to_ycbcr;
use crate::{
    ColorType, Density, Encoder, EncodingError, FlushPadding, HuffmanTable, QuantizationTableType,
    RgbPixels, SamplingFactor,
};

fn create_test_img_rgb() -> (Vec<u8>, u16, u16) {
    let width = 258;
    let height = 128;

    let mut data = Vec::with_capacity(width * height * 3);

    for y in 0..height {
        for x in 0..width {
            let x = x.min(255);
            data.push(x as u8);
            data.push((y * 2) as u8);
            data.push(((x + y * 2) / 2) as u8);
        }
    }

    (data, width as u16, height as u16)
}

fn create_test_img_gray() -> (Vec<u8>, u16, u16) {
    let width = 258;
    let height = 128;

    let mut data = Vec::with_capacity(width * height);

    for y in 0..height {
        for x in 0..width {
            let x = x.min(255);
            data.push(((x + y * 2) / 2) as u8);
        }
    }

    (data, width as u16, height as u16)
}

fn with_alpha(data: &[u8], bgr: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 3 * 4);
    for pixel in data.chunks_exact(3) {
        if bgr {
            out.extend_from_slice(&[pixel[2], pixel[1], pixel[0], 255]);
        } else {
            out.extend_from_slice(&[pixel[0], pixel[1], pixel[2], 255]);
        }
    }
    out
}

fn decode(result: &[u8]) -> (Vec<u8>, ImageInfo) {
    let mut decoder = Decoder::new(result);
    let pixels = decoder.decode().expect("Could not decode");
    let info = decoder.info().unwrap();
    (pixels, info)
}

fn check_result(
    data: &[u8],
    width: u16,
    height: u16,
    result: &[u8],
    pixel_format: PixelFormat,
    tolerance: i16,
) {
    let (pixels, info) = decode(result);

    assert_eq!(pixel_format, info.pixel_format);
    assert_eq!(width, info.width);
    assert_eq!(height, info.height);
    assert_eq!(pixels.len(), data.len());

    for (i, (&v1, &v2)) in data.iter().zip(pixels.iter()).enumerate() {
        let diff = (v1 as i16 - v2 as i16).abs();
        assert!(
            diff < tolerance,
            "Large color diff at index: {}: {} vs {}",
            i,
            v1,
            v2
        );
    }
}

/// Segments between SOI and SOS as `(marker, payload)`
fn header_segments(jpeg: &[u8]) -> Vec<(u8, Vec<u8>)> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let mut segments = Vec::new();
    let mut pos = 2;

    loop {
        assert_eq!(jpeg[pos], 0xFF);
        let marker = jpeg[pos + 1];
        let length = usize::from(u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]));
        segments.push((marker, jpeg[pos + 4..pos + 2 + length].to_vec()));
        pos += 2 + length;

        if marker == 0xDA {
            return segments;
        }
    }
}

#[test]
fn test_gray_100() {
    let (data, width, height) = create_test_img_gray();

    let mut result = Vec::new();
    let encoder = Encoder::new(&mut result, 100);
    encoder
        .encode(&data, width, height, ColorType::Luma)
        .unwrap();

    check_result(&data, width, height, &result, PixelFormat::L8, 5);
}

#[test]
fn test_gray_odd_dimensions() {
    let width = 61;
    let height = 37;
    let data: Vec<u8> = (0..width * height)
        .map(|i| ((i % width) * 3 + (i / width) * 2) as u8)
        .collect();

    let mut result = Vec::new();
    let encoder = Encoder::new(&mut result, 90);
    encoder
        .encode(&data, width as u16, height as u16, ColorType::Luma)
        .unwrap();

    check_result(
        &data,
        width as u16,
        height as u16,
        &result,
        PixelFormat::L8,
        20,
    );
}

#[test]
fn test_rgb_sampling_factors() {
    let (data, width, height) = create_test_img_rgb();

    for sampling in [
        SamplingFactor::R_4_4_4,
        SamplingFactor::R_4_2_2,
        SamplingFactor::R_4_4_0,
        SamplingFactor::R_4_2_0,
    ] {
        let mut result = Vec::new();
        let mut encoder = Encoder::new(&mut result, 90);
        encoder.set_sampling_factor(sampling);
        encoder.encode(&data, width, height, ColorType::Rgb).unwrap();

        check_result(&data, width, height, &result, PixelFormat::RGB24, 20);
    }
}

#[test]
fn test_rgb_odd_dimensions_subsampled() {
    let width = 45u16;
    let height = 23u16;
    let mut data = Vec::new();
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 5) as u8, (y * 10) as u8, 128]);
        }
    }

    let mut result = Vec::new();
    let mut encoder = Encoder::new(&mut result, 95);
    encoder.set_sampling_factor(SamplingFactor::R_4_2_0);
    encoder.encode(&data, width, height, ColorType::Rgb).unwrap();

    check_result(&data, width, height, &result, PixelFormat::RGB24, 20);
}

#[test]
fn test_pixel_layouts_match_rgb() {
    let (data, width, height) = create_test_img_rgb();

    let encode = |data: &[u8], color_type: ColorType| {
        let mut result = Vec::new();
        Encoder::new(&mut result, 80)
            .encode(data, width, height, color_type)
            .unwrap();
        result
    };

    let rgb = encode(&data, ColorType::Rgb);

    let bgr: Vec<u8> = data
        .chunks_exact(3)
        .flat_map(|p| [p[2], p[1], p[0]])
        .collect();

    assert_eq!(encode(&bgr, ColorType::Bgr), rgb);
    assert_eq!(encode(&with_alpha(&data, false), ColorType::Rgba), rgb);
    assert_eq!(encode(&with_alpha(&data, true), ColorType::Bgra), rgb);

    let pixels: Vec<RGB8> = data
        .chunks_exact(3)
        .map(|p| RGB8::new(p[0], p[1], p[2]))
        .collect();

    let mut result = Vec::new();
    Encoder::new(&mut result, 80)
        .encode_image(RgbPixels(&pixels, width, height))
        .unwrap();
    assert_eq!(result, rgb);
}

#[test]
fn test_ycbcr_input() {
    let (data, width, height) = create_test_img_rgb();

    let ycbcr: Vec<u8> = data
        .chunks_exact(3)
        .flat_map(|p| {
            let (y, cb, cr) = rgb_to_ycbcr(p[0], p[1], p[2]);
            [y, cb, cr]
        })
        .collect();

    let mut result = Vec::new();
    let encoder = Encoder::new(&mut result, 100);
    encoder
        .encode(&ycbcr, width, height, ColorType::Ycbcr)
        .unwrap();

    check_result(&data, width, height, &result, PixelFormat::RGB24, 8);
}

#[test]
fn test_deterministic_output() {
    let (data, width, height) = create_test_img_rgb();

    let mut first = Vec::new();
    Encoder::new(&mut first, 75)
        .encode(&data, width, height, ColorType::Rgb)
        .unwrap();

    let mut second = Vec::new();
    Encoder::new(&mut second, 75)
        .encode(&data, width, height, ColorType::Rgb)
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_single_flat_block() {
    let mut result = Vec::new();
    Encoder::new(&mut result, 75)
        .encode(&[128; 64], 8, 8, ColorType::Luma)
        .unwrap();

    // DC category 0, EOB, zero padded
    assert_eq!(&result[result.len() - 3..], &[0b0010_1000, 0xFF, 0xD9]);

    let mut result = Vec::new();
    let mut encoder = Encoder::new(&mut result, 75);
    encoder.set_flush_padding(FlushPadding::Ones);
    encoder.encode(&[128; 64], 8, 8, ColorType::Luma).unwrap();

    assert_eq!(&result[result.len() - 3..], &[0b0010_1011, 0xFF, 0xD9]);
    let (pixels, _) = decode(&result);
    assert!(pixels.iter().all(|&p| p == 128));
}

#[test]
fn test_header_layout() {
    let (data, width, height) = create_test_img_rgb();

    let mut result = Vec::new();
    let mut encoder = Encoder::new(&mut result, 50);
    encoder.set_density(Density::Centimeter { x: 20, y: 30 });
    encoder.add_app_segment(1, b"Exif\0\0").unwrap();
    encoder.add_comment(b"block encoder").unwrap();
    encoder.encode(&data, width, height, ColorType::Rgb).unwrap();

    let segments = header_segments(&result);
    let markers: Vec<u8> = segments.iter().map(|(m, _)| *m).collect();
    assert_eq!(
        markers,
        vec![0xE0, 0xE1, 0xFE, 0xDB, 0xC0, 0xC4, 0xC4, 0xC4, 0xC4, 0xDA]
    );

    let jfif = &segments[0].1;
    assert_eq!(&jfif[..5], b"JFIF\0");
    assert_eq!(&jfif[7..12], &[2, 0, 20, 0, 30]);

    assert_eq!(segments[1].1, b"Exif\0\0".to_vec());
    assert_eq!(segments[2].1, b"block encoder".to_vec());

    // Quality 50 keeps the Annex K tables, written in zigzag order
    let dqt = &segments[3].1;
    assert_eq!(dqt.len(), 2 * 65);
    assert_eq!(&dqt[..4], &[0, 16, 11, 12]);
    assert_eq!(&dqt[65..69], &[1, 17, 18, 18]);

    let sof = &segments[4].1;
    assert_eq!(
        sof,
        &vec![8, 0, 128, 1, 2, 3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]
    );

    let dht_ids: Vec<u8> = segments[5..9].iter().map(|(_, d)| d[0]).collect();
    assert_eq!(dht_ids, vec![0x00, 0x10, 0x01, 0x11]);
    assert_eq!(&segments[5].1[1..17], HuffmanTable::default_luma_dc().spec().bits());

    let sos = &segments[9].1;
    assert_eq!(sos, &vec![3, 1, 0x00, 2, 0x11, 3, 0x11, 0, 63, 0]);

    decode(&result);
}

#[test]
fn test_gray_header_uses_luma_tables_only() {
    let (data, width, height) = create_test_img_gray();

    let mut result = Vec::new();
    Encoder::new(&mut result, 75)
        .encode(&data, width, height, ColorType::Luma)
        .unwrap();

    let segments = header_segments(&result);
    let markers: Vec<u8> = segments.iter().map(|(m, _)| *m).collect();
    assert_eq!(markers, vec![0xE0, 0xDB, 0xC0, 0xC4, 0xC4, 0xDA]);
    assert_eq!(segments[1].1.len(), 65);
}

#[test]
fn test_extended_sequential_frame() {
    let (data, width, height) = create_test_img_gray();

    let mut result = Vec::new();
    let mut encoder = Encoder::new(&mut result, 1);
    encoder.set_force_baseline(false);
    encoder
        .encode(&data, width, height, ColorType::Luma)
        .unwrap();

    let segments = header_segments(&result);
    let markers: Vec<u8> = segments.iter().map(|(m, _)| *m).collect();
    assert_eq!(markers, vec![0xE0, 0xDB, 0xC1, 0xC4, 0xC4, 0xDA]);

    // 16 bit precision table
    let dqt = &segments[1].1;
    assert_eq!(dqt.len(), 129);
    assert_eq!(dqt[0], 0x10);

    let (_, info) = decode(&result);
    assert_eq!(info.width, width);
    assert_eq!(info.height, height);
}

#[test]
fn test_custom_tables() {
    let (data, width, height) = create_test_img_rgb();

    let mut result = Vec::new();
    let mut encoder = Encoder::new(&mut result, 90);
    encoder.set_quantization_tables(
        QuantizationTableType::Flat,
        QuantizationTableType::Custom(vec![4; 64]),
    );
    encoder.set_huffman_tables(
        (
            HuffmanTable::default_chroma_dc(),
            HuffmanTable::default_chroma_ac(),
        ),
        (
            HuffmanTable::default_luma_dc(),
            HuffmanTable::default_luma_ac(),
        ),
    );
    encoder.encode(&data, width, height, ColorType::Rgb).unwrap();

    check_result(&data, width, height, &result, PixelFormat::RGB24, 20);
}

#[test]
fn test_invalid_custom_table() {
    let mut encoder = Encoder::new(Vec::new(), 90);
    encoder.set_quantization_tables(
        QuantizationTableType::Default,
        QuantizationTableType::Custom(vec![4; 10]),
    );

    let result = encoder.encode(&[0; 8 * 8 * 3], 8, 8, ColorType::Rgb);
    assert!(matches!(
        result,
        Err(EncodingError::InvalidQuantizationTable { length: 10 })
    ));
}

struct FailingWriter;

impl io::Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_error_propagates() {
    let encoder = Encoder::new(FailingWriter, 90);
    let result = encoder.encode(&[0; 64], 8, 8, ColorType::Luma);

    match result {
        Err(EncodingError::IoError(err)) => assert_eq!(err.kind(), io::ErrorKind::Other),
        other => panic!("Unexpected result: {:?}", other.err()),
    }
}
