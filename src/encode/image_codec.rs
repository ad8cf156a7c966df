//! Pure Rust codec — zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the round's quality |
//! | Encode → PNG | `color_quant::NeuQuant` palette + `png` indexed writer |
//!
//! The PNG path goes through the `png` crate directly: the quantized output
//! is indexed-color with an optional tRNS chunk, which the high-level `image`
//! encoder cannot produce. Only critical chunks are written, so any metadata
//! carried by the source is dropped.

use super::codec::{Codec, CodecError};
use super::params::{EncodeParams, ImageKind, Quality};
use image::{DynamicImage, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// NeuQuant sampling factor: 1 is exhaustive, 30 is fastest. 10 keeps the
/// palette stable across rounds without dominating the round's runtime.
const SAMPLE_FACTOR: i32 = 10;

/// Codec backed by the `image` crate ecosystem.
pub struct ImageCodec;

impl ImageCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn load_image(path: &Path) -> Result<DynamicImage, CodecError> {
    ImageReader::open(path)
        .map_err(CodecError::Io)?
        .decode()
        .map_err(|e| CodecError::Encode(format!("Failed to decode {}: {}", path.display(), e)))
}

/// Re-encode as JPEG at the given quality.
fn encode_jpeg(img: &DynamicImage, output: &Path, quality: Quality) -> Result<(), CodecError> {
    let file = File::create(output).map_err(CodecError::Io)?;
    let writer = BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.jpeg());
    // JPEG has no alpha channel; captures arrive as RGB or RGBA depending on
    // the source encoder, so flatten unconditionally.
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(format!("JPEG encode failed: {}", e)))
}

/// Quantize to a palette sized by the quality fraction and write an
/// indexed-color PNG with no ancillary chunks.
fn encode_quantized_png(
    img: &DynamicImage,
    output: &Path,
    quality: Quality,
) -> Result<(), CodecError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let quantizer = color_quant::NeuQuant::new(SAMPLE_FACTOR, quality.palette_colors(), &rgba);
    let indices: Vec<u8> = rgba
        .chunks_exact(4)
        .map(|pixel| quantizer.index_of(pixel) as u8)
        .collect();

    let map = quantizer.color_map_rgba();
    let mut palette = Vec::with_capacity(map.len() / 4 * 3);
    let mut trns = Vec::with_capacity(map.len() / 4);
    for entry in map.chunks_exact(4) {
        palette.extend_from_slice(&entry[..3]);
        trns.push(entry[3]);
    }

    let file = File::create(output).map_err(CodecError::Io)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Best);
    encoder.set_palette(palette);
    if trns.iter().any(|&a| a != u8::MAX) {
        encoder.set_trns(trns);
    }
    let mut writer = encoder
        .write_header()
        .map_err(|e| CodecError::Encode(format!("PNG encode failed: {}", e)))?;
    writer
        .write_image_data(&indices)
        .map_err(|e| CodecError::Encode(format!("PNG encode failed: {}", e)))?;
    writer
        .finish()
        .map_err(|e| CodecError::Encode(format!("PNG encode failed: {}", e)))
}

impl Codec for ImageCodec {
    fn encode(&self, params: &EncodeParams) -> Result<u64, CodecError> {
        let img = load_image(&params.source)?;
        match params.kind {
            ImageKind::RasterLossy => encode_jpeg(&img, &params.output, params.quality)?,
            ImageKind::RasterLossless => {
                encode_quantized_png(&img, &params.output, params.quality)?
            }
        }
        Ok(std::fs::metadata(&params.output).map_err(CodecError::Io)?.len())
    }
}
