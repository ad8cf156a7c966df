//! Parameter types for encode operations.
//!
//! These structs describe *what* to encode, not *how*. They are the interface
//! between the compression loop (which decides what to re-encode each round)
//! and the [`Codec`](super::codec::Codec) (which does the pixel work), so the
//! loop can be tested against a mock codec.

use std::path::PathBuf;

/// Lossy-encode quality, a real number clamped to [0, 100].
///
/// The compression loop decays this geometrically across rounds, so it has to
/// stay fractional: rounding to integers would stall the search once the
/// decay steps shrink below 0.5.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality(f64);

impl Quality {
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 100.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Quality for the JPEG encoder, which takes an integer in 1-100.
    pub fn jpeg(self) -> u8 {
        (self.0.round() as u8).clamp(1, 100)
    }

    /// Palette budget for the PNG quantizer: 64 colors at quality 0 up to
    /// the full 256 at quality 100, shrinking as the loop decays quality.
    pub fn palette_colors(self) -> usize {
        let fraction = self.0 / 100.0;
        (64.0 + 192.0 * fraction).round() as usize
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(100.0)
    }
}

/// Which raster family a captured file belongs to, derived from its
/// output extension at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// JPEG, re-encoded with a perceptual quality parameter.
    RasterLossy,
    /// PNG, re-encoded through palette quantization.
    RasterLossless,
}

impl ImageKind {
    pub fn from_path(path: &std::path::Path) -> Self {
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png {
            ImageKind::RasterLossless
        } else {
            ImageKind::RasterLossy
        }
    }
}

/// Full specification for one re-encode pass over one file.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub kind: ImageKind,
    pub quality: Quality,
}
