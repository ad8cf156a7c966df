//! Image re-encoding — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **JPEG re-encode** | `image::codecs::jpeg::JpegEncoder` |
//! | **PNG quantize** | `color_quant::NeuQuant` + `png` indexed writer |
//!
//! The module is split into:
//! - **Parameters**: data structures describing one encode pass
//! - **Codec**: the [`Codec`] trait (mockable seam for the compression loop)
//! - **ImageCodec**: the production implementation

pub mod codec;
pub mod image_codec;
mod params;

pub use codec::{Codec, CodecError};
pub use image_codec::ImageCodec;
pub use params::{EncodeParams, ImageKind, Quality};
