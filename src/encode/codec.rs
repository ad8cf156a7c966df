//! Codec trait and shared error type.
//!
//! The production implementation is
//! [`ImageCodec`](super::image_codec::ImageCodec) — pure Rust, statically
//! linked. The trait exists so the compression loop can be unit tested with a
//! mock that scripts output sizes instead of encoding pixels.

use super::params::EncodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// A re-encoder for one image file.
///
/// `Sync` because the compression loop fans a round out over files with
/// rayon.
pub trait Codec: Sync {
    /// Re-encode `params.source` into `params.output` at the given quality
    /// and return the output's size in bytes.
    fn encode(&self, params: &EncodeParams) -> Result<u64, CodecError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock codec that records operations and returns scripted byte sizes.
    ///
    /// Sizes are keyed by the source's file name (the loop repoints paths at
    /// the re-encoded copy between rounds, so the directory changes while the
    /// name stays stable). Each call pops the next size for that name; once a
    /// single size remains it sticks, so a never-shrinking file can be
    /// scripted with one entry.
    ///
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockCodec {
        sizes: Mutex<HashMap<String, Vec<u64>>>,
        pub operations: Mutex<Vec<RecordedEncode>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedEncode {
        pub source: String,
        pub output: String,
        pub kind: crate::encode::ImageKind,
        pub quality: f64,
    }

    impl MockCodec {
        pub fn with_sizes(entries: &[(&str, &[u64])]) -> Self {
            let sizes = entries
                .iter()
                .map(|(name, sizes)| (name.to_string(), sizes.to_vec()))
                .collect();
            Self {
                sizes: Mutex::new(sizes),
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn recorded(&self) -> Vec<RecordedEncode> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl Codec for MockCodec {
        fn encode(&self, params: &EncodeParams) -> Result<u64, CodecError> {
            self.operations.lock().unwrap().push(RecordedEncode {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                kind: params.kind,
                quality: params.quality.value(),
            });

            let name = params
                .source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let mut sizes = self.sizes.lock().unwrap();
            let queue = sizes
                .get_mut(&name)
                .ok_or_else(|| CodecError::Encode(format!("no scripted size for {name}")))?;
            let size = match queue.len() {
                0 => return Err(CodecError::Encode(format!("sizes exhausted for {name}"))),
                1 => queue[0],
                _ => queue.remove(0),
            };
            Ok(size)
        }
    }

    #[test]
    fn mock_pops_sizes_then_sticks() {
        use crate::encode::{ImageKind, Quality};
        let codec = MockCodec::with_sizes(&[("a.jpg", &[300, 200, 100])]);
        let params = EncodeParams {
            source: "/x/a.jpg".into(),
            output: "/x/optimized/a.jpg".into(),
            kind: ImageKind::RasterLossy,
            quality: Quality::new(90.0),
        };
        let sizes: Vec<u64> = (0..5).map(|_| codec.encode(&params).unwrap()).collect();
        assert_eq!(sizes, vec![300, 200, 100, 100, 100]);
        assert_eq!(codec.recorded().len(), 5);
    }
}
