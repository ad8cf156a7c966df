//! Adaptive re-compression of captured screenshots.
//!
//! This is the heart of snapback: a feedback-controlled search over a single
//! scalar — encode quality — that runs the whole batch toward a byte-size
//! target.
//!
//! ## Algorithm
//!
//! ```text
//! pending := all captured files
//! quality := starting quality
//! repeat up to MAX_TRIES rounds while pending is non-empty:
//!     re-encode every pending file at `quality` into optimized/
//!     drop files whose output now fits the target
//!     quality *= 0.95
//! ```
//!
//! Quality decays geometrically every round whether or not any file passed,
//! so the loop always terminates and quality is strictly decreasing. Files
//! still oversized after [`MAX_TRIES`] rounds are reported as a shortfall —
//! a warning, not an error; sibling files are unaffected.
//!
//! ## Compounding
//!
//! From round two onward the loop re-encodes the *previous round's output*,
//! not the pristine capture: once a file misses the target, its pending path
//! is repointed at the copy in `optimized/`. Quality loss therefore compounds
//! across rounds. This matches the legacy behavior this tool replaces; the
//! alternative (re-encoding the original at each trial quality) converges
//! identically but was rejected for compatibility.

use crate::capture::CaptureResult;
use crate::config::{Config, ConfigError};
use crate::encode::{Codec, CodecError, EncodeParams, ImageCodec, ImageKind, Quality};
use crate::output;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Hard ceiling on compression rounds.
pub const MAX_TRIES: u32 = 40;

/// Multiplicative per-round quality decay.
pub const QUALITY_DECAY: f64 = 0.95;

/// Name of the output folder, created inside the first capture's directory.
pub const DESTINATION: &str = "optimized";

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("capture path has no file name: {0}")]
    NoFileName(PathBuf),
}

/// One batch entry still above the target size.
#[derive(Debug, Clone, PartialEq)]
struct PendingFile {
    path: PathBuf,
    kind: ImageKind,
}

/// What the loop produced.
#[derive(Debug, Default)]
pub struct CompressOutcome {
    /// Files that reached the target, in the round order they passed.
    pub completed: Vec<PathBuf>,
    /// Files still oversized when the round ceiling was hit.
    pub shortfall: Vec<PathBuf>,
    /// Rounds actually run.
    pub rounds: u32,
}

/// Compress a captured batch with the production codec.
pub fn optimize(files: &[CaptureResult], config: &Config) -> Result<CompressOutcome, CompressError> {
    optimize_with_codec(&ImageCodec::new(), files, config)
}

/// Compress a captured batch using a specific codec (allows testing with a mock).
pub fn optimize_with_codec(
    codec: &impl Codec,
    files: &[CaptureResult],
    config: &Config,
) -> Result<CompressOutcome, CompressError> {
    // Re-checked here so the loop is safe to call on its own; must fail
    // before anything is written.
    config.validate()?;

    let Some(first) = files.first() else {
        return Ok(CompressOutcome::default());
    };
    let destination = first
        .path
        .parent()
        .ok_or_else(|| CompressError::NoFileName(first.path.clone()))?
        .join(DESTINATION);
    fs::create_dir_all(&destination)?;

    let mut pending: Vec<PendingFile> = files
        .iter()
        .map(|r| PendingFile {
            path: r.path.clone(),
            kind: r.kind,
        })
        .collect();
    let mut quality = Quality::new(config.quality);
    let mut completed = Vec::new();
    let mut rounds = 0;

    while rounds < MAX_TRIES && !pending.is_empty() {
        rounds += 1;
        output::print_round(rounds, pending.len(), quality.value());

        // No cross-file dependency within a round, so fan out.
        let encoded = pending
            .par_iter()
            .map(|file| {
                let name = file
                    .path
                    .file_name()
                    .ok_or_else(|| CompressError::NoFileName(file.path.clone()))?;
                let output_path = destination.join(name);
                let size = codec.encode(&EncodeParams {
                    source: file.path.clone(),
                    output: output_path.clone(),
                    kind: file.kind,
                    quality,
                })?;
                Ok((
                    PendingFile {
                        path: output_path,
                        kind: file.kind,
                    },
                    size,
                ))
            })
            .collect::<Result<Vec<_>, CompressError>>()?;

        // Oversized files stay pending, now pointing at the re-encoded copy.
        pending = encoded
            .into_iter()
            .filter_map(|(file, size)| {
                if size > config.target_bytes {
                    Some(file)
                } else {
                    completed.push(file.path);
                    None
                }
            })
            .collect();

        quality = Quality::new(quality.value() * QUALITY_DECAY);
    }

    if !pending.is_empty() {
        output::print_shortfall(pending.len(), config.target_bytes);
    }

    Ok(CompressOutcome {
        completed,
        shortfall: pending.into_iter().map(|f| f.path).collect(),
        rounds,
    })
}
