//! Batch capture orchestration.
//!
//! Walks the discovered targets in order and drives the renderer once per
//! target, strictly sequentially — the browser session is shared state, so
//! there is never a second navigation in flight. Output paths come from the
//! filename template, resolved against each target's directory; missing
//! parent directories are created before the renderer writes.
//!
//! A failed capture aborts the remaining batch: one bad page is treated as a
//! broken tree, not a skippable entry. (Resource cleanup is the driver's
//! concern — the server and session guards drop on the error path.)

use crate::browser::{RenderError, Renderer};
use crate::config::Config;
use crate::discover::CaptureTarget;
use crate::encode::ImageKind;
use crate::{output, template};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// One produced screenshot, handed to the compression stage.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    pub path: PathBuf,
    pub kind: ImageKind,
}

/// Capture every target in order, printing one progress line per capture.
pub fn capture_all(
    renderer: &impl Renderer,
    targets: &[CaptureTarget],
    config: &Config,
) -> Result<Vec<CaptureResult>, CaptureError> {
    let mut results = Vec::with_capacity(targets.len());
    for (i, target) in targets.iter().enumerate() {
        let folder = folder_name(target);
        let rendered = template::render(&config.output_template, &folder, config);
        let output_path = target.dir.join(&rendered);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let path = renderer.capture(&target.url, &config.selector, &output_path)?;
        output::print_capture(i + 1, targets.len(), &folder, &path);
        results.push(CaptureResult {
            kind: ImageKind::from_path(&path),
            path,
        });
    }
    Ok(results)
}

/// Base name of the target's directory, used for `{folder}` substitution.
fn folder_name(target: &CaptureTarget) -> String {
    target
        .dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string())
}
