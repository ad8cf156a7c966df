//! Run configuration.
//!
//! A [`Config`] is built once from the CLI flags, validated, and then passed
//! by reference into every stage. Nothing mutates it after construction —
//! there are no process-wide settings.
//!
//! Validation runs before any other work: an invalid target size or quality
//! must abort the run before a server is bound or a browser is launched,
//! with nothing written to disk.

use crate::template;
use thiserror::Error;

/// Floor for the target file size. A target at or below this is unreachable
/// for any non-trivial screenshot and indicates a mistyped flag.
pub const MIN_FILESIZE: u64 = 5120;

/// Fixed logical viewport for every capture, established once per batch.
pub const VIEWPORT: (u32, u32) = (1920, 1080);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("target size impossibly small: {0} bytes (must exceed {MIN_FILESIZE})")]
    TargetTooSmall(u64),
    #[error("invalid quality: {0} (must be within 0-100)")]
    InvalidQuality(f64),
    #[error("unknown placeholder '{{{0}}}' in output template")]
    UnknownPlaceholder(String),
    #[error("unclosed '{{' in output template: {0}")]
    UnclosedPlaceholder(String),
}

/// Immutable settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base name of the HTML file to search for under the root.
    pub index_name: String,
    /// CSS selector of the element to capture.
    pub selector: String,
    /// Output filename template, resolved relative to each index file's
    /// directory. See [`template`] for the recognized placeholders.
    pub output_template: String,
    /// Settle delay between navigation and capture, in seconds.
    pub wait_secs: f64,
    /// Device pixel scale factor applied at session launch.
    pub scale: f64,
    /// Upper bound every compressed output must not exceed, in bytes.
    pub target_bytes: u64,
    /// Starting encode quality for the compression loop, 0-100.
    pub quality: f64,
    /// Port for the transient HTTP server that serves the root directory.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_name: "index.html".to_string(),
            selector: "#container".to_string(),
            output_template: "../backup_{folder}.jpg".to_string(),
            wait_secs: 0.1,
            scale: 1.0,
            target_bytes: 40 * 1024,
            quality: 100.0,
            port: 9181,
        }
    }
}

impl Config {
    /// Check the run invariants. Pure: no side effects on failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_bytes <= MIN_FILESIZE {
            return Err(ConfigError::TargetTooSmall(self.target_bytes));
        }
        if !(0.0..=100.0).contains(&self.quality) {
            return Err(ConfigError::InvalidQuality(self.quality));
        }
        template::validate(&self.output_template)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn target_below_floor_rejected() {
        // --targetsize 1 → 1024 bytes, well under the floor
        let config = Config {
            target_bytes: 1024,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TargetTooSmall(1024))
        ));
    }

    #[test]
    fn target_exactly_at_floor_rejected() {
        let config = Config {
            target_bytes: MIN_FILESIZE,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn quality_above_range_rejected() {
        let config = Config {
            quality: 150.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidQuality(q)) if q == 150.0
        ));
    }

    #[test]
    fn quality_below_range_rejected() {
        let config = Config {
            quality: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn quality_bounds_are_inclusive() {
        for q in [0.0, 100.0] {
            let config = Config {
                quality: q,
                ..Default::default()
            };
            config.validate().unwrap();
        }
    }

    #[test]
    fn bad_template_rejected() {
        let config = Config {
            output_template: "shot_{album}.jpg".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownPlaceholder(name)) if name == "album"
        ));
    }
}
