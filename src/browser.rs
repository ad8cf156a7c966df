//! Headless-browser session and element capture.
//!
//! One Chrome process and one tab serve the entire batch. Session-wide state
//! — viewport, device scale factor, cache disablement — is fixed at launch
//! and never touched again; per-capture work is navigate, settle, measure,
//! shoot. Captures are strictly sequential against the shared tab.

use crate::config::{Config, VIEWPORT};
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),
    #[error("Navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },
    #[error("Element not found for selector '{selector}': {reason}")]
    ElementNotFound { selector: String, reason: String },
    #[error("Failed to measure element: {0}")]
    Measure(String),
    #[error("Screenshot failed: {0}")]
    Screenshot(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can render a page and save one element as an image.
///
/// The batch loop is written against this trait so it can be tested without
/// a Chrome binary; [`RenderSession`] is the production implementation.
pub trait Renderer {
    fn capture(&self, url: &str, selector: &str, output: &Path) -> Result<PathBuf, RenderError>;
}

/// A live headless-Chrome session holding one reusable tab.
pub struct RenderSession {
    /// Keeps the Chrome child process alive for the batch; killed on drop.
    _browser: Browser,
    tab: Arc<Tab>,
    wait: Duration,
}

impl RenderSession {
    /// Launch Chrome with the batch-wide session state baked in: fixed
    /// 1920×1080 viewport, the configured device scale factor, and the
    /// response cache disabled for the whole session.
    pub fn new(config: &Config) -> Result<Self, RenderError> {
        let scale_flag = format!("--force-device-scale-factor={}", config.scale);
        let browser = Browser::new(LaunchOptions {
            headless: true,
            window_size: Some(VIEWPORT),
            args: vec![OsStr::new(&scale_flag), OsStr::new("--disk-cache-size=0")],
            ..Default::default()
        })
        .map_err(|e| RenderError::Launch(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            tab,
            wait: Duration::from_secs_f64(config.wait_secs.max(0.0)),
        })
    }

    /// Bounding rect of the first element matching `selector`, in CSS pixels.
    fn measure(&self, selector: &str) -> Result<Page::Viewport, RenderError> {
        // Selector goes in as a JS string literal; JSON string escaping is
        // exactly JS string escaping here.
        let literal = serde_json::to_string(selector)
            .map_err(|e| RenderError::Measure(e.to_string()))?;
        let script = format!(
            r#"(function() {{
                const el = document.querySelector({literal});
                if (!el) return null;
                const r = el.getBoundingClientRect();
                return JSON.stringify({{ x: r.x, y: r.y, width: r.width, height: r.height }});
            }})()"#
        );

        let value = self
            .tab
            .evaluate(&script, false)
            .map_err(|e| RenderError::Measure(e.to_string()))?
            .value
            .filter(|v| !v.is_null())
            .ok_or_else(|| RenderError::ElementNotFound {
                selector: selector.to_string(),
                reason: "querySelector returned null".to_string(),
            })?;

        let raw = value
            .as_str()
            .ok_or_else(|| RenderError::Measure("bounding rect is not a string".to_string()))?;
        let rect: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| RenderError::Measure(e.to_string()))?;

        Ok(Page::Viewport {
            x: rect["x"].as_f64().unwrap_or(0.0),
            y: rect["y"].as_f64().unwrap_or(0.0),
            width: rect["width"].as_f64().unwrap_or(0.0),
            height: rect["height"].as_f64().unwrap_or(0.0),
            scale: 1.0,
        })
    }
}

impl Renderer for RenderSession {
    /// Render `url` and save a screenshot of the selected element to `output`.
    ///
    /// The settle wait blocks this capture only; the batch is sequential by
    /// design. A missing element is a lookup failure propagated unchanged;
    /// there is no retry.
    fn capture(&self, url: &str, selector: &str, output: &Path) -> Result<PathBuf, RenderError> {
        self.tab
            .navigate_to(url)
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        // Let animations and late-loading content settle before measuring.
        std::thread::sleep(self.wait);

        self.tab
            .find_element(selector)
            .map_err(|e| RenderError::ElementNotFound {
                selector: selector.to_string(),
                reason: e.to_string(),
            })?;
        let clip = self.measure(selector)?;

        // PNG for .png outputs, otherwise JPEG at top quality. Every later
        // quality decision belongs to the compression stage.
        let is_png = output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        let (format, quality) = if is_png {
            (Page::CaptureScreenshotFormatOption::Png, None)
        } else {
            (Page::CaptureScreenshotFormatOption::Jpeg, Some(100))
        };

        let data = self
            .tab
            .capture_screenshot(format, quality, Some(clip), true)
            .map_err(|e| RenderError::Screenshot(e.to_string()))?;

        std::fs::write(output, &data)?;
        Ok(output.to_path_buf())
    }
}
