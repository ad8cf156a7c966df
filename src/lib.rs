//! # Snapback
//!
//! Batch element screenshots of local HTML trees, recompressed to a
//! file-size budget. Point it at a directory of static pages: every folder
//! holding an `index.html` gets one pixel-exact screenshot of a chosen DOM
//! element, and every screenshot is squeezed under a target size.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Capture    root/  →  backup_*.jpg     (headless Chrome, one per folder)
//! 2. Compress   files  →  optimized/       (quality-decay loop to target size)
//! ```
//!
//! The capture stage is strictly sequential against a single shared browser
//! session; the compress stage iterates rounds over the whole batch, fanning
//! each round out with rayon. The two stages only meet through the list of
//! produced file paths, so each is testable on its own — the capture loop
//! against a mock renderer, the compression loop against a mock codec.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discover`] | Walks the root directory, matches index files, builds capture targets |
//! | [`server`] | Transient HTTP server exposing the root to the browser |
//! | [`browser`] | Headless-Chrome session: navigate, settle, measure, screenshot |
//! | [`capture`] | Batch loop driving the renderer once per target |
//! | [`compress`] | The adaptive quality-decay loop (the core of the tool) |
//! | [`encode`] | Codec seam: JPEG re-encode and palette-quantized PNG |
//! | [`config`] | Immutable run configuration and its invariants |
//! | [`template`] | Output filename templating with a fixed placeholder set |
//! | [`output`] | CLI progress formatting — pure `format_*` + `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## Geometric Quality Decay
//!
//! The compressor never searches per file. One scalar quality starts at the
//! configured value and shrinks by ×0.95 each round; files drop out of the
//! batch as they fit. This converges fast, needs no size model, and accepts
//! approximate rather than optimal sizing. See [`compress`] for the
//! compounding re-encode trade-off that comes with it.
//!
//! ## One Browser, One Tab
//!
//! Viewport, device scale, and cache disablement are launch flags on a
//! single Chrome process reused for the whole batch. Session state is set
//! once and read-only afterwards, which is what makes the sequential capture
//! loop safe.
//!
//! ## Everything Is RAII
//!
//! The HTTP server and the browser session are guard values owned by the
//! driver's capture scope. Whether the batch finishes, fails on the first
//! page, or panics, both release on the way out — no cleanup code paths.

pub mod browser;
pub mod capture;
pub mod compress;
pub mod config;
pub mod discover;
pub mod encode;
pub mod output;
pub mod server;
pub mod template;
