//! Index-file discovery.
//!
//! Stage 1 of the pipeline: walk the root directory and collect every file
//! whose base name matches the configured index name. Each match becomes a
//! [`CaptureTarget`] carrying the containing directory and the URL it will be
//! served under during the capture batch.
//!
//! Entries are visited with per-directory filename sorting, so two runs over
//! an unchanged tree produce the same targets in the same order.

use crate::config::Config;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("root directory unreadable: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One page to capture. Immutable; consumed once by the capture batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTarget {
    /// Directory containing the matched index file.
    pub dir: PathBuf,
    /// The matched index file itself.
    pub index_path: PathBuf,
    /// Address of the index file on the transient HTTP server.
    pub url: String,
}

/// Enumerate all index files under `root`, in path order.
pub fn discover(root: &Path, config: &Config) -> Result<Vec<CaptureTarget>, DiscoveryError> {
    let mut targets = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_str() != Some(config.index_name.as_str()) {
            continue;
        }
        let index_path = entry.path().to_path_buf();
        let dir = index_path.parent().unwrap_or(root).to_path_buf();
        targets.push(CaptureTarget {
            url: serve_url(root, &index_path, config.port),
            dir,
            index_path,
        });
    }
    Ok(targets)
}

/// Map an index file to its URL on the local server, which serves `root` as
/// the document root.
fn serve_url(root: &Path, index_path: &Path, port: u16) -> String {
    let rel = index_path.strip_prefix(root).unwrap_or(index_path);
    let segments: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("http://127.0.0.1:{}/{}", port, segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_index(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("index.html"), "<html></html>").unwrap();
    }

    #[test]
    fn finds_nested_index_files_in_path_order() {
        let tmp = TempDir::new().unwrap();
        write_index(&tmp.path().join("b-pricing"));
        write_index(&tmp.path().join("a-landing"));
        write_index(&tmp.path().join("a-landing/archive"));

        let targets = discover(tmp.path(), &Config::default()).unwrap();

        let dirs: Vec<_> = targets
            .iter()
            .map(|t| t.dir.strip_prefix(tmp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("a-landing"),
                PathBuf::from("a-landing/archive"),
                PathBuf::from("b-pricing"),
            ]
        );
    }

    #[test]
    fn ignores_other_files_and_near_matches() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("site");
        write_index(&dir);
        fs::write(dir.join("index.htm"), "").unwrap();
        fs::write(dir.join("page.html"), "").unwrap();
        fs::create_dir(dir.join("index.html.d")).unwrap();

        let targets = discover(tmp.path(), &Config::default()).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].index_path, dir.join("index.html"));
    }

    #[test]
    fn custom_index_name_is_respected() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("site");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("page.html"), "").unwrap();

        let config = Config {
            index_name: "page.html".to_string(),
            ..Default::default()
        };
        let targets = discover(tmp.path(), &config).unwrap();
        assert_eq!(targets.len(), 1);
    }

    #[test]
    fn empty_tree_yields_no_targets() {
        let tmp = TempDir::new().unwrap();
        let targets = discover(tmp.path(), &Config::default()).unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn unreadable_root_errors() {
        let result = discover(Path::new("/nonexistent/snapback-root"), &Config::default());
        assert!(matches!(result, Err(DiscoveryError::Walk(_))));
    }

    #[test]
    fn discovery_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        write_index(&tmp.path().join("one"));
        write_index(&tmp.path().join("two"));

        let config = Config::default();
        let first = discover(tmp.path(), &config).unwrap();
        let second = discover(tmp.path(), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn urls_point_at_the_configured_port() {
        let tmp = TempDir::new().unwrap();
        write_index(&tmp.path().join("site"));

        let config = Config {
            port: 9999,
            ..Default::default()
        };
        let targets = discover(tmp.path(), &config).unwrap();
        assert_eq!(targets[0].url, "http://127.0.0.1:9999/site/index.html");
    }

    #[test]
    fn index_at_root_is_captured() {
        let tmp = TempDir::new().unwrap();
        write_index(tmp.path());

        let targets = discover(tmp.path(), &Config::default()).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].dir, tmp.path());
        assert_eq!(
            targets[0].url,
            format!("http://127.0.0.1:{}/index.html", Config::default().port)
        );
    }
}
