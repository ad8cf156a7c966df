//! Output filename templating.
//!
//! The `--output` flag is a template resolved once per captured page, relative
//! to the directory containing the matched index file. Placeholders are a
//! fixed, enumerated set — an unrecognized name is a configuration error
//! caught by [`Config::validate`](crate::config::Config::validate), not a
//! silent pass-through.
//!
//! | Placeholder | Resolves to |
//! |---|---|
//! | `{folder}` | base name of the directory containing the index file |
//! | `{quality}` | starting encode quality |
//! | `{index}` | configured index file name |
//! | `{selector}` | configured CSS selector |
//! | `{wait}` | configured settle seconds |
//!
//! The default `../backup_{folder}.jpg` places each capture next to its
//! folder, named after it.

use crate::config::{Config, ConfigError};

/// The complete set of recognized placeholder names.
pub const PLACEHOLDERS: &[&str] = &["folder", "quality", "index", "selector", "wait"];

/// Check that a template only uses recognized placeholders.
pub fn validate(template: &str) -> Result<(), ConfigError> {
    for_each_placeholder(template, |name| {
        if PLACEHOLDERS.contains(&name) {
            Ok(())
        } else {
            Err(ConfigError::UnknownPlaceholder(name.to_string()))
        }
    })
}

/// Substitute every placeholder for the given folder name and config.
///
/// Callers validate the template up front, so an unknown placeholder here is
/// unreachable; it is left verbatim rather than panicking.
pub fn render(template: &str, folder: &str, config: &Config) -> String {
    let mut out = String::with_capacity(template.len() + folder.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match name {
                    "folder" => out.push_str(folder),
                    "quality" => out.push_str(&format_number(config.quality)),
                    "index" => out.push_str(&config.index_name),
                    "selector" => out.push_str(&config.selector),
                    "wait" => out.push_str(&format_number(config.wait_secs)),
                    other => {
                        out.push('{');
                        out.push_str(other);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Format a numeric config value for use inside a filename: integral values
/// drop the trailing `.0` (`100`, not `100.0`).
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn for_each_placeholder(
    template: &str,
    mut f: impl FnMut(&str) -> Result<(), ConfigError>,
) -> Result<(), ConfigError> {
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| ConfigError::UnclosedPlaceholder(template.to_string()))?;
        f(&after[..close])?;
        rest = &after[close + 1..];
    }
    Ok(())
}
