use std::io::ErrorKind;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::utils::site_paths::resolve_within;

/// Deepest include chain followed before giving up, which also stops include cycles.
pub const MAX_INCLUDE_DEPTH: usize = 16;

static INCLUDE_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<!--#include\s+virtual="([^"]+)"\s*-->"#).expect("include directive pattern is valid")
});

/// Expands `<!--#include virtual="/path" -->` directives against the site root.
/// Included files are expanded in turn. Failures are left in the page as HTML
/// comments so a broken include never takes the whole page down.
pub fn process_ssi(content: &str, site_root: &Path) -> String {
    expand(content, site_root, 0)
}

fn expand(content: &str, site_root: &Path, depth: usize) -> String {
    INCLUDE_DIRECTIVE
        .replace_all(content, |caps: &Captures| {
            let virtual_path = &caps[1];
            if depth >= MAX_INCLUDE_DEPTH {
                tracing::warn!("SSI include depth exceeded at {}", virtual_path);
                return format!("<!-- SSI error: include depth exceeded for {} -->", virtual_path);
            }

            let Some(include_path) = resolve_within(site_root, virtual_path.trim_start_matches('/')) else {
                return format!("<!-- SSI include not found: {} -->", virtual_path);
            };

            match std::fs::read_to_string(&include_path) {
                Ok(included) => expand(&included, site_root, depth + 1),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!("SSI include not found: {}", virtual_path);
                    format!("<!-- SSI include not found: {} -->", virtual_path)
                }
                Err(e) => {
                    tracing::warn!("SSI include {} failed: {}", virtual_path, e);
                    format!("<!-- SSI error: {} -->", e)
                }
            }
        })
        .into_owned()
}
