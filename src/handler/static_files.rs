//! Static file serving module
//!
//! Resolves URL paths to files under the configured public root and loads
//! their content with the matching Content-Type.

use crate::config::StaticConfig;
use crate::http::mime;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum StaticFileError {
    #[error("path escapes the public root")]
    Forbidden,
    #[error("file not found")]
    NotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Load the file a URL path refers to, together with its Content-Type.
///
/// The empty and root paths map to the configured index document. Paths that
/// resolve outside the public root are rejected with `Forbidden`.
pub async fn load(
    cfg: &StaticConfig,
    url_path: &str,
) -> Result<(Vec<u8>, &'static str), StaticFileError> {
    let file_path = resolve(cfg, url_path)?;

    // Second line of defense after the lexical check: canonicalization
    // catches symlinks pointing outside the root.
    let root = Path::new(&cfg.public_root)
        .canonicalize()
        .map_err(StaticFileError::Io)?;
    let canonical = match file_path.canonicalize() {
        Ok(p) => p,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StaticFileError::NotFound)
        }
        Err(e) => return Err(e.into()),
    };
    if !canonical.starts_with(&root) {
        return Err(StaticFileError::Forbidden);
    }
    if canonical.is_dir() {
        return Err(StaticFileError::NotFound);
    }

    let content = match fs::read(&canonical).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StaticFileError::NotFound)
        }
        Err(e) => return Err(e.into()),
    };

    let content_type = mime::content_type_for(canonical.extension().and_then(|e| e.to_str()));
    Ok((content, content_type))
}

/// Map a URL path to a candidate file path under the public root.
///
/// Any `..` component is rejected outright, so a traversal attempt yields
/// `Forbidden` even when the target does not exist.
fn resolve(cfg: &StaticConfig, url_path: &str) -> Result<PathBuf, StaticFileError> {
    let trimmed = url_path.trim_start_matches('/');
    let relative = if trimmed.is_empty() {
        cfg.index_file.as_str()
    } else {
        trimmed
    };

    let candidate = Path::new(relative);
    for component in candidate.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return Err(StaticFileError::Forbidden),
        }
    }

    Ok(Path::new(&cfg.public_root).join(candidate))
}
