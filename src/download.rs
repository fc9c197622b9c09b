// src/download.rs
use log::info;
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::errors::Result;

pub const DEFAULT_FILENAME: &str = "examen.pdf";

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\bfilename(\*)?\s*=\s*(?:"([^"]*)"|'([^']*)'|([^;\n]*))"#)
            .expect("filename pattern is valid")
    })
}

/// File name suggested by a `Content-Disposition` header, or the default.
///
/// `filename*` (RFC 5987, percent-encoded) wins over a plain `filename`.
pub fn filename_from_disposition(header: Option<&str>) -> String {
    header
        .and_then(|value| {
            let mut plain = None;
            let mut extended = None;
            for caps in filename_pattern().captures_iter(value) {
                let Some(raw) = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4)) else {
                    continue;
                };
                if caps.get(1).is_some() {
                    extended.get_or_insert(raw.as_str());
                } else {
                    plain.get_or_insert(raw.as_str());
                }
            }

            let raw = match extended {
                // charset'lang'name
                Some(raw) => {
                    let encoded = raw.rsplit_once('\'').map_or(raw, |(_, name)| name);
                    percent_decode_str(encoded).decode_utf8_lossy().into_owned()
                }
                None => plain?.to_string(),
            };
            let cleaned = raw.replace(['"', '\''], "");
            Path::new(cleaned.trim())
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}

/// `dir/name`, or `dir/stem (n).ext` for the first `n` not already taken.
pub fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let as_path = Path::new(name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let ext = as_path.extension().map(|e| e.to_string_lossy().into_owned());

    (1..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Writes the downloaded document and returns where it landed.
pub async fn save_document(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = unique_path(dir, name);
    tokio::fs::write(&path, bytes).await?;
    info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
