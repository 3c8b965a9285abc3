use super::error::StorageError;

const MAX_STEM_CHARS: usize = 64;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Build a public id of the form `{folder}/{stem}_{millis}_{nonce}{.ext}`.
///
/// The stem is the original filename up to its first dot, reduced to ASCII
/// alphanumerics, `-` and `_`. The extension is kept so that URLs stay
/// recognizable to browsers.
pub fn public_id_for(folder: &str, original_name: &str, millis: i64, nonce: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name)
        .trim();
    let (stem, ext) = match base.split_once('.') {
        Some((stem, rest)) => (stem, rest.rsplit('.').next()),
        None => (base, None),
    };

    let mut stem: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STEM_CHARS)
        .collect();
    if stem.is_empty() {
        stem.push_str("file");
    }

    let ext = ext
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        format!("{stem}_{millis}_{nonce}{ext}")
    } else {
        format!("{folder}/{stem}_{millis}_{nonce}{ext}")
    }
}

/// Reject keys that could escape the store root.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("empty key".into()));
    }
    if key.starts_with('/') || key.contains('\\') || key.contains('\0') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    if key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// The declared MIME type, or one guessed from the filename.
pub fn resolve_content_type(declared: Option<&str>, original_name: &str) -> Option<String> {
    declared
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "application/octet-stream")
        .map(|s| s.to_ascii_lowercase())
        .or_else(|| {
            mime_guess::from_path(original_name)
                .first()
                .map(|m| m.essence_str().to_string())
        })
}

pub fn is_pdf_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.split(';').next().unwrap_or_default().trim())
        .is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE))
}

/// First-page view URL for PDFs (RFC 8118 `page` fragment), `None` otherwise.
pub fn thumbnail_url_for(url: &str, content_type: Option<&str>) -> Option<String> {
    is_pdf_content_type(content_type).then(|| format!("{url}#page=1"))
}
