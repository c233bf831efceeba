// ── Cover image data URIs ──
//
// Covers travel inline as `data:<mime>;base64,<payload>` text. The store
// treats them as opaque strings; these helpers exist for callers that
// start from a local image file.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::CoreError;

/// Encode raw image bytes as a data URI.
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Guess an image MIME type from a file extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(mime)
}

/// Read an image file and encode it as a data URI.
///
/// Unknown extensions fall back to `application/octet-stream`.
pub fn data_uri_from_file(path: &Path) -> Result<String, CoreError> {
    let bytes = std::fs::read(path).map_err(|e| {
        CoreError::validation(format!("cannot read cover image {}: {e}", path.display()))
    })?;
    let mime = mime_for_path(path).unwrap_or("application/octet-stream");
    Ok(encode_data_uri(mime, &bytes))
}

/// Split a data URI into its MIME type and decoded size in bytes.
///
/// Returns `None` for anything that isn't a base64 data URI.
pub fn describe_data_uri(uri: &str) -> Option<(&str, usize)> {
    let rest = uri.strip_prefix("data:")?;
    let (mime, payload) = rest.split_once(";base64,")?;
    let size = BASE64.decode(payload).ok()?.len();
    Some((mime, size))
}
