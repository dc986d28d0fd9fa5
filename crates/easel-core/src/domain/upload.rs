//! Upload acceptance rules.

use crate::ports::UploadError;

/// Image formats accepted for upload.
pub const IMAGE_TYPES: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

/// A file received from a client, fully buffered.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Extension of `name` including the dot, lowercased. Empty when absent.
pub fn extension_of(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rfind('.') {
        Some(0) | None => String::new(),
        Some(idx) => base[idx..].to_lowercase(),
    }
}

/// Accept only image uploads: the declared MIME type must be `image/<t>` and
/// the extension `.<t>` for a `t` in [`IMAGE_TYPES`]. The two need not name
/// the same format (`image/jpeg` with `.jpg` is fine).
///
/// Returns the lowercased extension to store the file under.
pub fn check_image(file: &IncomingFile) -> Result<String, UploadError> {
    let mime_ok = file
        .content_type
        .as_deref()
        .map(|ct| ct.trim().to_lowercase())
        .and_then(|ct| {
            ct.strip_prefix("image/")
                .map(|sub| IMAGE_TYPES.contains(&sub))
        })
        .unwrap_or(false);

    let ext = extension_of(&file.original_name);
    let ext_ok = ext
        .strip_prefix('.')
        .map(|e| IMAGE_TYPES.contains(&e))
        .unwrap_or(false);

    if mime_ok && ext_ok {
        Ok(ext)
    } else {
        Err(UploadError::Rejected("Images Only!".to_string()))
    }
}
