//! Photo asset storage: image type sniffing, file persistence and URL
//! mapping for uploaded photos.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Number of leading bytes inspected to determine the image type.
pub const SNIFF_WINDOW: usize = 512;

lazy_static::lazy_static! {
    /// Accepted upload content types and the file extension stored for each.
    static ref ALLOWED_IMAGE_TYPES: HashMap<&'static str, &'static str> = HashMap::from([
        ("image/jpeg", "jpeg"),
        ("image/png", "png"),
        ("image/webp", "webp"),
    ]);
}

/// Determines the content type of an image payload from its magic numbers,
/// looking only at the first [`SNIFF_WINDOW`] bytes.
pub fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    let header = &bytes[..bytes.len().min(SNIFF_WINDOW)];
    if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if header.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if header.len() >= 12 && &header[0..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    None
}

/// Maps an upload payload to the extension its asset file gets, or rejects
/// it when the payload is not an accepted image format.
pub fn detect_extension(bytes: &[u8]) -> AppResult<&'static str> {
    sniff_content_type(bytes)
        .and_then(|ct| ALLOWED_IMAGE_TYPES.get(ct).copied())
        .ok_or_else(|| AppError::UnsupportedMedia("Unsupported image type".to_string()))
}

/// Persists photo assets under a configured directory and maps them to the
/// public URL path they are served from.
#[derive(Debug, Clone)]
pub struct MediaStore {
    directory: PathBuf,
    url_path: String,
}

impl MediaStore {
    pub fn new(directory: impl Into<PathBuf>, url_path: impl Into<String>) -> Self {
        let url_path: String = url_path.into();
        Self { directory: directory.into(), url_path: url_path.trim_end_matches('/').to_string() }
    }

    /// The public URL an asset file is served from.
    pub fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.url_path, file_name)
    }

    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> AppResult<()> {
        let path = self.asset_path(file_name)?;
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    /// Removes the asset file a photo URL points at. Missing files are not
    /// an error; the row is already gone and the asset may never have been
    /// written (see the upload fan-out).
    pub async fn remove_by_url(&self, url: &str) -> AppResult<()> {
        let file_name = url.rsplit('/').next().unwrap_or(url);
        let path = self.asset_path(file_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Asset already missing: {}", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn asset_path(&self, file_name: &str) -> AppResult<PathBuf> {
        // Asset names are server-generated UUIDs; anything that could walk
        // out of the media directory is rejected outright.
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains("..")
        {
            return Err(AppError::InvalidInput(format!("Invalid asset name: {}", file_name)));
        }
        Ok(self.directory.join(file_name))
    }
}
