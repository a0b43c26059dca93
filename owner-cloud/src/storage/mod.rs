//! Object storage gateway
//!
//! Uploaded documents and images live in S3. A stored object is identified
//! by its static virtual-hosted URL (the locator):
//!
//! ```text
//! https://{bucket}.s3.{region}.amazonaws.com/{folder}/{32 hex}.{ext}
//! ```
//!
//! Clients receive a presigned GET URL alongside the locator.

pub mod s3;

pub use s3::S3ObjectStore;

use async_trait::async_trait;
use rand::RngCore;
use shared::error::{AppError, AppResult, ErrorCode};

/// Folder used when the upload does not name one
pub const DEFAULT_FOLDER: &str = "general";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file URL does not belong to this bucket: {0}")]
    InvalidLocator(String),
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("delete failed: {0}")]
    Delete(String),
    #[error("presign failed: {0}")]
    Presign(String),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, returning the locator
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<String, StorageError>;

    async fn delete(&self, locator: &str) -> Result<(), StorageError>;

    /// Temporary GET URL for a locator
    async fn presign(&self, locator: &str) -> Result<String, StorageError>;
}

/// Static URL of `key` in a bucket
pub fn static_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}

/// Extract the object key from a locator or presigned URL of `bucket`.
///
/// Query strings are ignored; URLs for other hosts are rejected.
pub fn key_from_locator(bucket: &str, region: &str, locator: &str) -> Result<String, StorageError> {
    let without_query = locator.split(['?', '#']).next().unwrap_or_default();
    let prefix = static_url(bucket, region, "");
    match without_query.strip_prefix(&prefix) {
        Some(key) if !key.is_empty() && !key.split('/').any(|s| s.is_empty() || s == "..") => {
            Ok(key.to_string())
        }
        _ => Err(StorageError::InvalidLocator(locator.to_string())),
    }
}

/// `{folder}/{32 random hex}{.ext}`
pub fn object_key(folder: &str, file_name: &str) -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    let id = hex::encode(bytes);
    match file_extension(file_name) {
        Some(ext) => format!("{folder}/{id}.{ext}"),
        None => format!("{folder}/{id}"),
    }
}

/// Lowercased alphanumeric extension of a file name
fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > 10 {
        return None;
    }
    ext.chars()
        .all(|c| c.is_ascii_alphanumeric())
        .then(|| ext.to_ascii_lowercase())
}

/// Normalise the requested folder: `a-z 0-9 _ -` segments joined by `/`
pub fn sanitize_folder(folder: Option<&str>) -> AppResult<String> {
    let folder = folder.map(str::trim).filter(|f| !f.is_empty());
    let Some(folder) = folder else {
        return Ok(DEFAULT_FOLDER.to_string());
    };
    let folder = folder.trim_matches('/');
    let valid = !folder.is_empty()
        && folder.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });
    if !valid {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("Invalid folder '{folder}'"),
        )
        .with_detail("field", "folder"));
    }
    Ok(folder.to_ascii_lowercase())
}

/// Accept `image/*` and `application/pdf` up to `max_size` bytes
pub fn validate_upload(content_type: &str, size: usize, max_size: usize) -> AppResult<()> {
    if size == 0 {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if size > max_size {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large: {size} bytes (max {max_size})"),
        )
        .with_detail("maxSize", max_size));
    }
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !(mime.starts_with("image/") || mime == "application/pdf") {
        return Err(AppError::new(ErrorCode::UnsupportedFileType).with_detail("fileType", mime));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUCKET: &str = "owner-docs";
    const REGION: &str = "ap-south-1";

    #[test]
    fn locator_round_trips_to_key() {
        let url = static_url(BUCKET, REGION, "legal/abc.pdf");
        assert_eq!(url, "https://owner-docs.s3.ap-south-1.amazonaws.com/legal/abc.pdf");
        assert_eq!(key_from_locator(BUCKET, REGION, &url).unwrap(), "legal/abc.pdf");
    }

    #[test]
    fn presigned_query_is_stripped() {
        let url = "https://owner-docs.s3.ap-south-1.amazonaws.com/general/x.png?X-Amz-Expires=3600";
        assert_eq!(key_from_locator(BUCKET, REGION, url).unwrap(), "general/x.png");
    }

    #[test]
    fn foreign_or_empty_locators_are_rejected() {
        for bad in [
            "https://other.s3.ap-south-1.amazonaws.com/general/x.png",
            "https://owner-docs.s3.ap-south-1.amazonaws.com/",
            "https://owner-docs.s3.ap-south-1.amazonaws.com/a/../b",
            "not a url",
        ] {
            assert!(matches!(
                key_from_locator(BUCKET, REGION, bad),
                Err(StorageError::InvalidLocator(_))
            ));
        }
    }

    #[test]
    fn object_key_shape() {
        let key = object_key("legal", "FSSAI Cert.PDF");
        let (folder, name) = key.split_once('/').unwrap();
        assert_eq!(folder, "legal");
        let (id, ext) = name.split_once('.').unwrap();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ext, "pdf");

        assert_eq!(object_key("general", "noext").split('/').nth(1).unwrap().len(), 32);
        assert_ne!(object_key("a", "x.png"), object_key("a", "x.png"));
    }

    #[test]
    fn folder_sanitizing() {
        assert_eq!(sanitize_folder(None).unwrap(), "general");
        assert_eq!(sanitize_folder(Some("  ")).unwrap(), "general");
        assert_eq!(sanitize_folder(Some("/Legal/fssai/")).unwrap(), "legal/fssai");
        assert!(sanitize_folder(Some("../etc")).is_err());
        assert!(sanitize_folder(Some("a//b")).is_err());
    }

    #[test]
    fn upload_validation() {
        assert!(validate_upload("image/png", 10, 100).is_ok());
        assert!(validate_upload("application/pdf", 100, 100).is_ok());
        assert_eq!(
            validate_upload("image/png", 101, 100).unwrap_err().code,
            ErrorCode::FileTooLarge
        );
        assert_eq!(
            validate_upload("text/plain", 10, 100).unwrap_err().code,
            ErrorCode::UnsupportedFileType
        );
        assert_eq!(
            validate_upload("image/png", 0, 100).unwrap_err().code,
            ErrorCode::EmptyFile
        );
    }
}
