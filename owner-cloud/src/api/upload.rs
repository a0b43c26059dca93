//! File upload API: owner documents and images to S3
//!
//! POST /api/v1/upload   multipart (`file`, optional `folder`) → validate → S3
//! DELETE /api/v1/upload `{ "fileUrl": ... }`
//!
//! Objects are stored at `{folder}/{32 hex}.{ext}`; the response carries a
//! presigned URL for immediate display and the static URL to persist.

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::Extension;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, ErrorCode};

use super::extract::ApiJson;
use crate::auth::OwnerIdentity;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::storage::{ObjectStore, object_key, sanitize_folder, validate_upload};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Presigned GET URL
    pub file_url: String,
    /// Permanent locator to store on the restaurant
    pub static_url: String,
    pub file_name: String,
    pub file_size: usize,
    pub file_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeleteFileRequest {
    pub file_url: String,
}

fn object_store(state: &AppState) -> Result<Arc<dyn ObjectStore>, AppError> {
    state
        .storage
        .clone()
        .ok_or_else(|| AppError::new(ErrorCode::StorageNotConfigured))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::new(ErrorCode::FileTooLarge)
    } else {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    }
}

struct UploadedFile {
    name: String,
    content_type: String,
    data: Vec<u8>,
}

/// POST /api/v1/upload
pub async fn upload_file(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    mut multipart: Multipart,
) -> ServiceResult<ApiResponse<UploadResponse>> {
    let storage = object_store(&state)?;

    let mut file: Option<UploadedFile> = None;
    let mut folder: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();
                file = Some(UploadedFile {
                    name,
                    content_type,
                    data,
                });
            }
            Some("folder") => {
                folder = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    validate_upload(&file.content_type, file.data.len(), state.max_file_size)?;
    let folder = sanitize_folder(folder.as_deref())?;

    let key = object_key(&folder, &file.name);
    let file_size = file.data.len();
    let static_url = storage.put(&key, file.data, &file.content_type).await?;
    let file_url = storage.presign(&static_url).await?;

    tracing::info!(
        owner_id = identity.user_id,
        key = %key,
        size = file_size,
        content_type = %file.content_type,
        "File uploaded"
    );

    Ok(ApiResponse::success_with_message(
        "File uploaded successfully",
        UploadResponse {
            file_url,
            static_url,
            file_name: file.name,
            file_size,
            file_type: file.content_type,
        },
    ))
}

/// DELETE /api/v1/upload
pub async fn delete_file(
    State(state): State<AppState>,
    Extension(identity): Extension<OwnerIdentity>,
    ApiJson(req): ApiJson<DeleteFileRequest>,
) -> ServiceResult<ApiResponse<()>> {
    let storage = object_store(&state)?;
    if req.file_url.trim().is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "File URL is required")
            .with_detail("field", "fileUrl")
            .into());
    }

    storage.delete(&req.file_url).await?;
    tracing::info!(owner_id = identity.user_id, file_url = %req.file_url, "File deleted");

    Ok(ApiResponse::done("File deleted successfully"))
}
