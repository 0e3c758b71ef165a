use anyhow::Context;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use super::repo_types::{Bootcamp, DEFAULT_PHOTO};
use crate::{error::AppError, state::AppState};

pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

fn ext_from_name(name: &str) -> Option<&str> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

pub fn photo_key(file_name: &str) -> String {
    format!("bootcamps/{file_name}")
}

/// Checks the upload and derives the stored file name `photo_<id>.<ext>`.
pub fn photo_file_name(
    bootcamp_id: Uuid,
    item: &UploadItem,
    max_bytes: usize,
) -> Result<String, AppError> {
    if !item.content_type.starts_with("image") {
        return Err(AppError::Validation("Please upload an image file".into()));
    }
    if item.body.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "Please upload an image less than {max_bytes} bytes"
        )));
    }
    let ext = item
        .file_name
        .as_deref()
        .and_then(ext_from_name)
        .map(|e| e.to_ascii_lowercase())
        .or_else(|| ext_from_mime(&item.content_type).map(str::to_string))
        .unwrap_or_else(|| "img".to_string());
    Ok(format!("photo_{bootcamp_id}.{ext}"))
}

pub async fn upload_photo(
    st: &AppState,
    bootcamp: &Bootcamp,
    item: UploadItem,
) -> Result<String, AppError> {
    let file_name = photo_file_name(bootcamp.id, &item, st.config.max_file_upload)?;
    let key = photo_key(&file_name);
    st.storage
        .put_object(&key, item.body, &item.content_type)
        .await
        .with_context(|| format!("put_object {key}"))?;
    st.bootcamps.set_photo(bootcamp.id, &file_name).await?;
    info!(bootcamp_id = %bootcamp.id, %key, "bootcamp photo uploaded");
    Ok(file_name)
}

/// Removes a bootcamp with its courses and uploaded photo.
pub async fn delete_bootcamp(st: &AppState, bootcamp: &Bootcamp) -> Result<(), AppError> {
    st.courses.delete_by_bootcamp(bootcamp.id).await?;
    st.bootcamps.delete(bootcamp.id).await?;

    if bootcamp.photo != DEFAULT_PHOTO {
        let key = photo_key(&bootcamp.photo);
        if let Err(e) = st.storage.delete_object(&key).await {
            warn!(error = %e, %key, "failed to delete bootcamp photo");
        }
    }
    info!(bootcamp_id = %bootcamp.id, "bootcamp deleted");
    Ok(())
}
