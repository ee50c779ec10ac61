use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use redb::ReadableTable;

use crate::auth::AuthUser;
use crate::constants::MAX_VIDEO_SIZE_BYTES;
use crate::db::{self, tables};
use crate::error::{AppError, Result, ValidationErrors};
use crate::models::video::{canonicalize_price, is_allowed_mime};
use crate::models::{Video, VideoRecord};
use crate::routes::validation::non_empty;
use crate::AppState;

/// List the public catalog, newest first
///
/// Unauthenticated; returns the full catalog (no pagination at this scale).
pub async fn list_videos(State(state): State<AppState>) -> Result<Json<Vec<Video>>> {
    let db = state.db.clone();

    let videos = tokio::task::spawn_blocking(move || -> Result<Vec<Video>> {
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(tables::VIDEOS)?;

        // Ids are allocated monotonically, so descending id order is
        // newest-first.
        let mut videos = Vec::new();
        for entry in table.iter()?.rev() {
            let (id, bytes) = entry?;
            let record: VideoRecord = bincode::deserialize(bytes.value())?;
            videos.push(Video::from_record(id.value(), &record));
        }
        Ok(videos)
    })
    .await??;

    Ok(Json(videos))
}

/// The parsed multipart upload form
#[derive(Debug, Default)]
struct UploadForm {
    title: Option<String>,
    description: Option<String>,
    price: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Option<Vec<u8>>,
}

/// Read the multipart fields we care about; unknown fields are ignored.
/// A field that fails to stream (oversize body, broken upload) surfaces as
/// a validation error on that field.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ValidationErrors::single("video", "The video failed to upload."))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                form.title = Some(field.text().await.map_err(|_| {
                    ValidationErrors::single("title", "The title failed to upload.")
                })?);
            }
            "description" => {
                form.description = Some(field.text().await.map_err(|_| {
                    ValidationErrors::single("description", "The description failed to upload.")
                })?);
            }
            "price" => {
                form.price = Some(field.text().await.map_err(|_| {
                    ValidationErrors::single("price", "The price failed to upload.")
                })?);
            }
            "video" => {
                form.file_name = field.file_name().map(str::to_string);
                form.content_type = field.content_type().map(str::to_string);
                form.bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|_| {
                            ValidationErrors::single("video", "The video failed to upload.")
                        })?
                        .to_vec(),
                );
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Create a catalog entry from an admin upload
///
/// Multipart fields: title, description, price, video (the asset file).
/// The asset is written to the blob store first; the catalog row is only
/// inserted after the blob write succeeds, so a storage failure aborts the
/// whole operation without leaving a dangling record.
pub async fn create_video(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Video>)> {
    auth.require_admin()?;

    let form = read_upload_form(multipart).await?;
    let mut errors = ValidationErrors::default();

    let title = match non_empty(form.title.as_deref()) {
        Some(title) => title.to_string(),
        None => {
            errors.add("title", "The title field is required.");
            String::new()
        }
    };

    let description = match non_empty(form.description.as_deref()) {
        Some(description) => description.to_string(),
        None => {
            errors.add("description", "The description field is required.");
            String::new()
        }
    };

    let price = match non_empty(form.price.as_deref()) {
        Some(raw) => match canonicalize_price(raw) {
            Some(price) => price,
            None => {
                errors.add("price", "The price must be a number.");
                String::new()
            }
        },
        None => {
            errors.add("price", "The price field is required.");
            String::new()
        }
    };

    match &form.bytes {
        None => errors.add("video", "The video field is required."),
        Some(bytes) => {
            if bytes.len() > MAX_VIDEO_SIZE_BYTES {
                errors.add(
                    "video",
                    format!(
                        "The video may not be greater than {} bytes.",
                        MAX_VIDEO_SIZE_BYTES
                    ),
                );
            }
            match form.content_type.as_deref() {
                Some(mime) if is_allowed_mime(mime) => {}
                _ => errors.add(
                    "video",
                    "The video must be a file of type: mp4, mpeg, mov, webm, avi.",
                ),
            }
        }
    }

    errors.into_result()?;

    let bytes = form.bytes.unwrap_or_default();
    let video_path = state.store.save(form.file_name.as_deref(), &bytes).await?;

    let db = state.db.clone();
    let video = tokio::task::spawn_blocking(move || -> Result<Video> {
        let record = VideoRecord {
            title,
            description,
            price,
            video_path,
            created_at: Utc::now().timestamp(),
        };

        let write_txn = db.begin_write()?;
        let video = {
            let video_id = db::next_id(&write_txn, db::VIDEO_IDS)?;
            let mut videos = write_txn.open_table(tables::VIDEOS)?;
            let bytes = bincode::serialize(&record)?;
            videos.insert(video_id, bytes.as_slice())?;
            Video::from_record(video_id, &record)
        };
        write_txn.commit()?;

        tracing::info!("Video created: id={}", video.id);
        Ok(video)
    })
    .await??;

    Ok((StatusCode::CREATED, Json(video)))
}

/// Delete a catalog entry (admin only)
///
/// Purchase rows for the video are removed in the same transaction, so no
/// entitlement ever references a missing video. The asset blob itself is
/// left in place.
pub async fn delete_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<u64>,
) -> Result<StatusCode> {
    auth.require_admin()?;

    let db = state.db.clone();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let mut videos = write_txn.open_table(tables::VIDEOS)?;
            if videos.remove(id)?.is_none() {
                return Err(AppError::VideoNotFound);
            }
            drop(videos);

            // Cascade: drop every entitlement that pointed at this video.
            let mut purchases = write_txn.open_table(tables::PURCHASES)?;
            let orphaned: Vec<(u64, u64)> = purchases
                .iter()?
                .filter_map(|entry| entry.ok())
                .map(|(key, _)| key.value())
                .filter(|&(_, video_id)| video_id == id)
                .collect();
            for key in orphaned {
                purchases.remove(key)?;
            }
        }
        write_txn.commit()?;

        tracing::info!("Video deleted: id={}", id);
        Ok(())
    })
    .await??;

    Ok(StatusCode::NO_CONTENT)
}
