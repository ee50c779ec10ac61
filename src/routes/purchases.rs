use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::constants::MSG_PURCHASE_SUCCESS;
use crate::db::tables;
use crate::error::{AppError, Result, ValidationErrors};
use crate::models::{PurchaseRecord, Video, VideoRecord};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    #[serde(default)]
    pub video_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub message: String,
}

/// Purchase a video for the authenticated caller
///
/// The entitlement is keyed by (user, video), and the absence check and
/// insert happen inside one serialized write transaction. Two concurrent
/// purchases of the same pair therefore cannot both insert; the loser gets
/// 409 and no duplicate row can ever exist.
pub async fn store_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseResponse>)> {
    let Some(video_id) = payload.video_id else {
        return Err(ValidationErrors::single(
            "video_id",
            "The video id field is required.",
        ));
    };

    let user_id = auth.id;
    let db = state.db.clone();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let videos = write_txn.open_table(tables::VIDEOS)?;
            if videos.get(video_id)?.is_none() {
                return Err(ValidationErrors::single(
                    "video_id",
                    "The selected video id is invalid.",
                ));
            }
            drop(videos);

            let mut purchases = write_txn.open_table(tables::PURCHASES)?;
            if purchases.get((user_id, video_id))?.is_some() {
                tracing::info!(
                    "Duplicate purchase rejected: user={} video={}",
                    user_id,
                    video_id
                );
                return Err(AppError::AlreadyPurchased);
            }

            let record = PurchaseRecord {
                created_at: Utc::now().timestamp(),
            };
            let bytes = bincode::serialize(&record)?;
            purchases.insert((user_id, video_id), bytes.as_slice())?;
        }
        write_txn.commit()?;

        tracing::info!("Purchase recorded: user={} video={}", user_id, video_id);
        Ok(())
    })
    .await??;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            message: MSG_PURCHASE_SUCCESS.to_string(),
        }),
    ))
}

/// List the videos owned by the authenticated caller
///
/// Joins the caller's entitlements to their catalog rows; other users'
/// purchases are never visible here.
pub async fn list_purchases(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Video>>> {
    let user_id = auth.id;
    let db = state.db.clone();

    let owned = tokio::task::spawn_blocking(move || -> Result<Vec<Video>> {
        let read_txn = db.begin_read()?;
        let purchases = read_txn.open_table(tables::PURCHASES)?;
        let videos = read_txn.open_table(tables::VIDEOS)?;

        let mut owned = Vec::new();
        for entry in purchases.range((user_id, u64::MIN)..=(user_id, u64::MAX))? {
            let (key, _) = entry?;
            let (_, video_id) = key.value();

            // The delete cascade keeps entitlements and catalog in sync, so
            // this lookup cannot miss; a missing row would mean a corrupt
            // store and is surfaced as such.
            let record: VideoRecord = videos
                .get(video_id)?
                .map(|bytes| bincode::deserialize(bytes.value()))
                .transpose()?
                .ok_or(AppError::VideoNotFound)?;

            owned.push(Video::from_record(video_id, &record));
        }
        Ok(owned)
    })
    .await??;

    Ok(Json(owned))
}
