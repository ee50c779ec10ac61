use serde::{Deserialize, Serialize};

use crate::constants::ALLOWED_VIDEO_MIME_TYPES;
use crate::routes::validation::timestamp_to_rfc3339;

/// Video record stored in redb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub title: String,
    pub description: String,
    /// Canonical 2-decimal string, see `canonicalize_price`
    pub price: String,
    /// Public path under which the asset is served, e.g. `/storage/videos/<name>`
    pub video_path: String,
    /// When the video was created (Unix timestamp)
    pub created_at: i64,
}

/// Video model for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: String,
    pub video_path: String,
    pub created_at: String,
}

impl Video {
    pub fn from_record(id: u64, record: &VideoRecord) -> Self {
        Self {
            id,
            title: record.title.clone(),
            description: record.description.clone(),
            price: record.price.clone(),
            video_path: record.video_path.clone(),
            created_at: timestamp_to_rfc3339(record.created_at),
        }
    }
}

/// Parse a submitted price into its canonical 2-decimal form.
/// Rejects anything non-numeric, negative, or non-finite.
pub fn canonicalize_price(raw: &str) -> Option<String> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(format!("{:.2}", value))
}

/// Whether an uploaded file's mime type is an accepted video type
pub fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_VIDEO_MIME_TYPES.contains(&mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_price_valid() {
        assert_eq!(canonicalize_price("19.99").as_deref(), Some("19.99"));
        assert_eq!(canonicalize_price("5").as_deref(), Some("5.00"));
        assert_eq!(canonicalize_price(" 0 ").as_deref(), Some("0.00"));
        assert_eq!(canonicalize_price("10.5").as_deref(), Some("10.50"));
    }

    #[test]
    fn test_canonicalize_price_invalid() {
        assert!(canonicalize_price("").is_none());
        assert!(canonicalize_price("free").is_none());
        assert!(canonicalize_price("-1").is_none());
        assert!(canonicalize_price("NaN").is_none());
        assert!(canonicalize_price("inf").is_none());
    }

    #[test]
    fn test_allowed_mime_types() {
        assert!(is_allowed_mime("video/mp4"));
        assert!(is_allowed_mime("video/webm"));
        assert!(!is_allowed_mime("image/png"));
        assert!(!is_allowed_mime("application/octet-stream"));
    }

    #[test]
    fn test_video_record_serialization() {
        let record = VideoRecord {
            title: "Intro".to_string(),
            description: "First lesson".to_string(),
            price: "19.99".to_string(),
            video_path: "/storage/videos/abc.mp4".to_string(),
            created_at: 1733788800,
        };

        let bytes = bincode::serialize(&record).unwrap();
        let deserialized: VideoRecord = bincode::deserialize(&bytes).unwrap();

        assert_eq!(record.title, deserialized.title);
        assert_eq!(record.price, deserialized.price);
        assert_eq!(record.video_path, deserialized.video_path);
    }
}
