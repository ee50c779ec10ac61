/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum uploaded video size in bytes (100MB)
pub const MAX_VIDEO_SIZE_BYTES: usize = 104_857_600;

/// Request body limit for the upload route: the video plus headroom
/// for the other multipart fields and framing
pub const UPLOAD_BODY_LIMIT_BYTES: usize = MAX_VIDEO_SIZE_BYTES + 1_048_576;

/// Mime types accepted for uploaded video assets
pub const ALLOWED_VIDEO_MIME_TYPES: &[&str] = &[
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "video/webm",
    "video/x-msvideo",
];

// =============================================================================
// Response Messages
// =============================================================================

/// Single message for both unknown-email and wrong-password logins,
/// so responses carry no account-enumeration signal
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Message for an unauthenticated request to a protected route
pub const MSG_UNAUTHENTICATED: &str = "Unauthenticated";

/// Message for an authenticated caller without the required role
pub const MSG_FORBIDDEN: &str = "Forbidden";

/// Message for a repeated purchase of the same video
pub const MSG_ALREADY_PURCHASED: &str = "Video already purchased";

/// Message returned on a successful purchase
pub const MSG_PURCHASE_SUCCESS: &str = "Purchase successful";

/// Top-level message accompanying a per-field validation error map
pub const MSG_VALIDATION_FAILED: &str = "The given data was invalid.";

/// Message for a catalog lookup with an unknown video id
pub const MSG_VIDEO_NOT_FOUND: &str = "Video not found";
