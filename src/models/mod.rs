pub mod purchase;
pub mod user;
pub mod video;

pub use purchase::PurchaseRecord;
pub use user::{Role, User, UserRecord};
pub use video::{Video, VideoRecord};
