pub mod auth;
pub mod health;
pub mod purchases;
pub mod validation;
pub mod videos;

pub use auth::{current_user, login_user, register_user};
pub use health::health_check;
pub use purchases::{list_purchases, store_purchase};
pub use videos::{create_video, delete_video, list_videos};
