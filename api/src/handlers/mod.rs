//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod achievements;
pub mod auth;
pub mod favorites;
pub mod follows;
pub mod images;
pub mod ratings;
pub mod users;
pub mod vivacs;
pub mod weather;

pub use achievements::{list_achievements, list_unlocked};
pub use auth::{
    confirm_password_reset, google_login, login, logout, refresh, register,
    request_password_reset,
};
pub use favorites::{
    add_favorite, create_folder, delete_folder, folder_contents, list_folders, move_favorite,
    remove_favorite,
};
pub use follows::{follow_user, list_followers, list_following, unfollow_user};
pub use images::upload_image;
pub use ratings::{
    create_rating, delete_rating, list_ratings_by_user, list_ratings_by_vivac, update_rating,
};
pub use users::{
    delete_me, get_me, get_public_profile, get_ranking, list_avatars, select_avatar, update_me,
};
pub use vivacs::{
    add_photo, create_vivac, delete_vivac, get_vivac, list_vivacs, list_vivacs_by_user,
    remove_photo, update_vivac,
};
pub use weather::{get_current, get_forecast};
