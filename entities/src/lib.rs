pub mod prelude;

pub mod album;
pub mod album_local_model;
pub mod event;
pub mod event_local_model;
pub mod session;
pub mod user;
pub mod user_favorite_album;
pub mod user_local_model;
