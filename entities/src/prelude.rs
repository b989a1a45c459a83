pub use super::album::Entity as Album;
pub use super::event::Entity as Event;
pub use super::session::Entity as Session;
pub use super::user::Entity as User;
pub use super::user_favorite_album::Entity as UserFavoriteAlbum;
