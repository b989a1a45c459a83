pub mod album_response;
pub mod page;

pub use album_response::{featured_albums, FeaturedAlbum};
pub use page::{MessageType, Page};
