/// Album shown on the albums page. Fixture data, never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeaturedAlbum {
    pub title: &'static str,
    pub artist: &'static str,
    pub year: i32,
    pub cover: &'static str,
}

pub const FEATURED_ALBUMS: [FeaturedAlbum; 6] = [
    FeaturedAlbum {
        title: "Nevermind",
        artist: "Nirvana",
        year: 1991,
        cover: "https://upload.wikimedia.org/wikipedia/en/2/29/NirvanaNevermindalbumcover.jpg",
    },
    FeaturedAlbum {
        title: "OK Computer",
        artist: "Radiohead",
        year: 1997,
        cover: "https://upload.wikimedia.org/wikipedia/en/e/e4/Radiohead.okcomputer.albumart.jpg",
    },
    FeaturedAlbum {
        title: "AM",
        artist: "Arctic Monkeys",
        year: 2013,
        cover: "https://upload.wikimedia.org/wikipedia/en/1/17/Arctic_Monkeys_-_AM.png",
    },
    FeaturedAlbum {
        title: "Absolution",
        artist: "Muse",
        year: 2003,
        cover: "https://upload.wikimedia.org/wikipedia/en/e/e0/Muse_-_Absolution_cover.jpg",
    },
    FeaturedAlbum {
        title: "American Idiot",
        artist: "Green Day",
        year: 2004,
        cover: "https://upload.wikimedia.org/wikipedia/en/0/07/Green_Day_-_American_Idiot_album_cover.png",
    },
    FeaturedAlbum {
        title: "Hybrid Theory",
        artist: "Linkin Park",
        year: 2000,
        cover: "https://upload.wikimedia.org/wikipedia/en/f/fc/Linkin_Park_-_Hybrid_Theory_CD_cover.jpg",
    },
];

pub fn featured_albums() -> Vec<FeaturedAlbum> {
    FEATURED_ALBUMS.to_vec()
}
