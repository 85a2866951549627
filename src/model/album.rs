//! Album models.
//!
//! Spotify returns albums in two shapes: the full [Album] from the album endpoints and the [SimplifiedAlbum] embedded
//! in tracks, artist album listings, new releases and search results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    artist::SimplifiedArtist, page::Page, track::SimplifiedTrack, Copyright, DatePrecision, ExternalIds, ExternalUrls,
    Image, Restrictions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumType {
    #[serde(alias = "ALBUM")]
    Album,
    #[serde(alias = "SINGLE")]
    Single,
    #[serde(alias = "COMPILATION")]
    Compilation,
}

/// The relationship between an artist and an album in an artist's album listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumGroup {
    Album,
    Single,
    Compilation,
    AppearsOn,
}

/// A full album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub album_type: AlbumType,
    pub total_tracks: u32,
    #[serde(default)]
    pub available_markets: Vec<String>,
    pub external_urls: ExternalUrls,
    pub href: String,
    pub uri: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub release_date: String,
    pub release_date_precision: DatePrecision,
    pub restrictions: Option<Restrictions>,
    pub artists: Vec<SimplifiedArtist>,
    pub tracks: Page<SimplifiedTrack>,
    #[serde(default)]
    pub copyrights: Vec<Copyright>,
    #[serde(default)]
    pub external_ids: ExternalIds,
    #[serde(default)]
    pub genres: Vec<String>,
    pub label: Option<String>,
    pub popularity: Option<u32>,
}

/// A simplified album, as embedded in other objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedAlbum {
    pub id: String,
    pub name: String,
    pub album_type: AlbumType,
    pub total_tracks: u32,
    #[serde(default)]
    pub available_markets: Vec<String>,
    pub external_urls: ExternalUrls,
    pub href: String,
    pub uri: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub release_date: String,
    pub release_date_precision: DatePrecision,
    pub restrictions: Option<Restrictions>,
    pub artists: Vec<SimplifiedArtist>,
    /// Only present in an artist's album listing.
    pub album_group: Option<AlbumGroup>,
}

/// An album in the current user's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAlbum {
    /// When the album was saved, as an ISO 8601 timestamp.
    pub added_at: String,
    pub album: Album,
}

/// The response of the several albums endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[doc(hidden)]
pub struct Albums {
    albums: Vec<Album>,
}

/// The response of the new releases endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[doc(hidden)]
pub struct NewReleases {
    albums: Page<SimplifiedAlbum>,
}

impl AlbumGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            AlbumGroup::Album => "album",
            AlbumGroup::Single => "single",
            AlbumGroup::Compilation => "compilation",
            AlbumGroup::AppearsOn => "appears_on",
        }
    }
}

impl fmt::Display for AlbumGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Album> for SimplifiedAlbum {
    fn from(album: Album) -> Self {
        Self {
            id: album.id,
            name: album.name,
            album_type: album.album_type,
            total_tracks: album.total_tracks,
            available_markets: album.available_markets,
            external_urls: album.external_urls,
            href: album.href,
            uri: album.uri,
            images: album.images,
            release_date: album.release_date,
            release_date_precision: album.release_date_precision,
            restrictions: album.restrictions,
            artists: album.artists,
            album_group: None,
        }
    }
}

impl From<Albums> for Vec<Album> {
    fn from(albums: Albums) -> Self {
        albums.albums
    }
}

impl From<NewReleases> for Page<SimplifiedAlbum> {
    fn from(new_releases: NewReleases) -> Self {
        new_releases.albums
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplified_album_with_group() {
        let album: SimplifiedAlbum = serde_json::from_value(serde_json::json!({
            "album_type": "single",
            "album_group": "appears_on",
            "total_tracks": 1,
            "available_markets": ["FI", "US"],
            "external_urls": { "spotify": "https://open.spotify.com/album/1" },
            "href": "https://api.spotify.com/v1/albums/1",
            "id": "1",
            "images": [],
            "name": "Single",
            "release_date": "2021",
            "release_date_precision": "year",
            "type": "album",
            "uri": "spotify:album:1",
            "artists": []
        }))
        .unwrap();

        assert_eq!(album.album_type, AlbumType::Single);
        assert_eq!(album.album_group, Some(AlbumGroup::AppearsOn));
        assert_eq!(album.release_date_precision, DatePrecision::Year);
        assert_eq!(album.available_markets, ["FI", "US"]);
    }
}
