use serde::{Deserialize, Serialize};

use super::{page::CursorPage, track::Track, ExternalUrls, Followers, Image};

/// A full artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub external_urls: ExternalUrls,
    pub href: String,
    pub uri: String,
    pub followers: Option<Followers>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub popularity: Option<u32>,
}

/// A simplified artist, as embedded in albums and tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedArtist {
    /// Artists of local tracks have no ID.
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub href: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[doc(hidden)]
pub struct Artists {
    artists: Vec<Artist>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[doc(hidden)]
pub struct TopTracks {
    tracks: Vec<Track>,
}

/// The response of the followed artists endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[doc(hidden)]
pub struct FollowedArtists {
    artists: CursorPage<Artist>,
}

impl From<Artist> for SimplifiedArtist {
    fn from(artist: Artist) -> Self {
        Self {
            id: Some(artist.id),
            name: artist.name,
            external_urls: artist.external_urls,
            href: Some(artist.href),
            uri: Some(artist.uri),
        }
    }
}

impl From<Artists> for Vec<Artist> {
    fn from(artists: Artists) -> Self {
        artists.artists
    }
}

impl From<FollowedArtists> for CursorPage<Artist> {
    fn from(followed: FollowedArtists) -> Self {
        followed.artists
    }
}

impl From<TopTracks> for Vec<Track> {
    fn from(top_tracks: TopTracks) -> Self {
        top_tracks.tracks
    }
}
