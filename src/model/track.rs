//! Track models.
//!
//! # Local tracks
//!
//! Tracks in a playlist may be local files the playlist's owner added from their device. Local tracks have no ID and
//! their album and artists are missing most information, hence [Track::id] and the IDs in the embedded objects are
//! optional.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{album::SimplifiedAlbum, artist::SimplifiedArtist, ExternalIds, ExternalUrls, Restrictions};

/// A full track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub album: SimplifiedAlbum,
    pub artists: Vec<SimplifiedArtist>,
    #[serde(default)]
    pub available_markets: Vec<String>,
    pub disc_number: u32,
    pub track_number: u32,
    #[serde(rename = "duration_ms", with = "crate::util::duration_millis")]
    pub duration: Duration,
    pub explicit: bool,
    #[serde(default)]
    pub external_ids: ExternalIds,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub href: Option<String>,
    /// Only present when a market was given in the request.
    pub is_playable: Option<bool>,
    pub restrictions: Option<Restrictions>,
    pub popularity: Option<u32>,
    pub preview_url: Option<String>,
    pub uri: String,
    #[serde(default)]
    pub is_local: bool,
}

/// A simplified track, as embedded in albums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedTrack {
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<SimplifiedArtist>,
    #[serde(default)]
    pub available_markets: Vec<String>,
    pub disc_number: u32,
    pub track_number: u32,
    #[serde(rename = "duration_ms", with = "crate::util::duration_millis")]
    pub duration: Duration,
    pub explicit: bool,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub href: Option<String>,
    pub is_playable: Option<bool>,
    pub restrictions: Option<Restrictions>,
    pub preview_url: Option<String>,
    pub uri: String,
    #[serde(default)]
    pub is_local: bool,
}

/// A track in the current user's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTrack {
    pub added_at: String,
    pub track: Track,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[doc(hidden)]
pub struct Tracks {
    tracks: Vec<Track>,
}

impl From<Track> for SimplifiedTrack {
    fn from(track: Track) -> Self {
        Self {
            id: track.id,
            name: track.name,
            artists: track.artists,
            available_markets: track.available_markets,
            disc_number: track.disc_number,
            track_number: track.track_number,
            duration: track.duration,
            explicit: track.explicit,
            external_urls: track.external_urls,
            href: track.href,
            is_playable: track.is_playable,
            restrictions: track.restrictions,
            preview_url: track.preview_url,
            uri: track.uri,
            is_local: track.is_local,
        }
    }
}

impl From<Tracks> for Vec<Track> {
    fn from(tracks: Tracks) -> Self {
        tracks.tracks
    }
}
