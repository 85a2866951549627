//! Typed response models. Fields mirror Spotify's JSON objects; fields Spotify may leave out or set to `null` are
//! optional or default to empty.

pub mod album;
pub mod artist;
pub mod audiobook;
pub(crate) mod error;
pub mod page;
pub mod playlist;
pub mod search;
pub mod show;
pub mod track;
pub mod user;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restrictions {
    pub reason: Option<String>,
}

/// How far a user has listened to an episode or a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePoint {
    pub fully_played: bool,
    #[serde(rename = "resume_position_ms", with = "crate::util::duration_millis")]
    pub resume_position: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIds {
    pub isrc: Option<String>,
    pub ean: Option<String>,
    pub upc: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Followers {
    pub href: Option<String>,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Copyright {
    pub text: String,
    #[serde(rename = "type")]
    pub copyright_type: CopyrightType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CopyrightType {
    /// The copyright of the sound recording.
    #[serde(rename = "P")]
    Performance,
    #[serde(rename = "C")]
    Copyright,
}

/// The kinds of items that may be searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Album,
    Artist,
    Playlist,
    Track,
    Show,
    Episode,
    Audiobook,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Album => "album",
            ItemType::Artist => "artist",
            ItemType::Playlist => "playlist",
            ItemType::Track => "track",
            ItemType::Show => "show",
            ItemType::Episode => "episode",
            ItemType::Audiobook => "audiobook",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The response of endpoints that change a playlist's items: an identifier for the playlist's new version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotId {
    pub snapshot_id: String,
}

impl From<SnapshotId> for String {
    fn from(snapshot: SnapshotId) -> Self {
        snapshot.snapshot_id
    }
}
