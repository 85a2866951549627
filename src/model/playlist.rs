//! Playlist models and the request bodies used to create and change playlists.

use serde::{Deserialize, Serialize};

use super::{page::Page, track::Track, user::PublicUser, ExternalUrls, Followers, Image};

/// A full playlist.
///
/// When only some fields were requested, the missing fields of this struct are left to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub collaborative: Option<bool>,
    pub public: Option<bool>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub followers: Option<Followers>,
    pub href: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub owner: Option<PublicUser>,
    pub snapshot_id: Option<String>,
    pub tracks: Option<Page<PlaylistItem>>,
    pub uri: Option<String>,
}

/// A simplified playlist, as returned in playlist listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub collaborative: bool,
    pub public: Option<bool>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub href: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub owner: PublicUser,
    pub snapshot_id: String,
    pub tracks: Option<PlaylistTracksRef>,
    pub uri: String,
}

/// Where a playlist's items can be retrieved from, and how many there are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub href: String,
    pub total: u32,
}

/// An item in a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// When the item was added, as an ISO 8601 timestamp. Very old playlists may not have this.
    pub added_at: Option<String>,
    pub added_by: Option<PublicUser>,
    #[serde(default)]
    pub is_local: bool,
    /// The track. `None` if the track is no longer available, or if the item is something else, like a podcast
    /// episode.
    #[serde(default, deserialize_with = "deserialize_track")]
    pub track: Option<Track>,
}

/// Accepts anything that isn't a track (e.g. an episode) as a missing track.
fn deserialize_track<'de, D>(deserializer: D) -> Result<Option<Track>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(value.and_then(|value| {
        if value.get("type").and_then(|kind| kind.as_str()) == Some("episode") {
            None
        } else {
            serde_json::from_value(value).ok()
        }
    }))
}

/// A new playlist, for [PlaylistService::create](crate::client::playlists::PlaylistService::create).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPlaylist {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborative: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewPlaylist {
    pub fn new<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            public: None,
            collaborative: None,
            description: None,
        }
    }

    pub fn public(self, public: bool) -> Self {
        Self {
            public: Some(public),
            ..self
        }
    }

    /// A collaborative playlist must be explicitly set to not be public.
    pub fn collaborative(self, collaborative: bool) -> Self {
        Self {
            collaborative: Some(collaborative),
            ..self
        }
    }

    pub fn description<S>(self, description: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            description: Some(description.into()),
            ..self
        }
    }
}

/// Changes to a playlist's details. Only the fields that are set are changed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborative: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PlaylistDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name<S>(self, name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    pub fn public(self, public: bool) -> Self {
        Self {
            public: Some(public),
            ..self
        }
    }

    /// A collaborative playlist can't be public.
    pub fn collaborative(self, collaborative: bool) -> Self {
        Self {
            collaborative: Some(collaborative),
            ..self
        }
    }

    pub fn description<S>(self, description: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.public.is_none() && self.collaborative.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AddItems<'a> {
    pub uris: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// Moves a range of a playlist's items, for
/// [PlaylistService::reorder_items](crate::client::playlists::PlaylistService::reorder_items).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemsReorder {
    pub range_start: u32,
    pub insert_before: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
}

impl ItemsReorder {
    /// Move the item at `range_start` so it's before the item currently at `insert_before`. Both are zero-based.
    pub fn new(range_start: u32, insert_before: u32) -> Self {
        Self {
            range_start,
            insert_before,
            range_length: None,
            snapshot_id: None,
        }
    }

    /// Move this many items starting from `range_start`. Defaults to 1.
    pub fn range_length(self, range_length: u32) -> Self {
        Self {
            range_length: Some(range_length),
            ..self
        }
    }

    /// Apply the reorder to this version of the playlist.
    pub fn snapshot_id<S>(self, snapshot_id: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            snapshot_id: Some(snapshot_id.into()),
            ..self
        }
    }
}

/// An item to remove from a playlist at the given zero-based positions, for
/// [PlaylistService::remove_items_at](crate::client::playlists::PlaylistService::remove_items_at).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemPositions {
    pub uri: String,
    pub positions: Vec<u32>,
}

impl ItemPositions {
    pub fn new<S, P>(uri: S, positions: P) -> Self
    where
        S: Into<String>,
        P: Into<Vec<u32>>,
    {
        Self {
            uri: uri.into(),
            positions: positions.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ReplaceItems<'a> {
    pub uris: Vec<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RemoveItems<'a, T> {
    pub tracks: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ItemUri<'a> {
    pub uri: &'a str,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ItemsReorder, PlaylistDetails, PlaylistItem};

    #[test]
    fn episode_items_have_no_track() {
        let item: PlaylistItem = serde_json::from_value(json!({
            "added_at": "2022-01-01T00:00:00Z",
            "added_by": null,
            "is_local": false,
            "track": { "type": "episode", "id": "1", "name": "Episode" }
        }))
        .unwrap();

        assert_eq!(item.track, None);
        assert_eq!(item.added_at.as_deref(), Some("2022-01-01T00:00:00Z"));
    }

    #[test]
    fn only_set_details_are_serialized() {
        let details = PlaylistDetails::new().name("New name").public(false);

        assert_eq!(
            serde_json::to_value(&details).unwrap(),
            json!({ "name": "New name", "public": false })
        );
        assert!(PlaylistDetails::new().is_empty());
    }

    #[test]
    fn reorder_without_optional_fields() {
        assert_eq!(
            serde_json::to_value(ItemsReorder::new(4, 0)).unwrap(),
            json!({ "range_start": 4, "insert_before": 0 })
        );
        assert_eq!(
            serde_json::to_value(ItemsReorder::new(4, 0).range_length(2).snapshot_id("abc")).unwrap(),
            json!({ "range_start": 4, "insert_before": 0, "range_length": 2, "snapshot_id": "abc" })
        );
    }
}
