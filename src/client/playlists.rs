//! Playlist endpoints. Changing a playlist requires the `playlist-modify-public` or `playlist-modify-private`
//! [scope](crate::scope::Scope), depending on the playlist's visibility.

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Method;

use crate::{
    client::request_builder::{
        segment, validate, BaseRequestBuilderContainer, PagedRequestBuilder, PlaylistRequestBuilder, RequestBuilder,
    },
    error::{Error, Result},
    http::HttpClient,
    model::{
        page::Page,
        playlist::{
            AddItems, ItemPositions, ItemUri, ItemsReorder, NewPlaylist, Playlist, PlaylistDetails, PlaylistItem,
            RemoveItems, ReplaceItems, SimplifiedPlaylist,
        },
        Image, SnapshotId,
    },
    transport::Transport,
};

/// The largest cover image Spotify accepts, in base64-encoded bytes.
pub const MAX_COVER_IMAGE_SIZE: usize = 256 * 1024;

/// Playlist endpoints. Returned from [SpotifyClient::playlists](crate::client::SpotifyClient::playlists).
#[derive(Debug)]
pub struct PlaylistService<'a, C>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
}

impl<'a, C> PlaylistService<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(transport: &'a Transport<C>) -> Self {
        Self { transport }
    }

    pub fn get(&self, id: &str) -> PlaylistRequestBuilder<'a, C, Playlist> {
        PlaylistRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("playlists/{}", segment(id)))
                .validate(validate::id(id, "playlist ID")),
        )
    }

    /// Get a page of a playlist's items.
    pub fn items(&self, id: &str) -> PagedRequestBuilder<'a, C, Page<PlaylistItem>> {
        PagedRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("playlists/{}/tracks", segment(id)))
                .validate(validate::id(id, "playlist ID")),
        )
    }

    /// Get a page of the playlists the current user owns or follows.
    pub fn current_user(&self) -> PagedRequestBuilder<'a, C, Page<SimplifiedPlaylist>> {
        PagedRequestBuilder::from_base_builder(RequestBuilder::new(self.transport, Method::GET, "me/playlists"))
    }

    /// Get a page of the playlists a user owns or follows.
    pub fn for_user(&self, user_id: &str) -> PagedRequestBuilder<'a, C, Page<SimplifiedPlaylist>> {
        PagedRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("users/{}/playlists", segment(user_id)))
                .validate(validate::id(user_id, "user ID")),
        )
    }

    /// Create a playlist for a user. The playlist is empty and private unless specified otherwise.
    pub fn create(&self, user_id: &str, playlist: NewPlaylist) -> RequestBuilder<'a, C, Playlist> {
        let visibility_check = if playlist.collaborative == Some(true) && playlist.public != Some(false) {
            Err(Error::Configuration(
                "a collaborative playlist must be created with public set to false".to_owned(),
            ))
        } else {
            Ok(())
        };

        RequestBuilder::new(self.transport, Method::POST, format!("users/{}/playlists", segment(user_id)))
            .validate(validate::id(user_id, "user ID"))
            .validate(validate::non_empty(&playlist.name, "playlist name"))
            .validate(visibility_check)
            .json_body(&playlist)
    }

    /// Change a playlist's name, description or visibility.
    pub fn change_details(&self, id: &str, details: PlaylistDetails) -> RequestBuilder<'a, C, ()> {
        RequestBuilder::new(self.transport, Method::PUT, format!("playlists/{}", segment(id)))
            .validate(validate::id(id, "playlist ID"))
            .validate(check_details(&details))
            .json_body(&details)
    }

    /// Add up to 100 items to a playlist, either at the given position or at the end. Returns the playlist's new
    /// snapshot ID.
    pub fn add_items<S>(
        &self,
        id: &str,
        uris: &[S],
        position: Option<u32>,
    ) -> RequestBuilder<'a, C, SnapshotId, String>
    where
        S: AsRef<str>,
    {
        let body = AddItems {
            uris: uris.iter().map(AsRef::as_ref).collect(),
            position,
        };

        RequestBuilder::new(self.transport, Method::POST, format!("playlists/{}/tracks", segment(id)))
            .validate(validate::id(id, "playlist ID"))
            .validate(validate::item_uris(uris))
            .json_body(&body)
    }

    /// Remove every occurrence of up to 100 items from a playlist. If a snapshot ID is given, the items are removed
    /// from that version of the playlist. Returns the playlist's new snapshot ID.
    pub fn remove_items<S>(
        &self,
        id: &str,
        uris: &[S],
        snapshot_id: Option<&str>,
    ) -> RequestBuilder<'a, C, SnapshotId, String>
    where
        S: AsRef<str>,
    {
        let body = RemoveItems {
            tracks: uris.iter().map(|uri| ItemUri { uri: uri.as_ref() }).collect::<Vec<_>>(),
            snapshot_id,
        };

        RequestBuilder::new(self.transport, Method::DELETE, format!("playlists/{}/tracks", segment(id)))
            .validate(validate::id(id, "playlist ID"))
            .validate(validate::item_uris(uris))
            .json_body(&body)
    }

    /// Remove items from a playlist at the given zero-based positions. If a snapshot ID is given, the positions refer
    /// to that version of the playlist. Returns the playlist's new snapshot ID.
    pub fn remove_items_at(
        &self,
        id: &str,
        items: &[ItemPositions],
        snapshot_id: Option<&str>,
    ) -> RequestBuilder<'a, C, SnapshotId, String> {
        let body = RemoveItems {
            tracks: items,
            snapshot_id,
        };

        RequestBuilder::new(self.transport, Method::DELETE, format!("playlists/{}/tracks", segment(id)))
            .validate(validate::id(id, "playlist ID"))
            .validate(check_positions(items))
            .json_body(&body)
    }

    /// Replace all of a playlist's items with up to 100 items. An empty list clears the playlist. Returns the
    /// playlist's new snapshot ID.
    pub fn replace_items<S>(&self, id: &str, uris: &[S]) -> RequestBuilder<'a, C, SnapshotId, String>
    where
        S: AsRef<str>,
    {
        let body = ReplaceItems {
            uris: uris.iter().map(AsRef::as_ref).collect(),
        };
        let uris_check = if uris.is_empty() {
            Ok(())
        } else {
            validate::item_uris(uris)
        };

        RequestBuilder::new(self.transport, Method::PUT, format!("playlists/{}/tracks", segment(id)))
            .validate(validate::id(id, "playlist ID"))
            .validate(uris_check)
            .json_body(&body)
    }

    /// Move a range of a playlist's items to another position. Returns the playlist's new snapshot ID.
    pub fn reorder_items(&self, id: &str, reorder: ItemsReorder) -> RequestBuilder<'a, C, SnapshotId, String> {
        let range_check = if reorder.range_length == Some(0) {
            Err(Error::Configuration("range length must be at least 1".to_owned()))
        } else {
            Ok(())
        };

        RequestBuilder::new(self.transport, Method::PUT, format!("playlists/{}/tracks", segment(id)))
            .validate(validate::id(id, "playlist ID"))
            .validate(range_check)
            .json_body(&reorder)
    }

    /// Get a playlist's cover images.
    pub fn cover_image(&self, id: &str) -> RequestBuilder<'a, C, Vec<Image>> {
        RequestBuilder::new(self.transport, Method::GET, format!("playlists/{}/images", segment(id)))
            .validate(validate::id(id, "playlist ID"))
    }

    /// Replace a playlist's cover image with the given JPEG image. Requires the `ugc-image-upload`
    /// [scope](crate::scope::Scope::UgcImageUpload).
    pub fn upload_cover_image(&self, id: &str, jpeg: &[u8]) -> RequestBuilder<'a, C, ()> {
        let encoded = STANDARD.encode(jpeg);
        let image_check = if jpeg.is_empty() {
            Err(Error::Configuration("cover image must not be empty".to_owned()))
        } else if encoded.len() > MAX_COVER_IMAGE_SIZE {
            Err(Error::Configuration(format!(
                "cover image is {} bytes when encoded, at most {MAX_COVER_IMAGE_SIZE} is allowed",
                encoded.len()
            )))
        } else {
            Ok(())
        };

        RequestBuilder::new(self.transport, Method::PUT, format!("playlists/{}/images", segment(id)))
            .validate(validate::id(id, "playlist ID"))
            .validate(image_check)
            .raw_body("image/jpeg", encoded)
    }
}

fn check_details(details: &PlaylistDetails) -> Result<()> {
    if details.is_empty() {
        return Err(Error::Configuration(
            "at least one playlist detail must be changed".to_owned(),
        ));
    }

    if details.collaborative == Some(true) && details.public == Some(true) {
        return Err(Error::Configuration(
            "a playlist can't be both public and collaborative".to_owned(),
        ));
    }

    Ok(())
}

fn check_positions(items: &[ItemPositions]) -> Result<()> {
    let uris: Vec<&str> = items.iter().map(|item| item.uri.as_str()).collect();
    validate::item_uris(&uris)?;

    if items.iter().any(|item| item.positions.is_empty()) {
        return Err(Error::Configuration(
            "every item to remove must have at least one position".to_owned(),
        ));
    }

    Ok(())
}
