//! The current user's library. Reading it requires the `user-library-read`
//! [scope](crate::scope::Scope::UserLibraryRead) and changing it the `user-library-modify`
//! [scope](crate::scope::Scope::UserLibraryModify).

use reqwest::Method;

use crate::{
    client::request_builder::{validate, BaseRequestBuilderContainer, PagedRequestBuilder, RequestBuilder},
    http::HttpClient,
    model::{album::SavedAlbum, page::Page, track::SavedTrack},
    transport::Transport,
};

const URIS_QUERY: &str = "uris";

/// Library endpoints. Returned from [SpotifyClient::library](crate::client::SpotifyClient::library).
///
/// Items are saved, removed and checked by their Spotify URIs, so tracks, albums, shows, episodes and audiobooks may be
/// mixed in one request.
#[derive(Debug)]
pub struct LibraryService<'a, C>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
}

impl<'a, C> LibraryService<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(transport: &'a Transport<C>) -> Self {
        Self { transport }
    }

    /// Save up to 40 items to the library.
    pub fn save_items<S>(&self, uris: &[S]) -> RequestBuilder<'a, C, ()>
    where
        S: AsRef<str>,
    {
        self.uris_request(Method::PUT, "me/library", uris)
    }

    /// Remove up to 40 items from the library.
    pub fn remove_items<S>(&self, uris: &[S]) -> RequestBuilder<'a, C, ()>
    where
        S: AsRef<str>,
    {
        self.uris_request(Method::DELETE, "me/library", uris)
    }

    /// Check whether up to 40 items are in the library. The result is in the same order as the given URIs.
    pub fn contains<S>(&self, uris: &[S]) -> RequestBuilder<'a, C, Vec<bool>>
    where
        S: AsRef<str>,
    {
        self.uris_request(Method::GET, "me/library/contains", uris)
    }

    /// Get a page of the tracks in the library.
    pub fn saved_tracks(&self) -> PagedRequestBuilder<'a, C, Page<SavedTrack>> {
        PagedRequestBuilder::from_base_builder(RequestBuilder::new(self.transport, Method::GET, "me/tracks"))
    }

    /// Get a page of the albums in the library.
    pub fn saved_albums(&self) -> PagedRequestBuilder<'a, C, Page<SavedAlbum>> {
        PagedRequestBuilder::from_base_builder(RequestBuilder::new(self.transport, Method::GET, "me/albums"))
    }

    fn uris_request<S, TResponse>(&self, method: Method, path: &str, uris: &[S]) -> RequestBuilder<'a, C, TResponse>
    where
        S: AsRef<str>,
    {
        RequestBuilder::new(self.transport, method, path)
            .validate(validate::library_uris(uris))
            .query(URIS_QUERY, validate::joined(uris))
    }
}
