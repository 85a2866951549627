use reqwest::Method;

use crate::{
    client::{
        request_builder::{
            segment, validate, BaseRequestBuilderContainer, CatalogItemRequestBuilder, PagedRequestBuilder,
            RequestBuilder,
        },
        IDS_QUERY,
    },
    http::HttpClient,
    model::{
        album::{Album, Albums, NewReleases, SimplifiedAlbum},
        page::Page,
        track::SimplifiedTrack,
    },
    transport::Transport,
};

/// The most albums that can be retrieved in one request.
pub const MAX_SEVERAL_ALBUMS: usize = 20;

/// Album endpoints. Returned from [SpotifyClient::albums](crate::client::SpotifyClient::albums).
#[derive(Debug)]
pub struct AlbumService<'a, C>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
}

impl<'a, C> AlbumService<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(transport: &'a Transport<C>) -> Self {
        Self { transport }
    }

    /// Get an album by its Spotify ID.
    pub fn get(&self, id: &str) -> CatalogItemRequestBuilder<'a, C, Album> {
        CatalogItemRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("albums/{}", segment(id)))
                .validate(validate::id(id, "album ID")),
        )
    }

    /// Get up to 20 albums by their Spotify IDs.
    pub fn several<S>(&self, ids: &[S]) -> CatalogItemRequestBuilder<'a, C, Albums, Vec<Album>>
    where
        S: AsRef<str>,
    {
        CatalogItemRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, "albums")
                .validate(validate::ids(ids, "album IDs", MAX_SEVERAL_ALBUMS))
                .query(IDS_QUERY, validate::joined(ids)),
        )
    }

    /// Get a page of an album's tracks.
    pub fn tracks(&self, id: &str) -> PagedRequestBuilder<'a, C, Page<SimplifiedTrack>> {
        PagedRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("albums/{}/tracks", segment(id)))
                .validate(validate::id(id, "album ID")),
        )
    }

    /// Get a page of new album releases featured in Spotify.
    pub fn new_releases(&self) -> PagedRequestBuilder<'a, C, NewReleases, Page<SimplifiedAlbum>> {
        PagedRequestBuilder::from_base_builder(RequestBuilder::new(
            self.transport,
            Method::GET,
            "browse/new-releases",
        ))
    }
}
