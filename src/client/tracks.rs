use reqwest::Method;

use crate::{
    client::{
        request_builder::{segment, validate, BaseRequestBuilderContainer, CatalogItemRequestBuilder, RequestBuilder},
        IDS_QUERY,
    },
    http::HttpClient,
    model::track::{Track, Tracks},
    transport::Transport,
};

/// The most tracks that can be retrieved in one request.
pub const MAX_SEVERAL_TRACKS: usize = 50;

/// Track endpoints. Returned from [SpotifyClient::tracks](crate::client::SpotifyClient::tracks).
#[derive(Debug)]
pub struct TrackService<'a, C>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
}

impl<'a, C> TrackService<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(transport: &'a Transport<C>) -> Self {
        Self { transport }
    }

    /// Get a track by its Spotify ID. If a market is given, the track may be relinked to a version of it that's
    /// playable in that market.
    pub fn get(&self, id: &str) -> CatalogItemRequestBuilder<'a, C, Track> {
        CatalogItemRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("tracks/{}", segment(id)))
                .validate(validate::id(id, "track ID")),
        )
    }

    /// Get up to 50 tracks by their Spotify IDs.
    pub fn several<S>(&self, ids: &[S]) -> CatalogItemRequestBuilder<'a, C, Tracks, Vec<Track>>
    where
        S: AsRef<str>,
    {
        CatalogItemRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, "tracks")
                .validate(validate::ids(ids, "track IDs", MAX_SEVERAL_TRACKS))
                .query(IDS_QUERY, validate::joined(ids)),
        )
    }
}
