use reqwest::Method;

use crate::{
    client::{
        request_builder::{
            segment, validate, ArtistAlbumsRequestBuilder, BaseRequestBuilderContainer, CatalogItemRequestBuilder,
            RequestBuilder,
        },
        IDS_QUERY, MARKET_QUERY,
    },
    http::HttpClient,
    model::{
        album::SimplifiedAlbum,
        artist::{Artist, Artists, TopTracks},
        page::Page,
        track::Track,
    },
    transport::Transport,
};

/// The most artists that can be retrieved in one request.
pub const MAX_SEVERAL_ARTISTS: usize = 50;

/// Artist endpoints. Returned from [SpotifyClient::artists](crate::client::SpotifyClient::artists).
#[derive(Debug)]
pub struct ArtistService<'a, C>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
}

impl<'a, C> ArtistService<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(transport: &'a Transport<C>) -> Self {
        Self { transport }
    }

    pub fn get(&self, id: &str) -> RequestBuilder<'a, C, Artist> {
        RequestBuilder::new(self.transport, Method::GET, format!("artists/{}", segment(id)))
            .validate(validate::id(id, "artist ID"))
    }

    /// Get up to 50 artists by their Spotify IDs.
    pub fn several<S>(&self, ids: &[S]) -> RequestBuilder<'a, C, Artists, Vec<Artist>>
    where
        S: AsRef<str>,
    {
        RequestBuilder::new(self.transport, Method::GET, "artists")
            .validate(validate::ids(ids, "artist IDs", MAX_SEVERAL_ARTISTS))
            .query(IDS_QUERY, validate::joined(ids))
    }

    /// Get a page of an artist's albums.
    pub fn albums(&self, id: &str) -> ArtistAlbumsRequestBuilder<'a, C, Page<SimplifiedAlbum>> {
        ArtistAlbumsRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("artists/{}/albums", segment(id)))
                .validate(validate::id(id, "artist ID")),
        )
    }

    /// Get an artist's top tracks in the given market.
    pub fn top_tracks(&self, id: &str, market: &str) -> CatalogItemRequestBuilder<'a, C, TopTracks, Vec<Track>> {
        CatalogItemRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("artists/{}/top-tracks", segment(id)))
                .validate(validate::id(id, "artist ID"))
                .validate(validate::non_empty(market, "market"))
                .query(MARKET_QUERY, market),
        )
    }
}
