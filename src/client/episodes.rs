use reqwest::Method;

use crate::{
    client::request_builder::{
        segment, validate, BaseRequestBuilderContainer, CatalogItemRequestBuilder, PagedRequestBuilder, RequestBuilder,
    },
    http::HttpClient,
    model::{
        page::Page,
        show::{Episode, SavedEpisode},
    },
    transport::Transport,
};

/// Episode endpoints. Returned from [SpotifyClient::episodes](crate::client::SpotifyClient::episodes).
#[derive(Debug)]
pub struct EpisodeService<'a, C>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
}

impl<'a, C> EpisodeService<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(transport: &'a Transport<C>) -> Self {
        Self { transport }
    }

    pub fn get(&self, id: &str) -> CatalogItemRequestBuilder<'a, C, Episode> {
        CatalogItemRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("episodes/{}", segment(id)))
                .validate(validate::id(id, "episode ID")),
        )
    }

    /// Get a page of the episodes in the current user's library.
    pub fn saved(&self) -> PagedRequestBuilder<'a, C, Page<SavedEpisode>> {
        PagedRequestBuilder::from_base_builder(RequestBuilder::new(self.transport, Method::GET, "me/episodes"))
    }
}
