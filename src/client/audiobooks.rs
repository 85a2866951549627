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
        audiobook::{Audiobook, Audiobooks, SimplifiedChapter},
        page::Page,
    },
    transport::Transport,
};

/// The most audiobooks that can be retrieved in one request.
pub const MAX_SEVERAL_AUDIOBOOKS: usize = 50;

/// Audiobook endpoints. Audiobooks are only available in some markets. Returned from
/// [SpotifyClient::audiobooks](crate::client::SpotifyClient::audiobooks).
#[derive(Debug)]
pub struct AudiobookService<'a, C>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
}

impl<'a, C> AudiobookService<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(transport: &'a Transport<C>) -> Self {
        Self { transport }
    }

    pub fn get(&self, id: &str) -> CatalogItemRequestBuilder<'a, C, Audiobook> {
        CatalogItemRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("audiobooks/{}", segment(id)))
                .validate(validate::id(id, "audiobook ID")),
        )
    }

    /// Get up to 50 audiobooks by their Spotify IDs. Audiobooks that aren't available are `None`.
    pub fn several<S>(&self, ids: &[S]) -> CatalogItemRequestBuilder<'a, C, Audiobooks, Vec<Option<Audiobook>>>
    where
        S: AsRef<str>,
    {
        CatalogItemRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, "audiobooks")
                .validate(validate::ids(ids, "audiobook IDs", MAX_SEVERAL_AUDIOBOOKS))
                .query(IDS_QUERY, validate::joined(ids)),
        )
    }

    /// Get a page of an audiobook's chapters.
    pub fn chapters(&self, id: &str) -> PagedRequestBuilder<'a, C, Page<SimplifiedChapter>> {
        PagedRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("audiobooks/{}/chapters", segment(id)))
                .validate(validate::id(id, "audiobook ID")),
        )
    }
}
