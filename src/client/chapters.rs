use reqwest::Method;

use crate::{
    client::{
        request_builder::{segment, validate, BaseRequestBuilderContainer, CatalogItemRequestBuilder, RequestBuilder},
        IDS_QUERY,
    },
    http::HttpClient,
    model::audiobook::{Chapter, Chapters},
    transport::Transport,
};

/// The most chapters that can be retrieved in one request.
pub const MAX_SEVERAL_CHAPTERS: usize = 50;

/// Audiobook chapter endpoints. Returned from [SpotifyClient::chapters](crate::client::SpotifyClient::chapters).
#[derive(Debug)]
pub struct ChapterService<'a, C>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
}

impl<'a, C> ChapterService<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(transport: &'a Transport<C>) -> Self {
        Self { transport }
    }

    pub fn get(&self, id: &str) -> CatalogItemRequestBuilder<'a, C, Chapter> {
        CatalogItemRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("chapters/{}", segment(id)))
                .validate(validate::id(id, "chapter ID")),
        )
    }

    /// Get up to 50 chapters by their Spotify IDs. Chapters that aren't available are `None`.
    pub fn several<S>(&self, ids: &[S]) -> CatalogItemRequestBuilder<'a, C, Chapters, Vec<Option<Chapter>>>
    where
        S: AsRef<str>,
    {
        CatalogItemRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, "chapters")
                .validate(validate::ids(ids, "chapter IDs", MAX_SEVERAL_CHAPTERS))
                .query(IDS_QUERY, validate::joined(ids)),
        )
    }
}
