use reqwest::Method;

use crate::{
    client::request_builder::{
        segment, validate, BaseRequestBuilderContainer, CatalogItemRequestBuilder, PagedRequestBuilder, RequestBuilder,
    },
    http::HttpClient,
    model::{
        page::Page,
        show::{SavedShow, Show, SimplifiedEpisode},
    },
    transport::Transport,
};

/// Show (podcast) endpoints. Returned from [SpotifyClient::shows](crate::client::SpotifyClient::shows).
#[derive(Debug)]
pub struct ShowService<'a, C>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
}

impl<'a, C> ShowService<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(transport: &'a Transport<C>) -> Self {
        Self { transport }
    }

    pub fn get(&self, id: &str) -> CatalogItemRequestBuilder<'a, C, Show> {
        CatalogItemRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("shows/{}", segment(id)))
                .validate(validate::id(id, "show ID")),
        )
    }

    /// Get a page of a show's episodes.
    pub fn episodes(&self, id: &str) -> PagedRequestBuilder<'a, C, Page<SimplifiedEpisode>> {
        PagedRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, format!("shows/{}/episodes", segment(id)))
                .validate(validate::id(id, "show ID")),
        )
    }

    /// Get a page of the shows in the current user's library. Requires the `user-library-read`
    /// [scope](crate::scope::Scope::UserLibraryRead).
    pub fn saved(&self) -> PagedRequestBuilder<'a, C, Page<SavedShow>> {
        PagedRequestBuilder::from_base_builder(RequestBuilder::new(self.transport, Method::GET, "me/shows"))
    }
}
