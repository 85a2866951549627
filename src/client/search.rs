use reqwest::Method;

use crate::{
    client::{
        request_builder::{validate, BaseRequestBuilderContainer, RequestBuilder, SearchRequestBuilder},
        LIMIT_QUERY,
    },
    error::Error,
    http::HttpClient,
    model::search::{SearchResult, ToTypesString, DEFAULT_SEARCH_LIMIT},
    transport::Transport,
};

/// The search endpoint. Returned from [SpotifyClient::search](crate::client::SpotifyClient::search).
#[derive(Debug)]
pub struct SearchService<'a, C>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
}

impl<'a, C> SearchService<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(transport: &'a Transport<C>) -> Self {
        Self { transport }
    }

    /// Search Spotify's catalog for the given item types. The query may contain [field
    /// filters](https://developer.spotify.com/documentation/web-api/reference/search), like
    /// `artist:"Dream Theater" year:1992`.
    pub fn search<T>(&self, query: &str, types: T) -> SearchRequestBuilder<'a, C, SearchResult>
    where
        T: ToTypesString,
    {
        let types = types.to_types_string();
        let types_check = if types.is_empty() {
            Err(Error::Configuration("search types must not be empty".to_owned()))
        } else {
            Ok(())
        };

        SearchRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, "search")
                .validate(validate::non_empty(query, "search query"))
                .validate(types_check)
                .query("q", query)
                .query("type", types)
                .query(LIMIT_QUERY, DEFAULT_SEARCH_LIMIT),
        )
    }
}
