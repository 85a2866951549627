use crate::{
    client::{
        request_builder::{validate, BaseRequestBuilderContainer, RequestBuilder},
        LIMIT_QUERY, MARKET_QUERY, OFFSET_QUERY,
    },
    http::HttpClient,
};

const INCLUDE_EXTERNAL_QUERY: &str = "include_external";

/// A builder for a search in Spotify's catalog. New instances are returned by
/// [SearchService::search](crate::client::search::SearchService::search).
pub struct SearchRequestBuilder<'a, C, TResponse, TReturn = TResponse>(RequestBuilder<'a, C, TResponse, TReturn>)
where
    C: HttpClient;

impl<'a, C, TResponse, TReturn> BaseRequestBuilderContainer<'a, C, TResponse, TReturn>
    for SearchRequestBuilder<'a, C, TResponse, TReturn>
where
    C: HttpClient,
{
    fn from_base_builder(base: RequestBuilder<'a, C, TResponse, TReturn>) -> Self {
        Self(base)
    }

    fn take_base_builder(self) -> RequestBuilder<'a, C, TResponse, TReturn> {
        self.0
    }

    fn get_base_builder_mut(&mut self) -> &mut RequestBuilder<'a, C, TResponse, TReturn> {
        &mut self.0
    }
}

impl<'a, C, TResponse, TReturn> SearchRequestBuilder<'a, C, TResponse, TReturn>
where
    C: HttpClient,
{
    /// The maximum number of results to return in each item type.
    ///
    /// Default: 5. Minimum: 0. Maximum: 50. With a limit of 0 only the totals are returned.
    pub fn limit(self, limit: u32) -> Self {
        self.check(validate::search_limit(limit)).append_query(LIMIT_QUERY, limit)
    }

    /// The index of the first result to return. By combining this with [limit](SearchRequestBuilder::limit), you may
    /// request new pages of content.
    ///
    /// Default: 0.
    pub fn offset(self, offset: u32) -> Self {
        self.append_query(OFFSET_QUERY, offset)
    }

    /// Specify a country such that content that is available in that market will be returned. If using an
    /// user-authenticated client, the country associated with the corresponding user account will take priority over
    /// this parameter.
    pub fn market<S>(self, market: S) -> Self
    where
        S: AsRef<str>,
    {
        self.append_query(MARKET_QUERY, market.as_ref())
    }

    /// Whether externally hosted audio content is marked as playable in the response.
    pub fn include_external_audio(self, include: bool) -> Self {
        if include {
            self.append_query(INCLUDE_EXTERNAL_QUERY, "audio")
        } else {
            let mut builder = self;
            builder
                .get_base_builder_mut()
                .options
                .remove_query(INCLUDE_EXTERNAL_QUERY);
            builder
        }
    }
}
