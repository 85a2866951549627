use crate::{
    client::{
        request_builder::{validate, BaseRequestBuilderContainer, RequestBuilder},
        LIMIT_QUERY, MARKET_QUERY, OFFSET_QUERY,
    },
    http::HttpClient,
};

/// A builder type for requests that return a [Page](crate::model::page::Page) of items.
pub struct PagedRequestBuilder<'a, C, TResponse, TReturn = TResponse>(RequestBuilder<'a, C, TResponse, TReturn>)
where
    C: HttpClient;

impl<'a, C, TResponse, TReturn> BaseRequestBuilderContainer<'a, C, TResponse, TReturn>
    for PagedRequestBuilder<'a, C, TResponse, TReturn>
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

impl<'a, C, TResponse, TReturn> PagedRequestBuilder<'a, C, TResponse, TReturn>
where
    C: HttpClient,
{
    /// The maximum number of items to return.
    ///
    /// Default: 20. Minimum: 1. Maximum: 50.
    pub fn limit(self, limit: u32) -> Self {
        self.check(validate::limit(limit)).append_query(LIMIT_QUERY, limit)
    }

    /// The index of the first item to return. By combining this with [limit](PagedRequestBuilder::limit), you may
    /// request new pages of content.
    ///
    /// Default: 0.
    pub fn offset(self, offset: u32) -> Self {
        self.append_query(OFFSET_QUERY, offset)
    }

    /// Specify a target market as an ISO 3166-1 alpha-2 country code. Only content that is available in that market
    /// will be returned.
    pub fn market<S>(self, market: S) -> Self
    where
        S: AsRef<str>,
    {
        self.append_query(MARKET_QUERY, market.as_ref())
    }
}
