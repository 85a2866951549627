use crate::{
    client::{
        request_builder::{BaseRequestBuilderContainer, RequestBuilder},
        MARKET_QUERY,
    },
    http::HttpClient,
};

/// A builder type for catalog item retrievals.
pub struct CatalogItemRequestBuilder<'a, C, TResponse, TReturn = TResponse>(RequestBuilder<'a, C, TResponse, TReturn>)
where
    C: HttpClient;

impl<'a, C, TResponse, TReturn> BaseRequestBuilderContainer<'a, C, TResponse, TReturn>
    for CatalogItemRequestBuilder<'a, C, TResponse, TReturn>
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

impl<'a, C, TResponse, TReturn> CatalogItemRequestBuilder<'a, C, TResponse, TReturn>
where
    C: HttpClient,
{
    /// Specify a target market as an ISO 3166-1 alpha-2 country code. Only content that is available in that market
    /// will be returned and track relinking may be applied.
    pub fn market<S>(self, market: S) -> Self
    where
        S: AsRef<str>,
    {
        self.append_query(MARKET_QUERY, market.as_ref())
    }
}
