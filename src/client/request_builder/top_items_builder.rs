use crate::{
    client::{
        request_builder::{validate, BaseRequestBuilderContainer, RequestBuilder},
        LIMIT_QUERY, OFFSET_QUERY,
    },
    http::HttpClient,
    model::user::TimeRange,
};

const TIME_RANGE_QUERY: &str = "time_range";

/// A builder for the current user's top artists or tracks.
pub struct TopItemsRequestBuilder<'a, C, TResponse, TReturn = TResponse>(RequestBuilder<'a, C, TResponse, TReturn>)
where
    C: HttpClient;

impl<'a, C, TResponse, TReturn> BaseRequestBuilderContainer<'a, C, TResponse, TReturn>
    for TopItemsRequestBuilder<'a, C, TResponse, TReturn>
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

impl<'a, C, TResponse, TReturn> TopItemsRequestBuilder<'a, C, TResponse, TReturn>
where
    C: HttpClient,
{
    /// Over what time frame the affinities are computed.
    ///
    /// Default: [TimeRange::MediumTerm].
    pub fn time_range(self, time_range: TimeRange) -> Self {
        self.append_query(TIME_RANGE_QUERY, time_range)
    }

    /// Default: 20. Minimum: 1. Maximum: 50.
    pub fn limit(self, limit: u32) -> Self {
        self.check(validate::limit(limit)).append_query(LIMIT_QUERY, limit)
    }

    /// Default: 0.
    pub fn offset(self, offset: u32) -> Self {
        self.append_query(OFFSET_QUERY, offset)
    }
}
