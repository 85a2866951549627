use crate::{
    client::{
        request_builder::{validate, BaseRequestBuilderContainer, RequestBuilder},
        LIMIT_QUERY,
    },
    http::HttpClient,
};

const AFTER_QUERY: &str = "after";

/// A builder type for requests that return a [CursorPage](crate::model::page::CursorPage) of items.
pub struct CursorPagedRequestBuilder<'a, C, TResponse, TReturn = TResponse>(RequestBuilder<'a, C, TResponse, TReturn>)
where
    C: HttpClient;

impl<'a, C, TResponse, TReturn> BaseRequestBuilderContainer<'a, C, TResponse, TReturn>
    for CursorPagedRequestBuilder<'a, C, TResponse, TReturn>
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

impl<'a, C, TResponse, TReturn> CursorPagedRequestBuilder<'a, C, TResponse, TReturn>
where
    C: HttpClient,
{
    /// Return the items after this cursor. The cursor of the next page is in the previous page's
    /// [after](crate::model::page::CursorPage::after).
    pub fn after<S>(self, after: S) -> Self
    where
        S: AsRef<str>,
    {
        self.append_query(AFTER_QUERY, after.as_ref())
    }

    /// Default: 20. Minimum: 1. Maximum: 50.
    pub fn limit(self, limit: u32) -> Self {
        self.check(validate::limit(limit)).append_query(LIMIT_QUERY, limit)
    }
}
