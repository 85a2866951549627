use crate::{
    client::{
        request_builder::{validate, BaseRequestBuilderContainer, RequestBuilder},
        LIMIT_QUERY, MARKET_QUERY, OFFSET_QUERY,
    },
    http::HttpClient,
    model::album::AlbumGroup,
};

const INCLUDE_GROUPS_QUERY: &str = "include_groups";

/// A builder for an artist's albums.
pub struct ArtistAlbumsRequestBuilder<'a, C, TResponse, TReturn = TResponse>(
    RequestBuilder<'a, C, TResponse, TReturn>,
)
where
    C: HttpClient;

impl<'a, C, TResponse, TReturn> BaseRequestBuilderContainer<'a, C, TResponse, TReturn>
    for ArtistAlbumsRequestBuilder<'a, C, TResponse, TReturn>
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

impl<'a, C, TResponse, TReturn> ArtistAlbumsRequestBuilder<'a, C, TResponse, TReturn>
where
    C: HttpClient,
{
    /// Only return albums in the given groups. By default, albums in all groups are returned.
    pub fn include_groups<I>(self, groups: I) -> Self
    where
        I: IntoIterator<Item = AlbumGroup>,
    {
        let groups = groups
            .into_iter()
            .map(|group| group.as_str())
            .collect::<Vec<_>>()
            .join(",");

        if groups.is_empty() {
            self
        } else {
            self.append_query(INCLUDE_GROUPS_QUERY, groups)
        }
    }

    /// Specify a target market as an ISO 3166-1 alpha-2 country code.
    pub fn market<S>(self, market: S) -> Self
    where
        S: AsRef<str>,
    {
        self.append_query(MARKET_QUERY, market.as_ref())
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
