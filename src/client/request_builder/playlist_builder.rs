use crate::{
    client::{
        request_builder::{BaseRequestBuilderContainer, RequestBuilder},
        FIELDS_QUERY, MARKET_QUERY,
    },
    http::HttpClient,
};

/// A builder type for retrieving a playlist.
pub struct PlaylistRequestBuilder<'a, C, TResponse, TReturn = TResponse>(RequestBuilder<'a, C, TResponse, TReturn>)
where
    C: HttpClient;

impl<'a, C, TResponse, TReturn> BaseRequestBuilderContainer<'a, C, TResponse, TReturn>
    for PlaylistRequestBuilder<'a, C, TResponse, TReturn>
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

impl<'a, C, TResponse, TReturn> PlaylistRequestBuilder<'a, C, TResponse, TReturn>
where
    C: HttpClient,
{
    /// Specify a target market as an ISO 3166-1 alpha-2 country code.
    pub fn market<S>(self, market: S) -> Self
    where
        S: AsRef<str>,
    {
        self.append_query(MARKET_QUERY, market.as_ref())
    }

    /// Return only the given fields, for example `name,tracks.items(added_at,track(name))`. Fields that are filtered
    /// out deserialize as their default value, so only fields that are optional in
    /// [Playlist](crate::model::playlist::Playlist) may be left out.
    pub fn fields<S>(self, fields: S) -> Self
    where
        S: AsRef<str>,
    {
        self.append_query(FIELDS_QUERY, fields.as_ref())
    }
}
