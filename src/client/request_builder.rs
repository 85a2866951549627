//! Typed request builders returned from the service methods. A request is sent with
//! [send_async](AsyncRequestBuilder::send_async) or [send_sync](SyncRequestBuilder::send_sync).

mod artist_albums_builder;
mod catalog_item_builder;
mod cursor_paged_builder;
mod paged_builder;
mod playlist_builder;
mod search_builder;
mod top_items_builder;

mod private {
    use super::RequestBuilder;
    use crate::{error::Result, http::HttpClient};

    pub trait BaseRequestBuilderContainer<'a, C, TResponse, TReturn>
    where
        Self: Sized,
        C: HttpClient,
    {
        fn from_base_builder(base: RequestBuilder<'a, C, TResponse, TReturn>) -> Self;
        fn take_base_builder(self) -> RequestBuilder<'a, C, TResponse, TReturn>;
        fn get_base_builder_mut(&mut self) -> &mut RequestBuilder<'a, C, TResponse, TReturn>;

        /// Set a query parameter, replacing an earlier value for the same key.
        fn append_query<S>(mut self, key: &'static str, value: S) -> Self
        where
            S: ToString,
        {
            self.get_base_builder_mut().options.push_query(key, value.to_string());
            self
        }

        fn check(self, check: Result<()>) -> Self {
            Self::from_base_builder(self.take_base_builder().validate(check))
        }
    }
}

use std::{fmt, marker::PhantomData, time::Duration};

use log::trace;
use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, NON_ALPHANUMERIC};
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

pub use self::{
    artist_albums_builder::ArtistAlbumsRequestBuilder, catalog_item_builder::CatalogItemRequestBuilder,
    cursor_paged_builder::CursorPagedRequestBuilder, paged_builder::PagedRequestBuilder,
    playlist_builder::PlaylistRequestBuilder, search_builder::SearchRequestBuilder,
    top_items_builder::TopItemsRequestBuilder,
};
pub(crate) use self::private::BaseRequestBuilderContainer;
#[cfg(feature = "async")]
use crate::http::AsyncClient;
#[cfg(feature = "sync")]
use crate::http::SyncClient;
use crate::{
    error::{Error, Result},
    http::HttpClient,
    transport::{RequestOptions, Transport},
};

/// Characters other than these are percent-encoded in path segments.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Encodes a value, like an ID, for use as a single path segment.
pub(crate) fn segment(value: &str) -> PercentEncode<'_> {
    utf8_percent_encode(value, PATH_SEGMENT)
}

/// Options available in each request builder.
pub trait BaseRequestBuilder<'a, C, TResponse, TReturn>
where
    Self: private::BaseRequestBuilderContainer<'a, C, TResponse, TReturn>,
    C: HttpClient,
{
    /// Time out each attempt of this request after `timeout` instead of the client's timeout.
    fn timeout(mut self, timeout: Duration) -> Self {
        self.get_base_builder_mut().options.set_timeout(timeout);
        self
    }

    /// Retry this request at most `max_retries` times instead of using the client's retry budget.
    fn max_retries(mut self, max_retries: u32) -> Self {
        self.get_base_builder_mut().options.set_max_retries(max_retries);
        self
    }
}

/// Asynchronous request builder functionality, namely sending the request and processing its response asynchronously.
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait AsyncRequestBuilder<'a, TResponse, TReturn>
where
    Self: BaseRequestBuilder<'a, AsyncClient, TResponse, TReturn> + Send,
    TResponse: DeserializeOwned + Send,
    TReturn: From<TResponse> + Send,
{
    async fn send_async(self) -> Result<TReturn> {
        self.take_base_builder().execute_async().await
    }
}

/// Synchronous request builder functionality, namely sending the request and processing its response synchronously.
#[cfg(feature = "sync")]
pub trait SyncRequestBuilder<'a, TResponse, TReturn>
where
    Self: BaseRequestBuilder<'a, SyncClient, TResponse, TReturn>,
    TResponse: DeserializeOwned,
    TReturn: From<TResponse>,
{
    fn send_sync(self) -> Result<TReturn> {
        self.take_base_builder().execute_sync()
    }
}

/// A "base" request builder that doesn't include any special functionality. The commonly available options are
/// available in the [BaseRequestBuilder]-trait.
///
/// The response is deserialized into `TResponse` and then converted into `TReturn`.
pub struct RequestBuilder<'a, C, TResponse, TReturn = TResponse>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
    method: Method,
    path: String,
    options: RequestOptions,
    // input errors are deferred until the request is sent so every service method can return a builder
    validation_error: Option<Error>,

    phantom: PhantomData<fn() -> (TResponse, TReturn)>,
}

impl<'a, C, TResponse, TReturn> RequestBuilder<'a, C, TResponse, TReturn>
where
    C: HttpClient,
{
    pub(crate) fn new<S>(transport: &'a Transport<C>, method: Method, path: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            transport,
            method,
            path: path.into(),
            options: RequestOptions::default(),
            validation_error: None,
            phantom: PhantomData,
        }
    }

    /// Record the result of an input check. The first failing check is returned when the request is sent, without
    /// sending anything.
    pub(crate) fn validate(self, check: Result<()>) -> Self {
        match (self.validation_error, check) {
            (None, Err(err)) => Self {
                validation_error: Some(err),
                ..self
            },
            (validation_error, _) => Self {
                validation_error,
                ..self
            },
        }
    }

    pub(crate) fn query<S>(mut self, key: &'static str, value: S) -> Self
    where
        S: ToString,
    {
        self.options.push_query(key, value.to_string());
        self
    }

    pub(crate) fn json_body<T>(mut self, body: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        let options = std::mem::take(&mut self.options);

        match options.json(body) {
            Ok(options) => Self { options, ..self },
            Err(err) => self.validate(Err(err)),
        }
    }

    pub(crate) fn raw_body<B>(self, content_type: &'static str, data: B) -> Self
    where
        B: Into<Vec<u8>>,
    {
        Self {
            options: self.options.raw_body(content_type, data),
            ..self
        }
    }
}

#[cfg(feature = "async")]
impl<'a, TResponse, TReturn> RequestBuilder<'a, AsyncClient, TResponse, TReturn>
where
    TResponse: DeserializeOwned,
    TReturn: From<TResponse>,
{
    async fn execute_async(self) -> Result<TReturn> {
        if let Some(err) = self.validation_error {
            return Err(err);
        }

        let response = self
            .transport
            .request_async(self.method, &self.path, self.options)
            .await?;

        trace!("Response: {response:?}");
        Ok(response.deserialize::<TResponse>()?.into())
    }
}

#[cfg(feature = "sync")]
impl<'a, TResponse, TReturn> RequestBuilder<'a, SyncClient, TResponse, TReturn>
where
    TResponse: DeserializeOwned,
    TReturn: From<TResponse>,
{
    fn execute_sync(self) -> Result<TReturn> {
        if let Some(err) = self.validation_error {
            return Err(err);
        }

        let response = self.transport.request_sync(self.method, &self.path, self.options)?;

        trace!("Response: {response:?}");
        Ok(response.deserialize::<TResponse>()?.into())
    }
}

impl<'a, C, TResponse, TReturn> private::BaseRequestBuilderContainer<'a, C, TResponse, TReturn>
    for RequestBuilder<'a, C, TResponse, TReturn>
where
    C: HttpClient,
{
    fn from_base_builder(base: RequestBuilder<'a, C, TResponse, TReturn>) -> Self {
        base
    }

    fn take_base_builder(self) -> RequestBuilder<'a, C, TResponse, TReturn> {
        self
    }

    fn get_base_builder_mut(&mut self) -> &mut RequestBuilder<'a, C, TResponse, TReturn> {
        self
    }
}

impl<'a, C, TResponse, TReturn> fmt::Debug for RequestBuilder<'a, C, TResponse, TReturn>
where
    C: HttpClient,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("options", &self.options)
            .field("validation_error", &self.validation_error)
            .finish_non_exhaustive()
    }
}

impl<'a, TBuilder, C, TResponse, TReturn> BaseRequestBuilder<'a, C, TResponse, TReturn> for TBuilder
where
    TBuilder: BaseRequestBuilderContainer<'a, C, TResponse, TReturn>,
    C: HttpClient,
{
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<'a, TBuilder, TResponse, TReturn> AsyncRequestBuilder<'a, TResponse, TReturn> for TBuilder
where
    TBuilder: BaseRequestBuilder<'a, AsyncClient, TResponse, TReturn> + Send,
    TResponse: DeserializeOwned + Send,
    TReturn: From<TResponse> + Send,
{
}

#[cfg(feature = "sync")]
impl<'a, TBuilder, TResponse, TReturn> SyncRequestBuilder<'a, TResponse, TReturn> for TBuilder
where
    TBuilder: BaseRequestBuilder<'a, SyncClient, TResponse, TReturn>,
    TResponse: DeserializeOwned,
    TReturn: From<TResponse>,
{
}

/// Input checks shared by the services.
pub(crate) mod validate {
    use crate::error::{Error, Result};

    /// The most items a playlist can be changed by in one request.
    pub const MAX_PLAYLIST_ITEMS: usize = 100;
    /// The most items that can be saved to, removed from or checked in the library in one request.
    pub const MAX_LIBRARY_ITEMS: usize = 40;
    const MAX_LIMIT: u32 = 50;

    pub fn non_empty(value: &str, name: &str) -> Result<()> {
        if value.trim().is_empty() {
            Err(Error::Configuration(format!("{name} must not be empty")))
        } else {
            Ok(())
        }
    }

    /// An ID is placed in the path, so it can't be empty or a dot segment.
    pub fn id(value: &str, name: &str) -> Result<()> {
        non_empty(value, name)?;

        if value == "." || value == ".." {
            Err(Error::Configuration(format!("{name} must not be {value}")))
        } else {
            Ok(())
        }
    }

    pub fn ids<S>(ids: &[S], name: &str, max: usize) -> Result<()>
    where
        S: AsRef<str>,
    {
        if ids.is_empty() {
            return Err(Error::Configuration(format!("{name} must not be empty")));
        }

        if ids.len() > max {
            return Err(Error::Configuration(format!(
                "at most {max} {name} may be given, got {}",
                ids.len()
            )));
        }

        if ids.iter().any(|id| id.as_ref().trim().is_empty()) {
            return Err(Error::Configuration(format!("{name} must not contain empty values")));
        }

        Ok(())
    }

    pub fn item_uris<S>(uris: &[S]) -> Result<()>
    where
        S: AsRef<str>,
    {
        spotify_uris(uris, MAX_PLAYLIST_ITEMS)
    }

    pub fn library_uris<S>(uris: &[S]) -> Result<()>
    where
        S: AsRef<str>,
    {
        spotify_uris(uris, MAX_LIBRARY_ITEMS)
    }

    fn spotify_uris<S>(uris: &[S], max: usize) -> Result<()>
    where
        S: AsRef<str>,
    {
        ids(uris, "uris", max)?;

        match uris.iter().find(|uri| !uri.as_ref().starts_with("spotify:")) {
            Some(uri) => Err(Error::Configuration(format!(
                "invalid item URI {}: URIs must start with spotify:",
                uri.as_ref()
            ))),
            None => Ok(()),
        }
    }

    pub fn limit(limit: u32) -> Result<()> {
        limit_within(limit, 1)
    }

    /// Search accepts a limit of 0, which returns only the totals.
    pub fn search_limit(limit: u32) -> Result<()> {
        limit_within(limit, 0)
    }

    fn limit_within(limit: u32, min: u32) -> Result<()> {
        if (min..=MAX_LIMIT).contains(&limit) {
            Ok(())
        } else {
            Err(Error::Configuration(format!(
                "limit must be between {min} and {MAX_LIMIT}, got {limit}"
            )))
        }
    }

    pub fn joined<S>(ids: &[S]) -> String
    where
        S: AsRef<str>,
    {
        ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn ids_are_checked() {
            assert!(ids(&["a", "b"], "ids", 20).is_ok());
            assert!(matches!(ids::<&str>(&[], "ids", 20), Err(Error::Configuration(_))));
            assert!(matches!(ids(&["a", ""], "ids", 20), Err(Error::Configuration(_))));
            assert!(matches!(ids(&["a"; 21], "ids", 20), Err(Error::Configuration(_))));
        }

        #[test]
        fn item_uris_must_be_spotify_uris() {
            assert!(item_uris(&["spotify:track:4iV5W9uYEdYUVa79Axb7Rh"]).is_ok());
            assert!(item_uris(&["https://open.spotify.com/track/4iV5W9uYEdYUVa79Axb7Rh"]).is_err());
            assert!(item_uris(&vec!["spotify:track:1"; 101]).is_err());
        }

        #[test]
        fn limit_range() {
            assert!(limit(1).is_ok());
            assert!(limit(50).is_ok());
            assert!(limit(0).is_err());
            assert!(limit(51).is_err());

            assert!(search_limit(0).is_ok());
            assert!(search_limit(50).is_ok());
            assert!(search_limit(51).is_err());
        }

        #[test]
        fn ids_in_paths() {
            assert!(id("4aawyAB9vmqN3uQ7FjRGTy", "album ID").is_ok());
            assert!(id("..", "album ID").is_err());
            assert!(id(".", "album ID").is_err());
            assert!(id(" ", "album ID").is_err());
        }

        #[test]
        fn library_uris_limit() {
            assert!(library_uris(&vec!["spotify:track:1"; 40]).is_ok());
            assert!(library_uris(&vec!["spotify:track:1"; 41]).is_err());
            assert!(library_uris(&["spotify:show:1", ""]).is_err());
        }

        #[test]
        fn join_ids() {
            assert_eq!(joined(&["a", "b", "c"]), "a,b,c");
        }
    }
}
