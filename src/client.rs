//! Contains the [SpotifyClient] and its builder, and the per-resource services the client hands out.
//!
//! # Usage
//!
//! A client needs exactly one source of credentials:
//! - [an access token](SpotifyClientBuilder::access_token) that's used as-is and never refreshed,
//! - [an application's client ID and secret](SpotifyClientBuilder::client_credentials), used with the client
//!   credentials flow,
//! - or any [auth provider](crate::auth), such as the [authorization code
//!   provider](crate::auth::AuthorizationCode).
//!
//! If none is given, the client ID and secret are read from the `SPOTIFY_SDK_CLIENT_ID` and
//! `SPOTIFY_SDK_CLIENT_SECRET` environment variables.
//!
//! ```no_run
//! # #[cfg(feature = "sync")]
//! # fn foo() -> spotify_sdk::Result<()> {
//! use spotify_sdk::{client::SyncSpotifyClient, model::ItemType, prelude::*};
//!
//! let client = SyncSpotifyClient::from_client_credentials("client ID", "client secret")?;
//!
//! let results = client
//!     .search()
//!     .search("bury the light", [ItemType::Track])
//!     .limit(1)
//!     .send_sync()?;
//!
//! if let Some(track) = results.tracks.and_then(|page| page.items.into_iter().next()) {
//!     println!("{}", track.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod albums;
pub mod artists;
pub mod audiobooks;
pub mod chapters;
pub mod episodes;
pub mod library;
pub mod playlists;
pub mod request_builder;
pub mod search;
pub mod shows;
pub mod tracks;
pub mod users;

use std::{fmt, sync::Arc, time::Duration};

use log::debug;
use reqwest::Method;

use self::{
    albums::AlbumService, artists::ArtistService, audiobooks::AudiobookService, chapters::ChapterService,
    episodes::EpisodeService, library::LibraryService, playlists::PlaylistService, request_builder::RequestBuilder,
    search::SearchService, shows::ShowService, tracks::TrackService, users::UserService,
};
#[cfg(feature = "async")]
use crate::{auth::AsyncAuthProvider, http::AsyncClient};
#[cfg(feature = "sync")]
use crate::{auth::SyncAuthProvider, http::SyncClient};
use crate::{
    auth::{ClientCredentials, StaticToken},
    error::{Error, Result},
    http::{HttpClient, DEFAULT_TIMEOUT},
    model::page::Page,
    retry::RetryPolicy,
    transport::{Transport, API_BASE_URL},
};

pub(crate) const MARKET_QUERY: &str = "market";
pub(crate) const LIMIT_QUERY: &str = "limit";
pub(crate) const OFFSET_QUERY: &str = "offset";
pub(crate) const FIELDS_QUERY: &str = "fields";
pub(crate) const IDS_QUERY: &str = "ids";

/// Type alias for an asynchronous Spotify client. See [SpotifyClient].
#[cfg(feature = "async")]
pub type AsyncSpotifyClient = SpotifyClient<AsyncClient>;

/// Type alias for a synchronous Spotify client. See [SpotifyClient].
#[cfg(feature = "sync")]
pub type SyncSpotifyClient = SpotifyClient<SyncClient>;

/// Type alias for an asynchronous Spotify client builder. See [SpotifyClientBuilder].
#[cfg(feature = "async")]
pub type AsyncSpotifyClientBuilder = SpotifyClientBuilder<AsyncClient>;

/// Type alias for a synchronous Spotify client builder. See [SpotifyClientBuilder].
#[cfg(feature = "sync")]
pub type SyncSpotifyClientBuilder = SpotifyClientBuilder<SyncClient>;

/// A client for the Spotify Web API. See the [module-level documentation](self) for more information.
///
/// The client owns one [Transport] that every service sends its requests through. The services borrow the client,
/// so they are cheap to create on every call.
///
/// This struct is generic over its internal asynchronous/synchronous HTTP client. You cannot refer to the internal
/// client types directly, hence there are type aliases for both kinds of clients: [AsyncSpotifyClient] and
/// [SyncSpotifyClient].
#[derive(Debug)]
pub struct SpotifyClient<C>
where
    C: HttpClient,
{
    transport: Transport<C>,
}

/// Builder for [SpotifyClient].
pub struct SpotifyClientBuilder<C>
where
    C: HttpClient,
{
    access_token: Option<String>,
    client_credentials: Option<(String, String)>,
    auth_provider: Option<Arc<C::AuthProvider>>,
    timeout: Duration,
    retry_policy: RetryPolicy,
    base_url: Option<String>,
}

enum CredentialSource<P>
where
    P: ?Sized,
{
    AccessToken(String),
    ClientCredentials(Option<String>, Option<String>),
    Provider(Arc<P>),
}

impl<C> SpotifyClient<C>
where
    C: HttpClient,
{
    pub fn builder() -> SpotifyClientBuilder<C> {
        SpotifyClientBuilder::new()
    }

    pub fn albums(&self) -> AlbumService<'_, C> {
        AlbumService::new(&self.transport)
    }

    pub fn artists(&self) -> ArtistService<'_, C> {
        ArtistService::new(&self.transport)
    }

    pub fn tracks(&self) -> TrackService<'_, C> {
        TrackService::new(&self.transport)
    }

    pub fn shows(&self) -> ShowService<'_, C> {
        ShowService::new(&self.transport)
    }

    pub fn episodes(&self) -> EpisodeService<'_, C> {
        EpisodeService::new(&self.transport)
    }

    pub fn audiobooks(&self) -> AudiobookService<'_, C> {
        AudiobookService::new(&self.transport)
    }

    pub fn chapters(&self) -> ChapterService<'_, C> {
        ChapterService::new(&self.transport)
    }

    pub fn playlists(&self) -> PlaylistService<'_, C> {
        PlaylistService::new(&self.transport)
    }

    pub fn library(&self) -> LibraryService<'_, C> {
        LibraryService::new(&self.transport)
    }

    pub fn search(&self) -> SearchService<'_, C> {
        SearchService::new(&self.transport)
    }

    pub fn users(&self) -> UserService<'_, C> {
        UserService::new(&self.transport)
    }

    /// The transport this client sends its requests through. It may be used to call endpoints the services don't
    /// cover.
    pub fn transport(&self) -> &Transport<C> {
        &self.transport
    }

    /// Returns a request for the page after the given page, or `None` if it's the last page.
    pub fn next_page<T>(&self, page: &Page<T>) -> Option<RequestBuilder<'_, C, Page<T>>> {
        page.next
            .as_deref()
            .map(|next| RequestBuilder::new(&self.transport, Method::GET, next))
    }
}

#[cfg(feature = "async")]
impl AsyncSpotifyClient {
    /// Creates a client that uses the given access token as-is.
    pub fn with_access_token<S>(access_token: S) -> Result<Self>
    where
        S: Into<String>,
    {
        AsyncSpotifyClientBuilder::new().access_token(access_token).build()
    }

    /// Creates a client that uses the client credentials flow with the given client ID and secret.
    pub fn from_client_credentials<I, S>(client_id: I, client_secret: S) -> Result<Self>
    where
        I: Into<String>,
        S: Into<String>,
    {
        AsyncSpotifyClientBuilder::new()
            .client_credentials(client_id, client_secret)
            .build()
    }

    /// Creates a client that gets its access tokens from the given provider.
    pub fn with_auth_provider<P>(auth_provider: P) -> Result<Self>
    where
        P: AsyncAuthProvider + 'static,
    {
        AsyncSpotifyClientBuilder::new().auth_provider(auth_provider).build()
    }

    /// Drops the underlying HTTP client and closes the auth provider. The client may still be used afterwards.
    pub async fn close(&self) {
        self.transport.close_async().await;
    }
}

#[cfg(feature = "sync")]
impl SyncSpotifyClient {
    /// Creates a client that uses the given access token as-is.
    pub fn with_access_token<S>(access_token: S) -> Result<Self>
    where
        S: Into<String>,
    {
        SyncSpotifyClientBuilder::new().access_token(access_token).build()
    }

    /// Creates a client that uses the client credentials flow with the given client ID and secret.
    pub fn from_client_credentials<I, S>(client_id: I, client_secret: S) -> Result<Self>
    where
        I: Into<String>,
        S: Into<String>,
    {
        SyncSpotifyClientBuilder::new()
            .client_credentials(client_id, client_secret)
            .build()
    }

    /// Creates a client that gets its access tokens from the given provider.
    pub fn with_auth_provider<P>(auth_provider: P) -> Result<Self>
    where
        P: SyncAuthProvider + 'static,
    {
        SyncSpotifyClientBuilder::new().auth_provider(auth_provider).build()
    }

    /// Drops the underlying HTTP client and closes the auth provider. The client may still be used afterwards.
    pub fn close(&self) {
        self.transport.close_sync();
    }
}

impl<C> SpotifyClientBuilder<C>
where
    C: HttpClient,
{
    pub fn new() -> Self {
        Self {
            access_token: None,
            client_credentials: None,
            auth_provider: None,
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
            base_url: None,
        }
    }

    /// Use the given access token as-is. It's never refreshed.
    pub fn access_token<S>(self, access_token: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            access_token: Some(access_token.into()),
            ..self
        }
    }

    /// Get access tokens with the client credentials flow using the given client ID and secret.
    pub fn client_credentials<I, S>(self, client_id: I, client_secret: S) -> Self
    where
        I: Into<String>,
        S: Into<String>,
    {
        Self {
            client_credentials: Some((client_id.into(), client_secret.into())),
            ..self
        }
    }

    /// Timeout for a single request attempt. Defaults to 30 seconds.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// How many times a failed request is retried. Defaults to 3.
    pub fn max_retries(self, max_retries: u32) -> Self {
        Self {
            retry_policy: self.retry_policy.max_retries(max_retries),
            ..self
        }
    }

    pub fn retry_policy(self, retry_policy: RetryPolicy) -> Self {
        Self { retry_policy, ..self }
    }

    /// Send requests to a different base URL than `https://api.spotify.com/v1`.
    pub fn base_url<S>(self, base_url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            base_url: Some(base_url.into()),
            ..self
        }
    }

    fn take_credential_source(&mut self) -> Result<CredentialSource<C::AuthProvider>> {
        match (
            self.access_token.take(),
            self.client_credentials.take(),
            self.auth_provider.take(),
        ) {
            (Some(access_token), None, None) => Ok(CredentialSource::AccessToken(access_token)),
            (None, Some((client_id, client_secret)), None) => {
                Ok(CredentialSource::ClientCredentials(Some(client_id), Some(client_secret)))
            }
            (None, None, Some(auth_provider)) => Ok(CredentialSource::Provider(auth_provider)),
            (None, None, None) => {
                debug!("No credentials given, reading client credentials from the environment");
                Ok(CredentialSource::ClientCredentials(None, None))
            }
            _ => Err(Error::Configuration(
                "provide only one of access_token, client_credentials or auth_provider".to_owned(),
            )),
        }
    }

    fn client_credentials_provider(
        &self,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Result<ClientCredentials<C>> {
        let mut builder = ClientCredentials::<C>::builder()
            .timeout(self.timeout)
            .retry_policy(self.retry_policy);

        if let Some(client_id) = client_id {
            builder = builder.client_id(client_id);
        }

        if let Some(client_secret) = client_secret {
            builder = builder.client_secret(client_secret);
        }

        builder.build()
    }

    fn finish(self, auth_provider: Arc<C::AuthProvider>) -> Result<SpotifyClient<C>> {
        let transport = Transport::new(auth_provider)
            .with_base_url(self.base_url.as_deref().unwrap_or(API_BASE_URL))?
            .with_timeout(self.timeout)
            .with_retry_policy(self.retry_policy);

        debug!("Built Spotify client: {transport:?}");
        Ok(SpotifyClient { transport })
    }
}

#[cfg(feature = "async")]
impl AsyncSpotifyClientBuilder {
    /// Get access tokens from the given provider. To share a provider between clients, pass an `Arc` of it.
    pub fn auth_provider<P>(self, auth_provider: P) -> Self
    where
        P: AsyncAuthProvider + 'static,
    {
        let auth_provider: Arc<dyn AsyncAuthProvider> = Arc::new(auth_provider);

        Self {
            auth_provider: Some(auth_provider),
            ..self
        }
    }

    /// Finalize the builder and return an [AsyncSpotifyClient]. Returns a [Configuration](Error::Configuration) error
    /// if more than one source of credentials was given, or if none was given and there are no client credentials in
    /// the environment.
    pub fn build(mut self) -> Result<AsyncSpotifyClient> {
        let auth_provider: Arc<dyn AsyncAuthProvider> = match self.take_credential_source()? {
            CredentialSource::AccessToken(access_token) => Arc::new(StaticToken::new(access_token)?),
            CredentialSource::ClientCredentials(client_id, client_secret) => {
                Arc::new(self.client_credentials_provider(client_id, client_secret)?)
            }
            CredentialSource::Provider(auth_provider) => auth_provider,
        };

        self.finish(auth_provider)
    }
}

#[cfg(feature = "sync")]
impl SyncSpotifyClientBuilder {
    /// Get access tokens from the given provider. To share a provider between clients, pass an `Arc` of it.
    pub fn auth_provider<P>(self, auth_provider: P) -> Self
    where
        P: SyncAuthProvider + 'static,
    {
        let auth_provider: Arc<dyn SyncAuthProvider> = Arc::new(auth_provider);

        Self {
            auth_provider: Some(auth_provider),
            ..self
        }
    }

    /// Finalize the builder and return a [SyncSpotifyClient]. Returns a [Configuration](Error::Configuration) error
    /// if more than one source of credentials was given, or if none was given and there are no client credentials in
    /// the environment.
    pub fn build(mut self) -> Result<SyncSpotifyClient> {
        let auth_provider: Arc<dyn SyncAuthProvider> = match self.take_credential_source()? {
            CredentialSource::AccessToken(access_token) => Arc::new(StaticToken::new(access_token)?),
            CredentialSource::ClientCredentials(client_id, client_secret) => {
                Arc::new(self.client_credentials_provider(client_id, client_secret)?)
            }
            CredentialSource::Provider(auth_provider) => auth_provider,
        };

        self.finish(auth_provider)
    }
}

impl<C> Default for SpotifyClientBuilder<C>
where
    C: HttpClient,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for SpotifyClientBuilder<C>
where
    C: HttpClient,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyClientBuilder")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field(
                "client_id",
                &self.client_credentials.as_ref().map(|(client_id, _)| client_id),
            )
            .field("auth_provider", &self.auth_provider.is_some())
            .field("timeout", &self.timeout)
            .field("retry_policy", &self.retry_policy)
            .field("base_url", &self.base_url)
            .finish()
    }
}
