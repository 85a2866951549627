//! Contains the [ClientCredentials] provider and its builder. The provider implements the client credentials flow.
//!
//! [Spotify documentation on the client credentials flow.](https://developer.spotify.com/documentation/web-api/tutorials/client-credentials-flow)
//!
//! # Usage
//!
//! ```no_run
//! # #[cfg(feature = "async")]
//! # async fn foo() -> spotify_sdk::Result<()> {
//! use spotify_sdk::{auth::AsyncClientCredentials, prelude::*};
//!
//! let provider: AsyncClientCredentials = AsyncClientCredentials::builder()
//!     .client_id("application client ID")
//!     .client_secret("application client secret")
//!     .build()?;
//!
//! // the first call requests a token from Spotify, subsequent calls reuse it until it's about to expire
//! let access_token = provider.get_access_token().await?;
//! # Ok(())
//! # }
//! ```

use std::{fmt, sync::Arc, time::Duration};

use log::debug;

#[cfg(feature = "async")]
use crate::http::AsyncClient;
#[cfg(feature = "sync")]
use crate::http::SyncClient;
use crate::{
    auth::{TokenCache, TokenEndpoint, TokenExpectations, TokenStore, DEFAULT_EXPIRY_SKEW},
    error::Result,
    http::{HttpClient, DEFAULT_TIMEOUT},
    retry::RetryPolicy,
};

const TOKEN_REQUEST_FORM: &[(&str, &str)] = &[("grant_type", "client_credentials")];

/// Type alias for an asynchronous client credentials provider. See [ClientCredentials].
#[cfg(feature = "async")]
pub type AsyncClientCredentials = ClientCredentials<AsyncClient>;

/// Type alias for a synchronous client credentials provider. See [ClientCredentials].
#[cfg(feature = "sync")]
pub type SyncClientCredentials = ClientCredentials<SyncClient>;

/// An auth provider that uses the client credentials flow: the application authenticates with its own client ID and
/// secret. See the [module-level documentation](self) for more information.
///
/// The flow doesn't involve a user, so only endpoints that don't access user information may be used. There is no
/// refresh token; an expired token is simply requested again.
///
/// This struct is generic over its internal asynchronous/synchronous HTTP client. You cannot refer to the internal
/// client types directly, hence there are type aliases for both kinds of providers: [AsyncClientCredentials] and
/// [SyncClientCredentials].
pub struct ClientCredentials<C>
where
    C: HttpClient,
{
    store: TokenStore<C>,
    endpoint: TokenEndpoint<C>,
}

/// Builder for [ClientCredentials].
#[derive(Clone, Default)]
pub struct ClientCredentialsBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    token_cache: Option<Arc<dyn TokenCache>>,
    timeout: Option<Duration>,
    retry_policy: RetryPolicy,
    skew: Option<Duration>,
    token_url: Option<String>,
}

impl<C> ClientCredentials<C>
where
    C: HttpClient,
{
    pub fn builder() -> ClientCredentialsBuilder {
        ClientCredentialsBuilder::default()
    }

    /// Creates a new provider, reading the client ID and secret from the `SPOTIFY_SDK_CLIENT_ID` and
    /// `SPOTIFY_SDK_CLIENT_SECRET` environment variables if they're not given.
    pub fn new(client_id: Option<String>, client_secret: Option<String>) -> Result<Self> {
        ClientCredentialsBuilder {
            client_id,
            client_secret,
            ..Default::default()
        }
        .build()
    }

    fn close_endpoint(&self) {
        self.endpoint.close();
    }
}

impl ClientCredentialsBuilder {
    pub fn client_id<S>(self, client_id: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            client_id: Some(client_id.into()),
            ..self
        }
    }

    pub fn client_secret<S>(self, client_secret: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            client_secret: Some(client_secret.into()),
            ..self
        }
    }

    /// Store tokens in the given cache instead of in memory. The cache may be shared with other providers.
    pub fn token_cache<T>(self, token_cache: Arc<T>) -> Self
    where
        T: TokenCache + 'static,
    {
        Self {
            token_cache: Some(token_cache),
            ..self
        }
    }

    /// Timeout for a single token request attempt. Defaults to 30 seconds.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    /// How many times a failed token request is retried. Defaults to 3.
    pub fn max_retries(self, max_retries: u32) -> Self {
        Self {
            retry_policy: self.retry_policy.max_retries(max_retries),
            ..self
        }
    }

    pub fn retry_policy(self, retry_policy: RetryPolicy) -> Self {
        Self { retry_policy, ..self }
    }

    /// How long before its expiry a token is refreshed. Defaults to 30 seconds.
    pub fn skew(self, skew: Duration) -> Self {
        Self {
            skew: Some(skew),
            ..self
        }
    }

    /// Request tokens from a different URL than Spotify's accounts service.
    pub fn token_url<S>(self, token_url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            token_url: Some(token_url.into()),
            ..self
        }
    }

    /// Finalize the builder and return a [ClientCredentials] provider. Missing client credentials are read from the
    /// environment; if they're not there either, a [Configuration](crate::Error::Configuration) error is returned.
    pub fn build<C>(self) -> Result<ClientCredentials<C>>
    where
        C: HttpClient,
    {
        let (client_id, client_secret) =
            super::resolve_client_credentials(self.client_id, self.client_secret, "client credentials")?;
        let url = super::parse_token_url(self.token_url)?;

        debug!("Creating client credentials provider for client ID {client_id}");

        Ok(ClientCredentials {
            store: TokenStore::new(self.token_cache, self.skew.unwrap_or(DEFAULT_EXPIRY_SKEW)),
            endpoint: TokenEndpoint::new(
                url,
                &client_id,
                &client_secret,
                self.timeout.unwrap_or(DEFAULT_TIMEOUT),
                self.retry_policy,
            ),
        })
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl crate::auth::AsyncAuthProvider for AsyncClientCredentials {
    async fn get_access_token(&self) -> Result<String> {
        if let Some(access_token) = self.store.valid_token() {
            return Ok(access_token);
        }

        let _guard = self.store.refresh_lock.lock().await;

        // another task may have refreshed the token while we were waiting for the lock
        if let Some(access_token) = self.store.valid_token() {
            return Ok(access_token);
        }

        debug!("Requesting access token for client credentials flow");
        let token = self
            .endpoint
            .request_token_async(TOKEN_REQUEST_FORM, &TokenExpectations::default())
            .await?;

        self.store.store(&token)?;
        Ok(token.access_token)
    }

    async fn close(&self) {
        self.close_endpoint();
    }
}

#[cfg(feature = "sync")]
impl crate::auth::SyncAuthProvider for SyncClientCredentials {
    fn get_access_token(&self) -> Result<String> {
        if let Some(access_token) = self.store.valid_token() {
            return Ok(access_token);
        }

        let _guard = self.store.refresh_lock.lock().expect("token refresh mutex poisoned");

        // another thread may have refreshed the token while we were waiting for the lock
        if let Some(access_token) = self.store.valid_token() {
            return Ok(access_token);
        }

        debug!("Requesting access token for client credentials flow");
        let token = self
            .endpoint
            .request_token_sync(TOKEN_REQUEST_FORM, &TokenExpectations::default())?;

        self.store.store(&token)?;
        Ok(token.access_token)
    }

    fn close(&self) {
        self.close_endpoint();
    }
}

impl<C> fmt::Debug for ClientCredentials<C>
where
    C: HttpClient,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("endpoint", &self.endpoint)
            .field("skew", &self.store.skew)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ClientCredentialsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentialsBuilder")
            .field("client_id", &self.client_id)
            .field("timeout", &self.timeout)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::ClientCredentialsBuilder;
    use crate::error::Error;

    #[cfg(feature = "sync")]
    #[test]
    fn invalid_token_url_is_a_configuration_error() {
        let result = ClientCredentialsBuilder::default()
            .client_id("id")
            .client_secret("secret")
            .token_url("not a url")
            .build::<crate::http::SyncClient>();

        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
