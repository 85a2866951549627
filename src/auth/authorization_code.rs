//! Contains the [AuthorizationCode] provider and its builder. The provider implements the authorization code flow with
//! refresh tokens.
//!
//! [Spotify documentation on the authorization code flow.](https://developer.spotify.com/documentation/web-api/tutorials/code-flow)
//!
//! # Usage
//!
//! ```no_run
//! # #[cfg(feature = "sync")]
//! # fn foo() -> spotify_sdk::Result<()> {
//! use spotify_sdk::{
//!     auth::{generate_state, SyncAuthorizationCode},
//!     prelude::*,
//!     scope::Scope,
//! };
//!
//! let provider: SyncAuthorizationCode = SyncAuthorizationCode::builder()
//!     .client_id("application client ID")
//!     .client_secret("application client secret")
//!     // the redirect URI has to match one of the redirect URIs specified in your Spotify application
//!     .redirect_uri("http://127.0.0.1:8888/callback")
//!     // specify any (or none) of the scopes you require access to
//!     .scopes([Scope::UserReadPrivate, Scope::PlaylistModifyPrivate])
//!     .build()?;
//!
//! // generate an authorization URL for the user. this URL takes the user to a Spotify page where they are prompted to
//! // give the application access to their account and all the scopes you've specified earlier
//! let state = generate_state();
//! let authorize_url = provider.authorization_url().state(&state).build();
//!
//! // when the user accepts, they are redirected to the redirect URI, which contains an authorization code and the
//! // state in its query. extract the code from the URL the user was redirected to
//! # let redirected_url = "";
//! let code = provider.parse_response_url(redirected_url, Some(&state))?;
//!
//! // exchange the code for an access token and a refresh token. from here on out the provider refreshes the access
//! // token on its own when it expires
//! provider.exchange_code(&code)?;
//! let access_token = provider.get_access_token()?;
//! # Ok(())
//! # }
//! ```
//!
//! For applications running on the user's own machine with a loopback redirect URI,
//! [authorize_local](SyncAuthorizationCode::authorize_local) does the redirect handling and the exchange in one call.

use std::{fmt, sync::Arc, time::Duration};

use log::{debug, warn};
use rand::{distributions::Alphanumeric, Rng};
use reqwest::Url;
use serde_json::json;

#[cfg(feature = "async")]
use crate::http::AsyncClient;
#[cfg(feature = "sync")]
use crate::http::SyncClient;
use super::loopback::CallbackListener;
use crate::{
    auth::{
        TokenCache, TokenEndpoint, TokenExpectations, TokenInfo, TokenStore, ACCOUNTS_AUTHORIZE_ENDPOINT,
        DEFAULT_EXPIRY_SKEW, REDIRECT_URI_ENV_VAR,
    },
    error::{ApiErrorDetail, Error, Result},
    http::{HttpClient, DEFAULT_TIMEOUT},
    retry::RetryPolicy,
    scope::ToScopesString,
};

const RANDOM_STATE_LENGTH: usize = 16;
const MISSING_TOKEN_MESSAGE: &str = "No authorization token available. Call exchange_code() first.";

/// Type alias for an asynchronous authorization code provider. See [AuthorizationCode].
#[cfg(feature = "async")]
pub type AsyncAuthorizationCode = AuthorizationCode<AsyncClient>;

/// Type alias for a synchronous authorization code provider. See [AuthorizationCode].
#[cfg(feature = "sync")]
pub type SyncAuthorizationCode = AuthorizationCode<SyncClient>;

/// An auth provider that implements the authorization code flow to authenticate a user with Spotify. See the
/// [module-level documentation](self) for more information.
///
/// The provider needs either an authorization code [exchanged](AuthorizationCode::exchange_code) for tokens, a refresh
/// token given at construction, or a token cache that already holds a refresh token. Expired access tokens are
/// refreshed with the refresh token; if Spotify doesn't hand out a new refresh token, the previous one is kept.
///
/// This struct is generic over its internal asynchronous/synchronous HTTP client. You cannot refer to the internal
/// client types directly, hence there are type aliases for both kinds of providers: [AsyncAuthorizationCode] and
/// [SyncAuthorizationCode].
pub struct AuthorizationCode<C>
where
    C: HttpClient,
{
    client_id: String,
    redirect_uri: String,
    scope: Option<String>,
    refresh_token: Option<String>,

    store: TokenStore<C>,
    endpoint: TokenEndpoint<C>,
}

/// Builder for [AuthorizationCode].
#[derive(Clone, Default)]
pub struct AuthorizationCodeBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    scope: Option<String>,
    refresh_token: Option<String>,
    token_cache: Option<Arc<dyn TokenCache>>,
    timeout: Option<Duration>,
    retry_policy: RetryPolicy,
    skew: Option<Duration>,
    token_url: Option<String>,
}

/// Builds the URL a user is sent to in order to authorize the application. Returned by
/// [authorization_url](AuthorizationCode::authorization_url).
#[derive(Debug, Clone)]
pub struct AuthorizationUrlBuilder<'a> {
    client_id: &'a str,
    redirect_uri: &'a str,
    scope: Option<String>,
    state: Option<String>,
    show_dialog: bool,
}

/// Returns a random string suitable for the `state` parameter of an authorization URL.
pub fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_STATE_LENGTH)
        .map(char::from)
        .collect()
}

/// Extracts the authorization code from the URL the user was redirected to after authorizing the application.
///
/// `url` may be a full URL, a path with a query string or only the query string. If `expected_state` is given, the
/// `state` parameter in the URL must equal it. Returns an [Authentication](Error::Authentication) error if the user
/// denied access, if the state doesn't match, or if the URL doesn't contain a code.
pub fn parse_response_url(url: &str, expected_state: Option<&str>) -> Result<String> {
    let params = callback_query_params(url)?;
    let first_value = |key: &str| {
        params
            .iter()
            .find(|(param, _)| param == key)
            .map(|(_, value)| value.as_str())
    };

    if let Some(error) = first_value("error") {
        let error_description = first_value("error_description").filter(|description| !description.is_empty());
        warn!("Authorization failed: {error} {error_description:?}");

        let message = match error_description {
            Some(description) => format!("Authorization failed: {error} ({description})"),
            None => format!("Authorization failed: {error}"),
        };

        return Err(Error::Authentication(ApiErrorDetail {
            message,
            status: None,
            body: Some(json!({ "error": error, "error_description": error_description })),
        }));
    }

    let state = first_value("state");
    if let Some(expected_state) = expected_state {
        if state != Some(expected_state) {
            warn!("State mismatch in authorization response: expected {expected_state}, got {state:?}");

            return Err(Error::Authentication(ApiErrorDetail {
                message: "State mismatch in authorization response.".to_owned(),
                status: None,
                body: Some(json!({ "expected_state": expected_state, "state": state })),
            }));
        }
    }

    match first_value("code") {
        Some(code) if !code.is_empty() => Ok(code.to_owned()),
        _ => Err(Error::Authentication(ApiErrorDetail {
            message: "Authorization response missing code.".to_owned(),
            status: None,
            body: Some(json!({ "state": state })),
        })),
    }
}

fn callback_query_params(url: &str) -> Result<Vec<(String, String)>> {
    let query = url.split_once('?').map(|(_, query)| query).unwrap_or(url);
    let query = query.split_once('#').map(|(query, _)| query).unwrap_or(query);

    let parsed = Url::parse(&format!("http://localhost/?{query}"))
        .map_err(|e| Error::authentication(format!("Invalid authorization response URL: {e}")))?;

    Ok(parsed.query_pairs().into_owned().collect())
}

impl<C> AuthorizationCode<C>
where
    C: HttpClient,
{
    pub fn builder() -> AuthorizationCodeBuilder {
        AuthorizationCodeBuilder::default()
    }

    /// Begin building an authorization URL the user should be directed to in some manner. The URL requests the scopes
    /// given at construction unless others are specified.
    ///
    /// Once the user approves the application, they are redirected back to the redirect URI. Pass that URL to
    /// [parse_response_url](AuthorizationCode::parse_response_url) to get the authorization code.
    pub fn authorization_url(&self) -> AuthorizationUrlBuilder<'_> {
        AuthorizationUrlBuilder {
            client_id: &self.client_id,
            redirect_uri: &self.redirect_uri,
            scope: self.scope.clone(),
            state: None,
            show_dialog: false,
        }
    }

    /// Returns an authorization URL with the given state and scopes. If `scope` is `None`, the scopes given at
    /// construction are requested.
    pub fn get_authorization_url(&self, state: Option<&str>, scope: Option<&str>, show_dialog: bool) -> String {
        let builder = self.authorization_url().show_dialog(show_dialog);
        let builder = match state {
            Some(state) => builder.state(state),
            None => builder,
        };

        let builder = match scope {
            Some(scope) => builder.raw_scope(scope),
            None => builder,
        };

        builder.build()
    }

    /// Extracts the authorization code from a redirect URL. See [parse_response_url].
    pub fn parse_response_url(&self, url: &str, expected_state: Option<&str>) -> Result<String> {
        parse_response_url(url, expected_state)
    }

    /// Returns the current refresh token, either from the token cache or the one given at construction.
    ///
    /// The refresh token may be saved and given to a new provider later to skip the authorization step.
    pub fn refresh_token(&self) -> Option<String> {
        self.store
            .cache
            .get()
            .and_then(|token| token.refresh_token)
            .or_else(|| self.refresh_token.clone())
    }

    fn exchange_code_form<'a>(&'a self, code: &'a str) -> Result<[(&'a str, &'a str); 3]> {
        if code.is_empty() {
            return Err(Error::Configuration("code must not be empty".to_owned()));
        }

        debug!("Requesting access and refresh tokens for authorization code flow");
        Ok([
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
    }

    fn exchange_code_expectations(&self) -> TokenExpectations<'_> {
        TokenExpectations {
            previous_refresh_token: None,
            require_refresh_token: true,
            default_scope: self.scope.as_deref(),
        }
    }

    fn current_refresh_token(&self, cached: Option<TokenInfo>) -> Result<String> {
        cached
            .and_then(|token| token.refresh_token)
            .or_else(|| self.refresh_token.clone())
            .ok_or_else(|| {
                warn!("No refresh token available for authorization code flow");
                Error::authentication(MISSING_TOKEN_MESSAGE)
            })
    }

    fn start_local_authorization<F>(
        &self,
        state: Option<&str>,
        show_dialog: bool,
        timeout: Duration,
        open_url: F,
    ) -> Result<(CallbackListener, String)>
    where
        F: FnOnce(&str),
    {
        let listener = CallbackListener::bind(&self.redirect_uri, timeout)?;
        let state = state.map_or_else(generate_state, str::to_owned);

        open_url(&self.get_authorization_url(Some(state.as_str()), None, show_dialog));
        Ok((listener, state))
    }

    fn refresh_expectations<'a>(&'a self, refresh_token: &'a str) -> TokenExpectations<'a> {
        TokenExpectations {
            previous_refresh_token: Some(refresh_token),
            require_refresh_token: false,
            default_scope: self.scope.as_deref(),
        }
    }
}

#[cfg(feature = "async")]
impl AsyncAuthorizationCode {
    /// Exchange an authorization code for an access token and a refresh token, and store them in the token cache.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenInfo> {
        let form = self.exchange_code_form(code)?;
        let _guard = self.store.refresh_lock.lock().await;

        let token = self
            .endpoint
            .request_token_async(&form, &self.exchange_code_expectations())
            .await?;

        self.store.store(&token)?;
        Ok(token)
    }

    /// Run the whole authorization on this machine. See
    /// [SyncAuthorizationCode::authorize_local](AuthorizationCode::authorize_local) for details. The listener waits on
    /// its own thread, so this doesn't block the executor.
    pub async fn authorize_local<F>(
        &self,
        state: Option<&str>,
        show_dialog: bool,
        timeout: Duration,
        open_url: F,
    ) -> Result<TokenInfo>
    where
        F: FnOnce(&str),
    {
        let (listener, state) = self.start_local_authorization(state, show_dialog, timeout, open_url)?;
        let callback = listener.wait_async().await?;
        let code = parse_response_url(&callback, Some(&state))?;

        self.exchange_code(&code).await
    }
}

#[cfg(feature = "sync")]
impl SyncAuthorizationCode {
    /// Exchange an authorization code for an access token and a refresh token, and store them in the token cache.
    pub fn exchange_code(&self, code: &str) -> Result<TokenInfo> {
        let form = self.exchange_code_form(code)?;
        let _guard = self.store.refresh_lock.lock().expect("token refresh mutex poisoned");

        let token = self
            .endpoint
            .request_token_sync(&form, &self.exchange_code_expectations())?;

        self.store.store(&token)?;
        Ok(token)
    }

    /// Run the whole authorization on this machine.
    ///
    /// The redirect URI must be an `http` URI on `127.0.0.1` or `localhost` with an explicit port, such as
    /// `http://127.0.0.1:8888/callback`. A listener is started on that address before `open_url` is called with the
    /// authorization URL; show it to the user or open it in their browser. Once the user approves the application and
    /// is redirected back, the authorization code is [exchanged](AuthorizationCode::exchange_code) for tokens.
    ///
    /// If no `state` is given, a [random one](generate_state) is used. Returns an
    /// [Authentication](Error::Authentication) error if the redirect doesn't arrive within `timeout`, or if it carries
    /// an error or a different state.
    pub fn authorize_local<F>(
        &self,
        state: Option<&str>,
        show_dialog: bool,
        timeout: Duration,
        open_url: F,
    ) -> Result<TokenInfo>
    where
        F: FnOnce(&str),
    {
        let (listener, state) = self.start_local_authorization(state, show_dialog, timeout, open_url)?;
        let callback = listener.wait()?;
        let code = parse_response_url(&callback, Some(&state))?;

        self.exchange_code(&code)
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl crate::auth::AsyncAuthProvider for AsyncAuthorizationCode {
    async fn get_access_token(&self) -> Result<String> {
        if let Some(access_token) = self.store.valid_token() {
            return Ok(access_token);
        }

        let _guard = self.store.refresh_lock.lock().await;

        // another task may have refreshed the token while we were waiting for the lock
        if let Some(access_token) = self.store.valid_token() {
            return Ok(access_token);
        }

        let refresh_token = self.current_refresh_token(self.store.cache.get())?;
        debug!("Refreshing access token for authorization code flow");

        let token = self
            .endpoint
            .request_token_async(
                &[("grant_type", "refresh_token"), ("refresh_token", refresh_token.as_str())],
                &self.refresh_expectations(&refresh_token),
            )
            .await?;

        self.store.store(&token)?;
        Ok(token.access_token)
    }

    async fn close(&self) {
        self.endpoint.close();
    }
}

#[cfg(feature = "sync")]
impl crate::auth::SyncAuthProvider for SyncAuthorizationCode {
    fn get_access_token(&self) -> Result<String> {
        if let Some(access_token) = self.store.valid_token() {
            return Ok(access_token);
        }

        let _guard = self.store.refresh_lock.lock().expect("token refresh mutex poisoned");

        // another thread may have refreshed the token while we were waiting for the lock
        if let Some(access_token) = self.store.valid_token() {
            return Ok(access_token);
        }

        let refresh_token = self.current_refresh_token(self.store.cache.get())?;
        debug!("Refreshing access token for authorization code flow");

        let token = self.endpoint.request_token_sync(
            &[("grant_type", "refresh_token"), ("refresh_token", refresh_token.as_str())],
            &self.refresh_expectations(&refresh_token),
        )?;

        self.store.store(&token)?;
        Ok(token.access_token)
    }

    fn close(&self) {
        self.endpoint.close();
    }
}

impl AuthorizationCodeBuilder {
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

    pub fn redirect_uri<S>(self, redirect_uri: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            redirect_uri: Some(redirect_uri.into()),
            ..self
        }
    }

    /// Specify the [OAuth authorization scopes](crate::scope::Scope) that the user is asked to grant for the
    /// application.
    pub fn scopes<T>(self, scopes: T) -> Self
    where
        T: ToScopesString,
    {
        Self {
            scope: Some(scopes.to_scopes_string()),
            ..self
        }
    }

    /// Specify the requested scopes as a space-separated string.
    pub fn raw_scope<S>(self, scope: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            scope: Some(scope.into()),
            ..self
        }
    }

    /// Use a previously obtained refresh token. The provider can then hand out access tokens without an authorization
    /// code exchange.
    pub fn refresh_token<S>(self, refresh_token: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            refresh_token: Some(refresh_token.into()),
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

    /// Finalize the builder and return an [AuthorizationCode] provider. A missing client ID, client secret or redirect
    /// URI is read from the environment; if it's not there either, a [Configuration](crate::Error::Configuration)
    /// error is returned.
    pub fn build<C>(self) -> Result<AuthorizationCode<C>>
    where
        C: HttpClient,
    {
        let (client_id, client_secret) =
            super::resolve_client_credentials(self.client_id, self.client_secret, "authorization code")?;
        let redirect_uri = super::resolve(self.redirect_uri, REDIRECT_URI_ENV_VAR).ok_or_else(|| {
            Error::Configuration("redirect_uri is required for authorization code auth".to_owned())
        })?;
        let url = super::parse_token_url(self.token_url)?;

        debug!(
            "Creating authorization code provider for client ID {client_id} with redirect URI {redirect_uri} and \
             scope {:?}",
            self.scope
        );

        let endpoint = TokenEndpoint::new(
            url,
            &client_id,
            &client_secret,
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            self.retry_policy,
        );

        Ok(AuthorizationCode {
            client_id,
            redirect_uri,
            scope: self.scope.filter(|scope| !scope.is_empty()),
            refresh_token: self.refresh_token.filter(|token| !token.is_empty()),
            store: TokenStore::new(self.token_cache, self.skew.unwrap_or(DEFAULT_EXPIRY_SKEW)),
            endpoint,
        })
    }
}

impl<'a> AuthorizationUrlBuilder<'a> {
    pub fn state<S>(self, state: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            state: Some(state.into()),
            ..self
        }
    }

    /// Request these scopes instead of the ones given at construction.
    pub fn scopes<T>(self, scopes: T) -> Self
    where
        T: ToScopesString,
    {
        Self {
            scope: Some(scopes.to_scopes_string()),
            ..self
        }
    }

    /// Request these space-separated scopes instead of the ones given at construction.
    pub fn raw_scope<S>(self, scope: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            scope: Some(scope.into()),
            ..self
        }
    }

    /// Set whether or not to force the user to approve the application again, if they've already done so.
    ///
    /// If false (default), a user who has already approved the application is automatically redirected to the
    /// redirect URI. If true, the user will not be automatically redirected and will have to approve the application
    /// again.
    pub fn show_dialog(self, show_dialog: bool) -> Self {
        Self { show_dialog, ..self }
    }

    pub fn build(self) -> String {
        let mut query_params = vec![
            ("client_id", self.client_id),
            ("response_type", "code"),
            ("redirect_uri", self.redirect_uri),
        ];

        if let Some(scope) = self.scope.as_deref().filter(|scope| !scope.is_empty()) {
            query_params.push(("scope", scope));
        }

        if let Some(state) = self.state.as_deref() {
            query_params.push(("state", state));
        }

        if self.show_dialog {
            query_params.push(("show_dialog", "true"));
        }

        // parsing the URL fails only if the base URL is invalid, not the parameters
        Url::parse_with_params(ACCOUNTS_AUTHORIZE_ENDPOINT, &query_params)
            .expect("failed to build authorize URL: invalid base URL (this is likely a bug)")
            .into()
    }
}

impl<C> fmt::Debug for AuthorizationCode<C>
where
    C: HttpClient,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationCode")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for AuthorizationCodeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationCodeBuilder")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{generate_state, parse_response_url};
    use crate::error::Error;

    #[test]
    fn state_is_random_alphanumeric() {
        let state = generate_state();
        assert_eq!(state.len(), 16);
        assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(state, generate_state());
    }

    #[test]
    fn response_url_forms() {
        for url in [
            "http://127.0.0.1:8888/callback?code=abc&state=xyz",
            "/callback?code=abc&state=xyz",
            "code=abc&state=xyz",
            "?state=xyz&code=abc#fragment",
        ] {
            assert_eq!(parse_response_url(url, Some("xyz")).unwrap(), "abc", "{url}");
        }

        assert_eq!(parse_response_url("code=a%20b", None).unwrap(), "a b");
    }

    #[test]
    fn response_url_error() {
        let err = parse_response_url(
            "http://localhost/callback?error=access_denied&error_description=User+denied&state=xyz",
            Some("xyz"),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Authentication(_)));
        assert_eq!(err.message(), "Authorization failed: access_denied (User denied)");
        assert_eq!(err.response_body().unwrap()["error"], "access_denied");

        let err = parse_response_url("error=access_denied", None).unwrap_err();
        assert_eq!(err.message(), "Authorization failed: access_denied");
    }

    #[test]
    fn response_url_state_mismatch() {
        let err = parse_response_url("code=abc&state=other", Some("xyz")).unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        assert_eq!(err.message(), "State mismatch in authorization response.");

        let err = parse_response_url("code=abc", Some("xyz")).unwrap_err();
        assert_eq!(err.message(), "State mismatch in authorization response.");

        // without an expected state the state isn't checked
        assert_eq!(parse_response_url("code=abc&state=other", None).unwrap(), "abc");
    }

    #[test]
    fn response_url_missing_code() {
        for url in ["state=xyz", "code=&state=xyz", "http://localhost/callback"] {
            let err = parse_response_url(url, None).unwrap_err();
            assert!(matches!(err, Error::Authentication(_)), "{url}");
            assert_eq!(err.message(), "Authorization response missing code.");
        }
    }
}
