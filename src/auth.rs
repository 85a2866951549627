//! Access token providers and token caches.
//!
//! A transport asks its [auth provider](AsyncAuthProvider) for an access token before every request attempt. The
//! providers in this module keep their current token in a [TokenCache] and only contact the Spotify accounts service
//! when the cached token is missing or about to expire. Concurrent callers that find an expired token wait for a single
//! refresh instead of each refreshing on their own.
//!
//! - [ClientCredentials]: the client credentials flow. Gives access to the non-user-specific endpoints.
//! - [AuthorizationCode]: the authorization code flow with refresh tokens. Gives access to the endpoints of the user
//!   that authorized the application.
//! - [StaticToken]: a fixed, previously obtained access token.
//!
//! [Spotify documentation on authorization.](https://developer.spotify.com/documentation/web-api/concepts/authorization)

mod authorization_code;
mod cache;
mod client_credentials;
mod loopback;
mod provider;
mod token;

use std::{fmt, sync::Arc, time::Duration};

use base64::{engine::general_purpose::STANDARD, Engine};
use const_format::concatcp;
use log::{debug, error, trace, warn};
use reqwest::{header, StatusCode, Url};
use serde_json::Value;

#[cfg(feature = "async")]
pub use self::{
    authorization_code::AsyncAuthorizationCode, client_credentials::AsyncClientCredentials,
    provider::AsyncAuthProvider,
};
#[cfg(feature = "sync")]
pub use self::{
    authorization_code::SyncAuthorizationCode, client_credentials::SyncClientCredentials, provider::SyncAuthProvider,
};
pub use self::{
    authorization_code::{
        generate_state, parse_response_url, AuthorizationCode, AuthorizationCodeBuilder, AuthorizationUrlBuilder,
    },
    cache::{FileTokenCache, InMemoryTokenCache, TokenCache},
    client_credentials::{ClientCredentials, ClientCredentialsBuilder},
    provider::StaticToken,
    token::TokenInfo,
};
use crate::{
    error::{ApiErrorDetail, Error, Result},
    http::{HttpClient, LazyClient},
    model::error::ErrorResponse,
    retry::RetryPolicy,
};

const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com/";
const ACCOUNTS_AUTHORIZE_ENDPOINT: &str = concatcp!(ACCOUNTS_BASE_URL, "authorize");
const ACCOUNTS_API_TOKEN_ENDPOINT: &str = concatcp!(ACCOUNTS_BASE_URL, "api/token");

/// Environment variable the client ID is read from when one isn't given explicitly.
pub const CLIENT_ID_ENV_VAR: &str = "SPOTIFY_SDK_CLIENT_ID";
/// Environment variable the client secret is read from when one isn't given explicitly.
pub const CLIENT_SECRET_ENV_VAR: &str = "SPOTIFY_SDK_CLIENT_SECRET";
/// Environment variable the redirect URI is read from when one isn't given explicitly.
pub const REDIRECT_URI_ENV_VAR: &str = "SPOTIFY_SDK_REDIRECT_URI";

/// How long before its expiry a token is already considered expired.
pub const DEFAULT_EXPIRY_SKEW: Duration = Duration::from_secs(30);

/// Returns the explicitly given value, or the value of the environment variable if none was given. Empty values count
/// as missing.
fn resolve(explicit: Option<String>, env_var: &str) -> Option<String> {
    explicit.filter(|value| !value.is_empty()).or_else(|| {
        let value = std::env::var(env_var).ok().filter(|value| !value.is_empty());

        if value.is_some() {
            debug!("Using {env_var} from the environment");
        }

        value
    })
}

fn resolve_client_credentials(
    client_id: Option<String>,
    client_secret: Option<String>,
    flow: &str,
) -> Result<(String, String)> {
    match (
        resolve(client_id, CLIENT_ID_ENV_VAR),
        resolve(client_secret, CLIENT_SECRET_ENV_VAR),
    ) {
        (Some(client_id), Some(client_secret)) => Ok((client_id, client_secret)),
        _ => Err(Error::Configuration(format!(
            "client_id and client_secret are required for {flow} auth"
        ))),
    }
}

fn build_authorization_header(client_id: &str, client_secret: &str) -> String {
    let auth = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", STANDARD.encode(auth))
}

fn parse_token_url(token_url: Option<String>) -> Result<Url> {
    let token_url = token_url.as_deref().unwrap_or(ACCOUNTS_API_TOKEN_ENDPOINT);
    Url::parse(token_url).map_err(|e| Error::Configuration(format!("invalid token URL {token_url}: {e}")))
}

/// What a token response is checked against.
#[derive(Debug, Default)]
struct TokenExpectations<'a> {
    /// Kept when the response doesn't carry a new refresh token.
    previous_refresh_token: Option<&'a str>,
    require_refresh_token: bool,
    /// Used when the response doesn't list the granted scopes.
    default_scope: Option<&'a str>,
}

/// Turns a token endpoint response into a token. Server errors are returned as retryable
/// [Server](Error::Server) errors, every other failure as an [Authentication](Error::Authentication) error.
fn parse_token_response(
    status: StatusCode,
    body: Option<&Value>,
    expectations: &TokenExpectations,
) -> Result<TokenInfo> {
    let fail = |message: &str| {
        Error::Authentication(ApiErrorDetail::from_response(
            message.to_owned(),
            status,
            body.cloned(),
        ))
    };

    if !status.is_success() {
        let detail = ApiErrorDetail::from_response(ErrorResponse::authentication_message(body), status, body.cloned());

        return Err(if status.is_server_error() {
            warn!("Token endpoint returned {status}: {detail}");
            Error::Server(detail)
        } else {
            error!("Token request failed with {status}: {detail}");
            Error::Authentication(detail)
        });
    }

    let (access_token, expires_in) = match (field(body, "access_token"), field(body, "expires_in")) {
        (Some(access_token), Some(expires_in)) => (access_token, expires_in),
        _ => return Err(fail("Token response missing access_token or expires_in.")),
    };

    let access_token = access_token
        .as_str()
        .ok_or_else(|| fail("Token response has invalid access_token."))?;

    let expires_in = match expires_in {
        Value::Number(number) => number.as_f64(),
        Value::String(string) => string.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| fail("Token response has invalid expires_in."))?;

    let refresh_token = field(body, "refresh_token")
        .and_then(Value::as_str)
        .or(expectations.previous_refresh_token);

    if expectations.require_refresh_token && refresh_token.is_none() {
        return Err(fail("Token response missing refresh_token."));
    }

    let scope = field(body, "scope").and_then(Value::as_str).or(expectations.default_scope);

    debug!(
        "Got token response, expires in {expires_in} seconds, refresh token: {}, scope: {scope:?}",
        refresh_token.is_some()
    );

    Ok(TokenInfo {
        access_token: access_token.to_owned(),
        expires_at: token::now_epoch() + expires_in,
        refresh_token: refresh_token.map(str::to_owned),
        scope: scope.map(str::to_owned),
    })
}

fn field<'a>(body: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    body.and_then(|body| body.get(key)).filter(|value| !value.is_null())
}

/// The accounts service token endpoint, as used by one provider.
struct TokenEndpoint<C> {
    url: Url,
    authorization: String,
    retry_policy: RetryPolicy,
    http_client: LazyClient<C>,
}

impl<C> TokenEndpoint<C>
where
    C: HttpClient,
{
    fn new(
        url: Url,
        client_id: &str,
        client_secret: &str,
        timeout: Duration,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            url,
            authorization: build_authorization_header(client_id, client_secret),
            retry_policy,
            http_client: LazyClient::new(timeout),
        }
    }

    fn close(&self) {
        self.http_client.close();
    }

    fn retry_delay(&self, attempt: u32, err: &Error) -> Option<Duration> {
        let delay = self.retry_policy.next_delay(attempt, err);

        match delay {
            Some(delay) => warn!(
                "Token request attempt {} failed: {err}. Retrying in {delay:?}",
                attempt + 1
            ),
            None if err.is_retryable() => error!("Token request failed after {} attempts: {err}", attempt + 1),
            None => {}
        }

        delay
    }
}

#[cfg(feature = "async")]
impl TokenEndpoint<crate::http::AsyncClient> {
    async fn send_async(&self, form: &[(&str, &str)]) -> Result<(StatusCode, Option<Value>)> {
        trace!("Sending token request to {}", self.url);

        let response = self
            .http_client
            .get()?
            .post(self.url.clone())
            .header(header::AUTHORIZATION, &self.authorization)
            .form(form)
            .send()
            .await
            .map_err(Error::from_send_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(Error::from_send_error)?;
        Ok((status, serde_json::from_slice(&bytes).ok()))
    }

    async fn request_token_async(
        &self,
        form: &[(&str, &str)],
        expectations: &TokenExpectations<'_>,
    ) -> Result<TokenInfo> {
        let mut attempt = 0;

        loop {
            let result = match self.send_async(form).await {
                Ok((status, body)) => parse_token_response(status, body.as_ref(), expectations),
                Err(e) => Err(e),
            };

            match result {
                Ok(token) => return Ok(token),
                Err(err) => match self.retry_delay(attempt, &err) {
                    Some(delay) => {
                        crate::http::backoff_sleep_async(delay, err).await?;
                        attempt += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }
}

#[cfg(feature = "sync")]
impl TokenEndpoint<crate::http::SyncClient> {
    fn send_sync(&self, form: &[(&str, &str)]) -> Result<(StatusCode, Option<Value>)> {
        trace!("Sending token request to {}", self.url);

        let response = self
            .http_client
            .get()?
            .post(self.url.clone())
            .header(header::AUTHORIZATION, &self.authorization)
            .form(form)
            .send()
            .map_err(Error::from_send_error)?;

        let status = response.status();
        let bytes = response.bytes().map_err(Error::from_send_error)?;
        Ok((status, serde_json::from_slice(&bytes).ok()))
    }

    fn request_token_sync(&self, form: &[(&str, &str)], expectations: &TokenExpectations<'_>) -> Result<TokenInfo> {
        let mut attempt = 0;

        loop {
            let result = self
                .send_sync(form)
                .and_then(|(status, body)| parse_token_response(status, body.as_ref(), expectations));

            match result {
                Ok(token) => return Ok(token),
                Err(err) => match self.retry_delay(attempt, &err) {
                    Some(delay) => {
                        crate::http::backoff_sleep_sync(delay);
                        attempt += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }
}

impl<C> fmt::Debug for TokenEndpoint<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenEndpoint")
            .field("url", &self.url.as_str())
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

/// The token cache and refresh lock shared by the providers.
struct TokenStore<C>
where
    C: HttpClient,
{
    cache: Arc<dyn TokenCache>,
    skew: Duration,
    refresh_lock: C::RefreshLock,
}

impl<C> TokenStore<C>
where
    C: HttpClient,
{
    fn new(cache: Option<Arc<dyn TokenCache>>, skew: Duration) -> Self {
        Self {
            cache: cache.unwrap_or_else(|| Arc::new(InMemoryTokenCache::new())),
            skew,
            refresh_lock: Default::default(),
        }
    }

    /// Returns the cached access token if it's still valid.
    fn valid_token(&self) -> Option<String> {
        self.cache
            .get()
            .filter(|token| !token.access_token.is_empty() && !token.is_expired(self.skew))
            .map(|token| token.access_token)
    }

    fn store(&self, token: &TokenInfo) -> Result<()> {
        self.cache.set(token).map_err(|e| {
            error!("Failed to store token in cache: {e}");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::{build_authorization_header, parse_token_response, TokenExpectations};
    use crate::error::Error;

    #[test]
    fn authorization_header() {
        assert_eq!(
            build_authorization_header("client", "secret"),
            "Basic Y2xpZW50OnNlY3JldA=="
        );
    }

    #[test]
    fn token_response_success() {
        let body = json!({ "access_token": "token", "token_type": "Bearer", "expires_in": 3600 });
        let token = parse_token_response(StatusCode::OK, Some(&body), &TokenExpectations::default()).unwrap();

        assert_eq!(token.access_token, "token");
        assert_eq!(token.refresh_token, None);
        assert!(!token.is_expired(std::time::Duration::from_secs(3500)));
        assert!(token.is_expired(std::time::Duration::from_secs(3700)));
    }

    #[test]
    fn token_response_missing_fields() {
        for body in [
            json!({ "expires_in": 3600 }),
            json!({ "access_token": "token" }),
            json!({ "access_token": null, "expires_in": 3600 }),
        ] {
            let err = parse_token_response(StatusCode::OK, Some(&body), &TokenExpectations::default()).unwrap_err();
            assert!(matches!(err, Error::Authentication(_)));
            assert_eq!(err.message(), "Token response missing access_token or expires_in.");
            assert_eq!(err.status_code(), Some(200));
        }

        let err = parse_token_response(StatusCode::OK, None, &TokenExpectations::default()).unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn token_response_invalid_expires_in() {
        let body = json!({ "access_token": "token", "expires_in": "an hour" });
        let err = parse_token_response(StatusCode::OK, Some(&body), &TokenExpectations::default()).unwrap_err();
        assert_eq!(err.message(), "Token response has invalid expires_in.");

        let body = json!({ "access_token": "token", "expires_in": "3600" });
        assert!(parse_token_response(StatusCode::OK, Some(&body), &TokenExpectations::default()).is_ok());
    }

    #[test]
    fn token_response_keeps_previous_refresh_token_and_scope() {
        let body = json!({ "access_token": "new", "expires_in": 3600 });
        let expectations = TokenExpectations {
            previous_refresh_token: Some("old refresh"),
            require_refresh_token: false,
            default_scope: Some("user-read-private"),
        };

        let token = parse_token_response(StatusCode::OK, Some(&body), &expectations).unwrap();
        assert_eq!(token.refresh_token.as_deref(), Some("old refresh"));
        assert_eq!(token.scope.as_deref(), Some("user-read-private"));

        let body = json!({ "access_token": "new", "expires_in": 3600, "refresh_token": "new refresh", "scope": "" });
        let token = parse_token_response(StatusCode::OK, Some(&body), &expectations).unwrap();
        assert_eq!(token.refresh_token.as_deref(), Some("new refresh"));
        assert_eq!(token.scope.as_deref(), Some(""));
    }

    #[test]
    fn token_response_requires_refresh_token() {
        let body = json!({ "access_token": "token", "expires_in": 3600 });
        let expectations = TokenExpectations {
            require_refresh_token: true,
            ..Default::default()
        };

        let err = parse_token_response(StatusCode::OK, Some(&body), &expectations).unwrap_err();
        assert_eq!(err.message(), "Token response missing refresh_token.");
    }

    #[test]
    fn token_response_errors() {
        let body = json!({ "error": "invalid_client", "error_description": "Invalid client secret" });
        let err =
            parse_token_response(StatusCode::BAD_REQUEST, Some(&body), &TokenExpectations::default()).unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        assert_eq!(err.message(), "Invalid client secret");
        assert_eq!(err.response_body(), Some(&body));
        assert!(!err.is_retryable());

        let err = parse_token_response(StatusCode::TOO_MANY_REQUESTS, None, &TokenExpectations::default()).unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        assert_eq!(err.message(), "Unknown error");

        let err = parse_token_response(StatusCode::BAD_GATEWAY, None, &TokenExpectations::default()).unwrap_err();
        assert!(matches!(err, Error::Server(_)));
        assert!(err.is_retryable());
    }
}
