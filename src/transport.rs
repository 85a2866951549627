//! The base transport every API call goes through.
//!
//! A [Transport] attaches the access token from its auth provider to each request, retries transient failures
//! according to its [RetryPolicy] and maps unsuccessful responses onto [Error] kinds.

use std::{fmt, sync::Arc, time::Duration};

use log::{debug, error, trace, warn};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Method, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

#[cfg(feature = "async")]
use crate::{auth::AsyncAuthProvider, http::AsyncClient};
#[cfg(feature = "sync")]
use crate::{auth::SyncAuthProvider, http::SyncClient};
use crate::{
    error::{ApiErrorDetail, Error, Result},
    http::{self, HttpClient, LazyClient, DEFAULT_TIMEOUT},
    model::error::ErrorResponse,
    retry::RetryPolicy,
};

/// The default Web API base URL.
pub const API_BASE_URL: &str = "https://api.spotify.com/v1/";

/// Type alias for an asynchronous transport. See [Transport].
#[cfg(feature = "async")]
pub type AsyncTransport = Transport<AsyncClient>;

/// Type alias for a synchronous transport. See [Transport].
#[cfg(feature = "sync")]
pub type SyncTransport = Transport<SyncClient>;

/// Sends authenticated requests to the Web API.
///
/// Before every attempt the transport asks its auth provider for an access token; a failure to get one is returned
/// immediately. Connection failures, rate limiting (429) and server errors (5xx) are retried according to the retry
/// policy. Every other unsuccessful response fails the request right away.
///
/// The underlying HTTP client is created on first use. [Closing](Transport::close_async) the transport drops it and
/// closes the auth provider; the transport may still be used afterwards.
pub struct Transport<C>
where
    C: HttpClient,
{
    base_url: Url,
    auth_provider: Arc<C::AuthProvider>,
    retry_policy: RetryPolicy,
    http_client: LazyClient<C>,
}

/// Per-request parameters for [Transport::request_async] and [Transport::request_sync].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
    headers: HeaderMap,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
}

#[derive(Debug, Clone)]
enum RequestBody {
    Json(Value),
    Raw { content_type: HeaderValue, data: Vec<u8> },
}

/// A successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 204 No Content, or a success response without a body.
    Empty,
    Json(Value),
    /// A success response whose body isn't JSON.
    Raw(Vec<u8>),
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter.
    pub fn query<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Send the given value as a JSON body.
    pub fn json<T>(self, body: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        Ok(Self {
            body: Some(RequestBody::Json(serde_json::to_value(body)?)),
            ..self
        })
    }

    /// Send raw bytes as the body, with the given content type.
    pub fn raw_body<B>(self, content_type: &'static str, data: B) -> Self
    where
        B: Into<Vec<u8>>,
    {
        Self {
            body: Some(RequestBody::Raw {
                content_type: HeaderValue::from_static(content_type),
                data: data.into(),
            }),
            ..self
        }
    }

    /// Add a header to the request, replacing a default header with the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Override the transport's timeout for each attempt of this request.
    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Override the transport's retry budget for this request.
    pub fn max_retries(self, max_retries: u32) -> Self {
        Self {
            max_retries: Some(max_retries),
            ..self
        }
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    pub(crate) fn set_max_retries(&mut self, max_retries: u32) {
        self.max_retries = Some(max_retries);
    }

    pub(crate) fn push_query(&mut self, key: &str, value: String) {
        self.remove_query(key);
        self.query.push((key.to_owned(), value));
    }

    pub(crate) fn remove_query(&mut self, key: &str) {
        self.query.retain(|(existing, _)| existing != key);
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(RequestBody::Raw { content_type, .. }) = &self.body {
            headers.insert(header::CONTENT_TYPE, content_type.clone());
        }

        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }

        headers
    }
}

impl ApiResponse {
    /// Deserialize the response into the given type. An empty response deserializes like JSON `null`, so it can be
    /// turned into `()` or an `Option`.
    pub fn deserialize<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        match self {
            ApiResponse::Empty => Ok(serde_json::from_value(Value::Null)?),
            ApiResponse::Json(value) => Ok(serde_json::from_value(value)?),
            ApiResponse::Raw(_) => Err(Error::InvalidResponse("expected a JSON response body".to_owned())),
        }
    }
}

/// Turns a response into an [ApiResponse], or an error based on its status code.
fn handle_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> Result<ApiResponse> {
    trace!("Response status: {status}, body length: {}", body.len());

    if status.is_success() {
        if status == StatusCode::NO_CONTENT || body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ApiResponse::Empty);
        }

        return Ok(match serde_json::from_slice(body) {
            Ok(value) => ApiResponse::Json(value),
            Err(_) => {
                debug!("Success response body isn't JSON, returning raw body");
                ApiResponse::Raw(body.to_vec())
            }
        });
    }

    let body = serde_json::from_slice::<Value>(body).ok();
    let message = ErrorResponse::api_message(body.as_ref());

    let retry_after = if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = http::retry_after_seconds(headers);
        warn!("Got 429 rate-limit response from Spotify with Retry-After: {retry_after:?}");
        retry_after
    } else {
        None
    };

    match status {
        StatusCode::UNAUTHORIZED => warn!("Got 401 Unauthorized response: {message}"),
        StatusCode::FORBIDDEN => error!("Got 403 Forbidden response: {message}"),
        status if status.is_server_error() => warn!("Got {status} response: {message}"),
        StatusCode::TOO_MANY_REQUESTS => {}
        status => debug!("Got {status} response: {message}"),
    }

    Err(Error::from_status(
        status,
        ApiErrorDetail::from_response(message, status, body),
        retry_after,
    ))
}

impl<C> Transport<C>
where
    C: HttpClient,
{
    /// Create a new transport with the default base URL, timeout and retry policy.
    pub fn new(auth_provider: Arc<C::AuthProvider>) -> Self {
        Self {
            // the default base URL is a valid constant
            base_url: Url::parse(API_BASE_URL).expect("failed to parse API base URL (this is likely a bug)"),
            auth_provider,
            retry_policy: RetryPolicy::default(),
            http_client: LazyClient::new(DEFAULT_TIMEOUT),
        }
    }

    /// Send requests to a different base URL.
    pub fn with_base_url(self, base_url: &str) -> Result<Self> {
        // relative paths are joined onto the base URL, which requires a trailing slash
        let base_url = if base_url.ends_with('/') {
            base_url.to_owned()
        } else {
            format!("{base_url}/")
        };

        let base_url =
            Url::parse(&base_url).map_err(|e| Error::Configuration(format!("invalid base URL {base_url}: {e}")))?;

        Ok(Self { base_url, ..self })
    }

    /// Time out each request attempt after `timeout`. Defaults to 30 seconds.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            http_client: LazyClient::new(timeout),
            ..self
        }
    }

    pub fn with_retry_policy(self, retry_policy: RetryPolicy) -> Self {
        Self { retry_policy, ..self }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    pub fn timeout(&self) -> Duration {
        self.http_client.timeout()
    }

    pub fn auth_provider(&self) -> &Arc<C::AuthProvider> {
        &self.auth_provider
    }

    /// Build the URL for a request: relative paths are joined onto the base URL, absolute URLs (like the ones in paged
    /// responses) are used as-is.
    fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let mut url = if path.starts_with("https://") || path.starts_with("http://") {
            Url::parse(path)
        } else {
            self.base_url.join(path.trim_start_matches('/'))
        }
        .map_err(|e| Error::Configuration(format!("invalid request path {path}: {e}")))?;

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    fn retry_delay(&self, retry_policy: &RetryPolicy, attempt: u32, err: &Error) -> Option<Duration> {
        let delay = retry_policy.next_delay(attempt, err);

        match delay {
            Some(delay) => warn!("Request attempt {} failed: {err}. Retrying in {delay:?}", attempt + 1),
            None if err.is_retryable() => error!("Request failed after {} attempts: {err}", attempt + 1),
            None => {}
        }

        delay
    }

    fn request_retry_policy(&self, options: &RequestOptions) -> RetryPolicy {
        match options.max_retries {
            Some(max_retries) => self.retry_policy.max_retries(max_retries),
            None => self.retry_policy,
        }
    }
}

#[cfg(feature = "async")]
impl AsyncTransport {
    /// Send a request and return its successful response.
    pub async fn request_async(&self, method: Method, path: &str, options: RequestOptions) -> Result<ApiResponse> {
        let url = self.build_url(path, &options.query)?;
        let retry_policy = self.request_retry_policy(&options);
        let headers = options.headers();
        let mut attempt = 0;

        loop {
            let access_token = self.auth_provider.get_access_token().await?;
            let result = self
                .send_async(method.clone(), url.clone(), headers.clone(), &options, &access_token)
                .await;

            match result {
                Ok(response) => return Ok(response),
                Err(err) => match self.retry_delay(&retry_policy, attempt, &err) {
                    Some(delay) => {
                        http::backoff_sleep_async(delay, err).await?;
                        attempt += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    async fn send_async(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        options: &RequestOptions,
        access_token: &str,
    ) -> Result<ApiResponse> {
        debug!("{method} {url}");

        let mut request = self
            .http_client
            .get()?
            .request(method.clone(), url)
            .headers(headers)
            .bearer_auth(access_token);

        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        request = match &options.body {
            Some(RequestBody::Json(body)) => {
                trace!("Request body: {body}");
                request.json(body)
            }
            Some(RequestBody::Raw { data, .. }) => request.body(data.clone()),
            // Spotify requires that all empty POST and PUT have a Content-Length header set to 0
            None if method == Method::POST || method == Method::PUT => {
                request.header(header::CONTENT_LENGTH, HeaderValue::from_static("0"))
            }
            None => request,
        };

        let response = request.send().await.map_err(Error::from_send_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(Error::from_send_error)?;

        handle_response(status, &headers, &body)
    }

    /// Drop the underlying HTTP client and close the auth provider. The transport may still be used afterwards.
    pub async fn close_async(&self) {
        self.http_client.close();
        self.auth_provider.close().await;
    }
}

#[cfg(feature = "sync")]
impl SyncTransport {
    /// Send a request and return its successful response.
    pub fn request_sync(&self, method: Method, path: &str, options: RequestOptions) -> Result<ApiResponse> {
        let url = self.build_url(path, &options.query)?;
        let retry_policy = self.request_retry_policy(&options);
        let headers = options.headers();
        let mut attempt = 0;

        loop {
            let access_token = self.auth_provider.get_access_token()?;
            let result = self.send_sync(method.clone(), url.clone(), headers.clone(), &options, &access_token);

            match result {
                Ok(response) => return Ok(response),
                Err(err) => match self.retry_delay(&retry_policy, attempt, &err) {
                    Some(delay) => {
                        http::backoff_sleep_sync(delay);
                        attempt += 1;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    fn send_sync(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        options: &RequestOptions,
        access_token: &str,
    ) -> Result<ApiResponse> {
        debug!("{method} {url}");

        let mut request = self
            .http_client
            .get()?
            .request(method.clone(), url)
            .headers(headers)
            .bearer_auth(access_token);

        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        request = match &options.body {
            Some(RequestBody::Json(body)) => {
                trace!("Request body: {body}");
                request.json(body)
            }
            Some(RequestBody::Raw { data, .. }) => request.body(data.clone()),
            // Spotify requires that all empty POST and PUT have a Content-Length header set to 0
            None if method == Method::POST || method == Method::PUT => {
                request.header(header::CONTENT_LENGTH, HeaderValue::from_static("0"))
            }
            None => request,
        };

        let response = request.send().map_err(Error::from_send_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().map_err(Error::from_send_error)?;

        handle_response(status, &headers, &body)
    }

    /// Drop the underlying HTTP client and close the auth provider. The transport may still be used afterwards.
    pub fn close_sync(&self) {
        self.http_client.close();
        self.auth_provider.close();
    }
}

impl<C> fmt::Debug for Transport<C>
where
    C: HttpClient,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .field("retry_policy", &self.retry_policy)
            .field("timeout", &self.http_client.timeout())
            .finish_non_exhaustive()
    }
}
