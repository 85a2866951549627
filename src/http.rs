//! The asynchronous and synchronous HTTP bindings. Everything above this module is generic over [HttpClient] and
//! shares the same request, retry and token handling logic; the bindings only differ in how they send requests, sleep
//! and lock.

#[cfg(feature = "async")]
mod async_client {
    use std::{ops::Deref, time::Duration};

    use crate::{auth::AsyncAuthProvider, error::Result};

    /// The asynchronous HTTP binding, backed by [reqwest::Client].
    #[derive(Debug, Clone)]
    pub struct AsyncClient(pub(crate) reqwest::Client);

    impl crate::private::Sealed for AsyncClient {}

    impl super::HttpClient for AsyncClient {
        type AuthProvider = dyn AsyncAuthProvider;
        type RefreshLock = futures::lock::Mutex<()>;

        fn build(timeout: Duration) -> Result<Self> {
            Ok(Self(reqwest::Client::builder().timeout(timeout).build()?))
        }
    }

    impl Deref for AsyncClient {
        type Target = reqwest::Client;

        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }
}

#[cfg(feature = "sync")]
mod sync_client {
    use std::{ops::Deref, time::Duration};

    use crate::{auth::SyncAuthProvider, error::Result};

    /// The synchronous HTTP binding, backed by [reqwest::blocking::Client].
    #[derive(Debug, Clone)]
    pub struct SyncClient(pub(crate) reqwest::blocking::Client);

    impl crate::private::Sealed for SyncClient {}

    impl super::HttpClient for SyncClient {
        type AuthProvider = dyn SyncAuthProvider;
        type RefreshLock = std::sync::Mutex<()>;

        fn build(timeout: Duration) -> Result<Self> {
            Ok(Self(reqwest::blocking::Client::builder().timeout(timeout).build()?))
        }
    }

    impl Deref for SyncClient {
        type Target = reqwest::blocking::Client;

        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }
}

use std::{sync::Mutex, time::Duration};

use log::trace;
use reqwest::header::{self, HeaderMap};

#[cfg(feature = "async")]
pub use self::async_client::AsyncClient;
#[cfg(feature = "sync")]
pub use self::sync_client::SyncClient;
use crate::error::{Error, Result};

/// The default timeout for a single request attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An HTTP binding. Implemented by [AsyncClient] and [SyncClient]; it cannot be implemented outside this crate.
pub trait HttpClient: crate::private::Sealed + Clone + Send + Sync + 'static {
    /// The auth provider capability matching this binding.
    type AuthProvider: ?Sized + Send + Sync;

    /// The lock that serialises token refreshes in a provider.
    #[doc(hidden)]
    type RefreshLock: Default + Send + Sync;

    /// Builds a new underlying HTTP client whose requests time out after `timeout`.
    fn build(timeout: Duration) -> Result<Self>;
}

/// Holds an HTTP client that's built on first use and dropped on [close](LazyClient::close). A closed client is built
/// again when it's next needed.
#[derive(Debug)]
pub(crate) struct LazyClient<C> {
    timeout: Duration,
    slot: Mutex<Option<C>>,
}

impl<C> LazyClient<C>
where
    C: HttpClient,
{
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            slot: Mutex::new(None),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get(&self) -> Result<C> {
        let mut slot = self.slot.lock().expect("http client mutex poisoned");

        match slot.as_ref() {
            Some(client) => Ok(client.clone()),
            None => {
                trace!("Building new HTTP client with timeout {:?}", self.timeout);
                let client = C::build(self.timeout)?;
                *slot = Some(client.clone());
                Ok(client)
            }
        }
    }

    pub fn close(&self) {
        if self.slot.lock().expect("http client mutex poisoned").take().is_some() {
            trace!("Closed HTTP client");
        }
    }
}

/// Returns the value of the `Retry-After` header in whole seconds, if it's present and valid.
pub(crate) fn retry_after_seconds(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|header| header.to_str().ok())
        .and_then(|header_str| header_str.trim().parse::<u64>().ok())
}

/// Return the error instead of sleeping since no sleep utility has been enabled.
#[cfg(all(feature = "async", not(feature = "tokio_sleep"), not(feature = "async_std_sleep")))]
pub(crate) async fn backoff_sleep_async(_delay: Duration, err: Error) -> Result<()> {
    log::warn!("No async sleep utility enabled, not retrying");
    Err(err)
}

// sleeping with tokio takes precedence over async_std so if the user enables both features for some reason, they get
// tokio sleep
/// Sleep for the specified amount of time using tokio's sleep function.
#[cfg(all(feature = "async", feature = "tokio_sleep"))]
pub(crate) async fn backoff_sleep_async(delay: Duration, _err: Error) -> Result<()> {
    tokio::time::sleep(delay).await;
    Ok(())
}

/// Sleep for the specified amount of time using async_std's sleep function.
#[cfg(all(feature = "async", feature = "async_std_sleep", not(feature = "tokio_sleep")))]
pub(crate) async fn backoff_sleep_async(delay: Duration, _err: Error) -> Result<()> {
    async_std::task::sleep(delay).await;
    Ok(())
}

/// Sleep for the specified amount of time by blocking the current thread.
#[cfg(feature = "sync")]
pub(crate) fn backoff_sleep_sync(delay: Duration) {
    std::thread::sleep(delay);
}

#[cfg(test)]
mod tests {
    use reqwest::header::{self, HeaderMap, HeaderValue};

    use super::retry_after_seconds;

    #[test]
    fn retry_after_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after_seconds(&headers), None);

        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("12"));
        assert_eq!(retry_after_seconds(&headers), Some(12));

        headers.insert(header::RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(retry_after_seconds(&headers), None);
    }
}
