use std::{fmt, sync::Arc};

use crate::error::{Error, Result};

/// Hands out valid access tokens to an asynchronous transport.
///
/// Implementations refresh their token when needed. A provider may be shared between several clients; concurrent
/// callers must not cause more than one refresh at a time.
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait AsyncAuthProvider: Send + Sync {
    /// Returns a currently valid access token, refreshing it first if needed.
    async fn get_access_token(&self) -> Result<String>;

    /// Releases any resources the provider holds. The provider may still be used afterwards.
    async fn close(&self) {}
}

/// Hands out valid access tokens to a synchronous transport.
///
/// Implementations refresh their token when needed. A provider may be shared between several clients; concurrent
/// callers must not cause more than one refresh at a time.
#[cfg(feature = "sync")]
pub trait SyncAuthProvider: Send + Sync {
    /// Returns a currently valid access token, refreshing it first if needed.
    fn get_access_token(&self) -> Result<String>;

    /// Releases any resources the provider holds. The provider may still be used afterwards.
    fn close(&self) {}
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl<P> AsyncAuthProvider for Arc<P>
where
    P: AsyncAuthProvider + ?Sized,
{
    async fn get_access_token(&self) -> Result<String> {
        (**self).get_access_token().await
    }

    async fn close(&self) {
        (**self).close().await
    }
}

#[cfg(feature = "sync")]
impl<P> SyncAuthProvider for Arc<P>
where
    P: SyncAuthProvider + ?Sized,
{
    fn get_access_token(&self) -> Result<String> {
        (**self).get_access_token()
    }

    fn close(&self) {
        (**self).close()
    }
}

/// A fixed access token that's never refreshed. Requests start failing with an
/// [Authentication](Error::Authentication) error once Spotify no longer accepts it.
#[derive(Clone)]
pub struct StaticToken {
    access_token: String,
}

impl StaticToken {
    pub fn new<S>(access_token: S) -> Result<Self>
    where
        S: Into<String>,
    {
        let access_token = access_token.into();

        if access_token.is_empty() {
            return Err(Error::Configuration("access token must not be empty".to_owned()));
        }

        Ok(Self { access_token })
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticToken").finish_non_exhaustive()
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl AsyncAuthProvider for StaticToken {
    async fn get_access_token(&self) -> Result<String> {
        Ok(self.access_token.clone())
    }
}

#[cfg(feature = "sync")]
impl SyncAuthProvider for StaticToken {
    fn get_access_token(&self) -> Result<String> {
        Ok(self.access_token.clone())
    }
}
