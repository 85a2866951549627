//! A typed client for the [Spotify Web API](https://developer.spotify.com/documentation/web-api).
//!
//! Every API call goes through one shared pipeline: an [auth provider](crate::auth) hands out a valid access token,
//! the [transport](crate::transport::Transport) attaches it to the request and retries transient failures with a
//! bounded exponential backoff, and failures are mapped onto the typed [Error](crate::error::Error) taxonomy.
//!
//! The pipeline is available in two flavours, selected with crate features:
//! - `async` (enabled by default): non-blocking clients built on `reqwest::Client`.
//! - `sync` (enabled by default): blocking clients built on `reqwest::blocking::Client`.
//!
//! Both flavours share the same retry, backoff, error mapping and token handling code; they differ only in how they
//! send requests, sleep and lock.
//!
//! Async backoff sleeps need a runtime. Enable one of:
//! - `tokio_sleep` (enabled by default): sleep with `tokio::time::sleep`.
//! - `async_std_sleep`: sleep with `async_std::task::sleep`.
//!
//! Without either feature, an async request that would need to back off returns the error instead.
//!
//! The TLS backend is chosen with `native-tls` (default) or `rustls-tls`.
//!
//! # Usage
//!
//! ```no_run
//! # #[cfg(all(feature = "async", feature = "tokio_sleep"))]
//! # async fn foo() -> spotify_sdk::Result<()> {
//! use spotify_sdk::{client::AsyncSpotifyClientBuilder, prelude::*};
//!
//! // client ID and secret fall back to SPOTIFY_SDK_CLIENT_ID and SPOTIFY_SDK_CLIENT_SECRET
//! let client = AsyncSpotifyClientBuilder::new()
//!     .client_credentials("client ID", "client secret")
//!     .build()?;
//!
//! let album = client.albums().get("4aawyAB9vmqN3uQ7FjRGTy").market("US").send_async().await?;
//! println!("{}", album.name);
//!
//! client.close().await;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(any(feature = "async", feature = "sync")))]
compile_error!("at least one of the `async` or `sync` features must be enabled");

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod model;
pub mod retry;
pub mod scope;
pub mod transport;

mod util {
    pub(crate) mod duration_millis;
}

pub use crate::error::{Error, Result};

/// Commonly used traits. Import everything from here to be able to send requests and use auth providers.
pub mod prelude {
    #[cfg(feature = "async")]
    pub use crate::{auth::AsyncAuthProvider, client::request_builder::AsyncRequestBuilder};
    #[cfg(feature = "sync")]
    pub use crate::{auth::SyncAuthProvider, client::request_builder::SyncRequestBuilder};
    pub use crate::{auth::TokenCache, client::request_builder::BaseRequestBuilder};
}

pub(crate) mod private {
    pub trait Sealed {}
}
