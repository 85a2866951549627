#![cfg(feature = "sync")]

//! Environment fallbacks. Kept in their own test binary with a single test, since the environment is process-wide.

use std::env;

use spotify_sdk::{
    auth::{
        SyncAuthorizationCode, SyncClientCredentials, CLIENT_ID_ENV_VAR, CLIENT_SECRET_ENV_VAR, REDIRECT_URI_ENV_VAR,
    },
    client::SyncSpotifyClientBuilder,
    Error,
};

#[test]
fn credentials_fall_back_to_environment() {
    env::remove_var(CLIENT_ID_ENV_VAR);
    env::remove_var(CLIENT_SECRET_ENV_VAR);
    env::remove_var(REDIRECT_URI_ENV_VAR);

    assert!(matches!(
        SyncSpotifyClientBuilder::new().build(),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        SyncClientCredentials::builder().client_id("id").build::<spotify_sdk::http::SyncClient>(),
        Err(Error::Configuration(_))
    ));

    env::set_var(CLIENT_ID_ENV_VAR, "env-id");
    env::set_var(CLIENT_SECRET_ENV_VAR, "env-secret");

    assert!(SyncSpotifyClientBuilder::new().build().is_ok());
    let provider: SyncClientCredentials = SyncClientCredentials::builder().build().unwrap();
    assert!(format!("{provider:?}").contains("ClientCredentials"));

    // an explicitly empty value counts as missing
    assert!(SyncClientCredentials::builder()
        .client_id("")
        .build::<spotify_sdk::http::SyncClient>()
        .is_ok());

    let missing_redirect: Result<SyncAuthorizationCode, _> = SyncAuthorizationCode::builder().build();
    assert!(matches!(missing_redirect, Err(Error::Configuration(_))));

    env::set_var(REDIRECT_URI_ENV_VAR, "http://127.0.0.1:8888/callback");

    let provider: SyncAuthorizationCode = SyncAuthorizationCode::builder().build().unwrap();
    let url = provider.get_authorization_url(Some("state"), Some("user-read-private"), false);

    assert!(url.contains("client_id=env-id"));
    assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8888%2Fcallback"));
    assert!(url.contains("state=state"));

    env::remove_var(CLIENT_ID_ENV_VAR);
    env::remove_var(CLIENT_SECRET_ENV_VAR);
    env::remove_var(REDIRECT_URI_ENV_VAR);
}
