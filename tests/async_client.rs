#![cfg(all(feature = "async", feature = "tokio_sleep"))]

mod common;

use std::{sync::Arc, time::Duration};

use common::*;
use futures::future::join_all;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use spotify_sdk::{
    auth::{AsyncAuthorizationCode, AsyncClientCredentials, InMemoryTokenCache, StaticToken, TokenInfo},
    client::{AsyncSpotifyClient, AsyncSpotifyClientBuilder},
    http::AsyncClient,
    model::playlist::PlaylistDetails,
    prelude::*,
    Error,
};

const REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";

fn client(server: &ServerGuard) -> AsyncSpotifyClient {
    init_logger();

    AsyncSpotifyClientBuilder::new()
        .access_token("token")
        .base_url(server.url())
        .retry_policy(fast_retries())
        .build()
        .unwrap()
}

fn client_credentials(server: &ServerGuard) -> AsyncClientCredentials {
    AsyncClientCredentials::builder()
        .client_id("id")
        .client_secret("secret")
        .token_url(token_url(&server.url()))
        .retry_policy(fast_retries())
        .build::<AsyncClient>()
        .unwrap()
}

#[tokio::test]
async fn transient_failures_recover() {
    let mut server = Server::new_async().await;
    let unavailable = server
        .mock("GET", "/users/someone")
        .with_status(503)
        .expect(2)
        .create_async()
        .await;
    let ok = server
        .mock("GET", "/users/someone")
        .match_header("authorization", "Bearer token")
        .with_status(200)
        .with_body(public_user("someone").to_string())
        .expect(1)
        .create_async()
        .await;

    let user = client(&server).users().get("someone").send_async().await.unwrap();

    assert_eq!(user.id, "someone");
    unavailable.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn forbidden_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/me")
        .with_status(403)
        .with_body(api_error(403, "Insufficient client scope"))
        .expect(1)
        .create_async()
        .await;

    let err = client(&server).users().current_profile().send_async().await.unwrap_err();

    assert!(matches!(err, Error::Forbidden(_)));
    assert!(!err.is_retryable());
    assert_eq!(err.message(), "Insufficient client scope");
    mock.assert_async().await;
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/me")
        .with_status(401)
        .with_body(api_error(401, "The access token expired"))
        .expect(1)
        .create_async()
        .await;

    let err = client(&server).users().current_profile().send_async().await.unwrap_err();

    assert!(matches!(err, Error::Authentication(_)));
    assert_eq!(err.status_code(), Some(401));
    mock.assert_async().await;
}

#[tokio::test]
async fn non_json_success_body_is_an_invalid_response() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/users/someone")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>maintenance</html>")
        .expect(1)
        .create_async()
        .await;

    let err = client(&server).users().get("someone").send_async().await.unwrap_err();

    assert!(matches!(err, Error::InvalidResponse(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn connection_failures_are_retried_then_reported() {
    init_logger();

    // nothing listens on the discard port
    let client = AsyncSpotifyClientBuilder::new()
        .access_token("token")
        .base_url("http://127.0.0.1:9")
        .retry_policy(fast_retries().max_retries(1))
        .build()
        .unwrap();

    let err = client.users().get("someone").send_async().await.unwrap_err();

    assert!(matches!(err, Error::Connection(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn change_details_sends_only_given_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/playlists/playlist")
        .match_body(Matcher::Json(json!({ "name": "Renamed", "description": "Summer" })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    client(&server)
        .playlists()
        .change_details("playlist", PlaylistDetails::new().name("Renamed").description("Summer"))
        .send_async()
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn remove_items_with_snapshot() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/playlists/playlist/tracks")
        .match_body(Matcher::Json(json!({
            "tracks": [{ "uri": "spotify:track:4iV5W9uYEdYUVa79Axb7Rh" }],
            "snapshot_id": "MiwxLDE="
        })))
        .with_status(200)
        .with_body(r#"{"snapshot_id": "MywxLDE="}"#)
        .expect(1)
        .create_async()
        .await;

    let snapshot_id = client(&server)
        .playlists()
        .remove_items("playlist", &["spotify:track:4iV5W9uYEdYUVa79Axb7Rh"], Some("MiwxLDE="))
        .send_async()
        .await
        .unwrap();

    assert_eq!(snapshot_id, "MywxLDE=");
    mock.assert_async().await;
}

#[tokio::test]
async fn concurrent_requests_share_one_token_request() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", TOKEN_PATH)
        .match_header("authorization", BASIC_AUTHORIZATION)
        .match_body(form(&[("grant_type", "client_credentials")]))
        .with_status(200)
        .with_body(token_body("cc-token", None))
        .expect(1)
        .create_async()
        .await;

    let provider = client_credentials(&server);
    let tokens = join_all((0..8).map(|_| provider.get_access_token())).await;

    for token in tokens {
        assert_eq!(token.unwrap(), "cc-token");
    }

    token.assert_async().await;
}

#[tokio::test]
async fn provider_is_shared_between_clients() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_body(token_body("cc-token", None))
        .expect(1)
        .create_async()
        .await;
    let api = server
        .mock("GET", "/users/someone")
        .match_header("authorization", "Bearer cc-token")
        .with_status(200)
        .with_body(public_user("someone").to_string())
        .expect(2)
        .create_async()
        .await;

    let provider = Arc::new(client_credentials(&server));
    let clients: Vec<_> = (0..2)
        .map(|_| {
            AsyncSpotifyClientBuilder::new()
                .auth_provider(Arc::clone(&provider))
                .base_url(server.url())
                .build()
                .unwrap()
        })
        .collect();

    for client in &clients {
        client.users().get("someone").send_async().await.unwrap();
    }

    token.assert_async().await;
    api.assert_async().await;
}

#[tokio::test]
async fn static_token_needs_no_token_endpoint() {
    let mut server = Server::new_async().await;
    let token = server.mock("POST", TOKEN_PATH).expect(0).create_async().await;
    let api = server
        .mock("GET", "/me")
        .match_header("authorization", "Bearer static")
        .with_status(200)
        .with_body(public_user("me").to_string())
        .expect(1)
        .create_async()
        .await;

    let client = AsyncSpotifyClientBuilder::new()
        .auth_provider(StaticToken::new("static").unwrap())
        .base_url(server.url())
        .build()
        .unwrap();

    let user = client.users().current_profile().send_async().await.unwrap();

    assert_eq!(user.id, "me");
    token.assert_async().await;
    api.assert_async().await;
}

#[tokio::test]
async fn closed_client_can_be_used_again() {
    let mut server = Server::new_async().await;
    let api = server
        .mock("GET", "/users/someone")
        .with_status(200)
        .with_body(public_user("someone").to_string())
        .expect(2)
        .create_async()
        .await;

    let client = client(&server);
    client.users().get("someone").send_async().await.unwrap();
    client.close().await;
    client.close().await;
    client.users().get("someone").send_async().await.unwrap();

    api.assert_async().await;
}

#[tokio::test]
async fn authorization_code_exchange_and_refresh() {
    let mut server = Server::new_async().await;
    let exchange = server
        .mock("POST", TOKEN_PATH)
        .match_body(form(&[
            ("grant_type", "authorization_code"),
            ("code", "the-code"),
            ("redirect_uri", REDIRECT_URI),
        ]))
        .with_status(200)
        .with_body(token_body("first", Some("refresh-1")))
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", TOKEN_PATH)
        .match_body(form(&[("grant_type", "refresh_token"), ("refresh_token", "refresh-1")]))
        .with_status(200)
        .with_body(token_body("second", None))
        .expect(1)
        .create_async()
        .await;

    let cache = Arc::new(InMemoryTokenCache::new());
    let provider: AsyncAuthorizationCode = AsyncAuthorizationCode::builder()
        .client_id("id")
        .client_secret("secret")
        .redirect_uri(REDIRECT_URI)
        .raw_scope("user-read-private")
        .token_url(token_url(&server.url()))
        .token_cache(Arc::clone(&cache))
        .skew(Duration::from_secs(7200))
        .build()
        .unwrap();

    let state = "abc123";
    let callback = format!("{REDIRECT_URI}?code=the-code&state={state}");
    let code = provider.parse_response_url(&callback, Some(state)).unwrap();
    let token = provider.exchange_code(&code).await.unwrap();

    assert_eq!(token.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(token.scope.as_deref(), Some("user-read-private"));

    assert_eq!(provider.get_access_token().await.unwrap(), "second");

    let cached = cache.get().unwrap();
    assert_eq!(cached.access_token, "second");
    assert_eq!(cached.refresh_token.as_deref(), Some("refresh-1"));

    exchange.assert_async().await;
    refresh.assert_async().await;
}

#[tokio::test]
async fn cached_token_is_used_without_request() {
    let mut server = Server::new_async().await;
    let token = server.mock("POST", TOKEN_PATH).expect(0).create_async().await;

    let cache = Arc::new(InMemoryTokenCache::new());
    cache
        .set(&TokenInfo::expiring_in("from-cache", Duration::from_secs(3600)))
        .unwrap();

    let provider: AsyncClientCredentials = AsyncClientCredentials::builder()
        .client_id("id")
        .client_secret("secret")
        .token_url(token_url(&server.url()))
        .token_cache(cache)
        .build()
        .unwrap();

    assert_eq!(provider.get_access_token().await.unwrap(), "from-cache");
    token.assert_async().await;
}

#[tokio::test]
async fn expired_cached_token_is_replaced() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_body(token_body("renewed", None))
        .expect(1)
        .create_async()
        .await;

    let cache = Arc::new(InMemoryTokenCache::new());
    // expires within the default skew
    cache
        .set(&TokenInfo::expiring_in("stale", Duration::from_secs(10)))
        .unwrap();

    let provider: AsyncClientCredentials = AsyncClientCredentials::builder()
        .client_id("id")
        .client_secret("secret")
        .token_url(token_url(&server.url()))
        .token_cache(cache)
        .build()
        .unwrap();

    assert_eq!(provider.get_access_token().await.unwrap(), "renewed");
    token.assert_async().await;
}

#[tokio::test]
async fn authorize_local_exchanges_the_redirected_code() {
    init_logger();

    let redirect_uri = free_redirect_uri();
    let mut server = Server::new_async().await;
    let exchange = server
        .mock("POST", TOKEN_PATH)
        .match_body(form(&[
            ("grant_type", "authorization_code"),
            ("code", "the-code"),
            ("redirect_uri", redirect_uri.as_str()),
        ]))
        .with_status(200)
        .with_body(token_body("first", Some("refresh-1")))
        .expect(1)
        .create_async()
        .await;

    let provider: AsyncAuthorizationCode = AsyncAuthorizationCode::builder()
        .client_id("id")
        .client_secret("secret")
        .redirect_uri(redirect_uri.as_str())
        .token_url(token_url(&server.url()))
        .build()
        .unwrap();

    let mut state = None;
    let mut browser = None;
    let token = provider
        .authorize_local(None, false, Duration::from_secs(10), |url| {
            let generated = url
                .split(|c: char| c == '?' || c == '&')
                .find_map(|param| param.strip_prefix("state="))
                .unwrap()
                .to_owned();

            let redirect_uri = redirect_uri.clone();
            let query = format!("code=the-code&state={generated}");
            browser = Some(std::thread::spawn(move || follow_redirect(&redirect_uri, &query)));
            state = Some(generated);
        })
        .await
        .unwrap();

    assert_eq!(token.access_token, "first");
    assert_eq!(state.unwrap().len(), 16);
    assert!(browser.unwrap().join().unwrap().contains("Authorization complete"));
    assert_eq!(provider.get_access_token().await.unwrap(), "first");
    exchange.assert_async().await;
}

#[tokio::test]
async fn authorize_local_times_out() {
    let provider: AsyncAuthorizationCode = AsyncAuthorizationCode::builder()
        .client_id("id")
        .client_secret("secret")
        .redirect_uri(free_redirect_uri())
        .build()
        .unwrap();

    let err = provider
        .authorize_local(Some("xyz"), false, Duration::from_millis(100), |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Authentication(_)));
    assert_eq!(err.message(), "Timed out waiting for the authorization callback.");
}

#[tokio::test]
async fn followed_artists_page_by_cursor() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/me/following")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "artist".into()),
            Matcher::UrlEncoded("limit".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "artists": {
                    "href": "https://api.spotify.com/v1/me/following?type=artist&limit=1",
                    "items": [artist("a1", "First")],
                    "limit": 1,
                    "next": "https://api.spotify.com/v1/me/following?type=artist&after=a1&limit=1",
                    "cursors": { "after": "a1" },
                    "total": 2
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/me/following")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "artist".into()),
            Matcher::UrlEncoded("after".into(), "a1".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "artists": {
                    "href": "https://api.spotify.com/v1/me/following?type=artist&after=a1&limit=1",
                    "items": [artist("a2", "Second")],
                    "limit": 1,
                    "next": null,
                    "cursors": { "after": null },
                    "total": 2
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let client = client(&server);
    let page = client.users().followed_artists().limit(1).send_async().await.unwrap();
    let after = page.after().unwrap();

    let last = client
        .users()
        .followed_artists()
        .after(after)
        .limit(1)
        .send_async()
        .await
        .unwrap();

    assert_eq!(page.items[0].id, "a1");
    assert_eq!(last.items[0].id, "a2");
    assert!(!last.has_next());
    assert_eq!(last.after(), None);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn saved_shows_and_library_check() {
    let mut server = Server::new_async().await;
    let saved = server
        .mock("GET", "/me/shows")
        .match_query(Matcher::UrlEncoded("offset".into(), "20".into()))
        .with_status(200)
        .with_body(
            page(
                "https://api.spotify.com/v1/me/shows",
                vec![json!({ "added_at": "2024-01-01T00:00:00Z", "show": simplified_show("s1") })],
                21,
            )
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let contains = server
        .mock("GET", "/me/library/contains")
        .match_query(Matcher::UrlEncoded("uris".into(), "spotify:show:s1".into()))
        .with_status(200)
        .with_body("[true]")
        .expect(1)
        .create_async()
        .await;

    let client = client(&server);
    let shows = client.shows().saved().offset(20).send_async().await.unwrap();
    let uris: Vec<&str> = shows.items.iter().map(|saved| saved.show.uri.as_str()).collect();

    assert_eq!(client.library().contains(&uris).send_async().await.unwrap(), [true]);
    saved.assert_async().await;
    contains.assert_async().await;
}
