use std::sync::Arc;

use dotenvy::dotenv;
use spotify_sdk::{
    auth::{generate_state, FileTokenCache, SyncAuthorizationCode},
    client::SyncSpotifyClient,
    model::user::TimeRange,
    prelude::*,
    scope::Scope,
};

fn main() {
    dotenv().ok();
    env_logger::init();

    // the client ID, secret and redirect URI are read from SPOTIFY_SDK_CLIENT_ID, SPOTIFY_SDK_CLIENT_SECRET and
    // SPOTIFY_SDK_REDIRECT_URI. the token is kept in a file so the next run doesn't have to authorize again
    let provider: SyncAuthorizationCode = SyncAuthorizationCode::builder()
        .scopes([Scope::UserReadPrivate, Scope::UserTopRead])
        .token_cache(Arc::new(FileTokenCache::default()))
        .build()
        .expect("failed to build authorization code provider");

    if provider.refresh_token().is_none() {
        let state = generate_state();
        println!("Authorize URL: {}", provider.authorization_url().state(&state).build());

        let mut redirected_url = String::new();
        println!("URL you were redirected to:");
        std::io::stdin().read_line(&mut redirected_url).unwrap();

        let code = provider
            .parse_response_url(redirected_url.trim(), Some(&state))
            .expect("invalid redirect URL");
        provider.exchange_code(&code).expect("failed to exchange authorization code");
    }

    let spotify_client = SyncSpotifyClient::with_auth_provider(provider).expect("failed to build Spotify client");

    let user = spotify_client.users().current_profile().send_sync().unwrap();
    println!("Logged in as {}", user.display_name.as_deref().unwrap_or(&user.id));

    let top_tracks = spotify_client
        .users()
        .top_tracks()
        .time_range(TimeRange::ShortTerm)
        .limit(10)
        .send_sync()
        .unwrap();

    for (position, track) in top_tracks.items.iter().enumerate() {
        println!("{}. {} ({})", position + 1, track.name, track.album.name);
    }

    spotify_client.close();
}
