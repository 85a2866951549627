#![allow(dead_code)]

use std::{
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    time::Duration,
};

use mockito::Matcher;
use serde_json::{json, Value};
use spotify_sdk::retry::RetryPolicy;

pub const TOKEN_PATH: &str = "/api/token";
/// `id:secret` in base64.
pub const BASIC_AUTHORIZATION: &str = "Basic aWQ6c2VjcmV0";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The default policy with a tiny, deterministic backoff.
pub fn fast_retries() -> RetryPolicy {
    RetryPolicy::default().base_delay(Duration::from_millis(1)).jitter(false)
}

pub fn token_url(server_url: &str) -> String {
    format!("{server_url}{TOKEN_PATH}")
}

pub fn form(fields: &[(&str, &str)]) -> Matcher {
    Matcher::AllOf(
        fields
            .iter()
            .map(|(key, value)| Matcher::UrlEncoded((*key).to_owned(), (*value).to_owned()))
            .collect(),
    )
}

pub fn token_body(access_token: &str, refresh_token: Option<&str>) -> String {
    let mut body = json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600,
    });

    if let Some(refresh_token) = refresh_token {
        body["refresh_token"] = json!(refresh_token);
    }

    body.to_string()
}

pub fn api_error(status: u16, message: &str) -> String {
    json!({ "error": { "status": status, "message": message } }).to_string()
}

pub fn public_user(id: &str) -> Value {
    json!({
        "id": id,
        "display_name": "Some User",
        "external_urls": { "spotify": format!("https://open.spotify.com/user/{id}") },
        "followers": { "href": null, "total": 12 },
        "href": format!("https://api.spotify.com/v1/users/{id}"),
        "images": [],
        "type": "user",
        "uri": format!("spotify:user:{id}")
    })
}

pub fn artist(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "external_urls": { "spotify": format!("https://open.spotify.com/artist/{id}") },
        "followers": { "href": null, "total": 1000 },
        "genres": ["pop"],
        "href": format!("https://api.spotify.com/v1/artists/{id}"),
        "images": [],
        "popularity": 80,
        "type": "artist",
        "uri": format!("spotify:artist:{id}")
    })
}

pub fn artist_page(items: Vec<Value>, next: Option<String>, offset: u32, total: u32) -> String {
    json!({
        "href": "https://api.spotify.com/v1/me/top/artists",
        "items": items,
        "limit": 2,
        "next": next,
        "offset": offset,
        "previous": null,
        "total": total
    })
    .to_string()
}

pub fn page(href: &str, items: Vec<Value>, total: u32) -> Value {
    json!({
        "href": href,
        "items": items,
        "limit": 20,
        "next": null,
        "offset": 0,
        "previous": null,
        "total": total
    })
}

pub fn simplified_show(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Some Show",
        "publisher": "Some Publisher",
        "description": "A show",
        "html_description": "<p>A show</p>",
        "explicit": false,
        "available_markets": ["SE", "US"],
        "copyrights": [],
        "external_urls": { "spotify": format!("https://open.spotify.com/show/{id}") },
        "href": format!("https://api.spotify.com/v1/shows/{id}"),
        "uri": format!("spotify:show:{id}"),
        "images": [],
        "is_externally_hosted": false,
        "languages": ["en"],
        "media_type": "audio",
        "total_episodes": 1,
        "type": "show"
    })
}

pub fn simplified_episode(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Some Episode",
        "description": "An episode",
        "duration_ms": 2_700_000,
        "explicit": false,
        "audio_preview_url": null,
        "external_urls": { "spotify": format!("https://open.spotify.com/episode/{id}") },
        "href": format!("https://api.spotify.com/v1/episodes/{id}"),
        "uri": format!("spotify:episode:{id}"),
        "images": [],
        "is_playable": true,
        "languages": ["en"],
        "release_date": "2024-03-01",
        "release_date_precision": "day",
        "type": "episode"
    })
}

pub fn episode(id: &str, show_id: &str) -> Value {
    let mut episode = simplified_episode(id);
    episode["show"] = simplified_show(show_id);
    episode
}

pub fn simplified_audiobook(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Some Audiobook",
        "authors": [{ "name": "Some Author" }],
        "narrators": [{ "name": "Some Narrator" }],
        "publisher": "Some Publisher",
        "description": "An audiobook",
        "edition": "Unabridged",
        "explicit": false,
        "external_urls": { "spotify": format!("https://open.spotify.com/show/{id}") },
        "href": format!("https://api.spotify.com/v1/audiobooks/{id}"),
        "uri": format!("spotify:show:{id}"),
        "images": [],
        "languages": ["en"],
        "media_type": "audio",
        "total_chapters": 1,
        "type": "audiobook"
    })
}

pub fn simplified_chapter(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Chapter 1",
        "chapter_number": 0,
        "description": "The first chapter",
        "duration_ms": 600_000,
        "explicit": false,
        "audio_preview_url": null,
        "href": format!("https://api.spotify.com/v1/chapters/{id}"),
        "uri": format!("spotify:episode:{id}"),
        "release_date": "2021-01-01",
        "release_date_precision": "day",
        "resume_point": { "fully_played": false, "resume_position_ms": 0 },
        "type": "episode"
    })
}

pub fn audiobook(id: &str, chapter_id: &str) -> Value {
    let mut audiobook = simplified_audiobook(id);
    audiobook["chapters"] = page(
        &format!("https://api.spotify.com/v1/audiobooks/{id}/chapters"),
        vec![simplified_chapter(chapter_id)],
        1,
    );
    audiobook
}

pub fn chapter(id: &str, audiobook_id: &str) -> Value {
    let mut chapter = simplified_chapter(id);
    chapter["audiobook"] = simplified_audiobook(audiobook_id);
    chapter
}

/// A loopback redirect URI on a port that was free a moment ago.
pub fn free_redirect_uri() -> String {
    let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    format!("http://127.0.0.1:{port}/callback")
}

/// Sends the request a browser makes when the user is redirected back to the application, and returns the raw
/// response.
pub fn follow_redirect(redirect_uri: &str, query: &str) -> String {
    let (addr, path) = redirect_uri
        .trim_start_matches("http://")
        .split_once('/')
        .unwrap();

    let mut stream = TcpStream::connect(addr).unwrap();
    write!(stream, "GET /{path}?{query} HTTP/1.1\r\nHost: {addr}\r\n\r\n").unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}
