use dotenvy::dotenv;
use spotify_sdk::{client::AsyncSpotifyClientBuilder, model::ItemType, prelude::*};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    // the client ID and secret are read from SPOTIFY_SDK_CLIENT_ID and SPOTIFY_SDK_CLIENT_SECRET
    let spotify_client = AsyncSpotifyClientBuilder::new()
        .max_retries(5)
        .build()
        .expect("failed to build Spotify client");

    let track = spotify_client
        .tracks()
        .get("2PoYyfBkedDBPGAh0ZUoHW")
        .market("US")
        .send_async()
        .await
        .unwrap();

    println!(
        "{} - {} ({})",
        track.name,
        track.artists.first().map(|artist| artist.name.as_str()).unwrap_or("?"),
        track.album.name
    );

    let results = spotify_client
        .search()
        .search("hatsune miku", [ItemType::Track])
        .limit(3)
        .send_async()
        .await
        .unwrap();

    let Some(mut page) = results.tracks else {
        return;
    };

    for page_number in 1..=3 {
        println!("\nPage {page_number}:");
        for track in &page.items {
            println!("{} ({})", track.name, track.album.name);
        }

        match spotify_client.next_page(&page) {
            Some(request) => page = request.send_async().await.unwrap(),
            None => break,
        }
    }

    spotify_client.close().await;
}
