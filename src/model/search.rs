use serde::{Deserialize, Serialize};

use super::{
    album::SimplifiedAlbum,
    artist::Artist,
    audiobook::SimplifiedAudiobook,
    page::Page,
    playlist::SimplifiedPlaylist,
    show::{SimplifiedEpisode, SimplifiedShow},
    track::Track,
    ItemType,
};

/// The default search limit, i.e. how many items there are in each page.
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Trait for converting an object to a string used in Spotify's search types. This is implemented for all iterators
/// of [ItemType]-enums.
pub trait ToTypesString {
    fn to_types_string(self) -> String;
}

impl<I> ToTypesString for I
where
    I: IntoIterator<Item = ItemType>,
{
    fn to_types_string(self) -> String {
        let mut types = Vec::new();

        for item_type in self {
            if !types.contains(&item_type) {
                types.push(item_type);
            }
        }

        types.iter().map(|item_type| item_type.as_str()).collect::<Vec<_>>().join(",")
    }
}

/// First pages of search results. Only the item types that were searched for are present.
///
/// Spotify may return `null` in place of items that are no longer available; such entries are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "deserialize_page")]
    pub tracks: Option<Page<Track>>,
    #[serde(default, deserialize_with = "deserialize_page")]
    pub artists: Option<Page<Artist>>,
    #[serde(default, deserialize_with = "deserialize_page")]
    pub albums: Option<Page<SimplifiedAlbum>>,
    #[serde(default, deserialize_with = "deserialize_page")]
    pub playlists: Option<Page<SimplifiedPlaylist>>,
    #[serde(default, deserialize_with = "deserialize_page")]
    pub shows: Option<Page<SimplifiedShow>>,
    #[serde(default, deserialize_with = "deserialize_page")]
    pub episodes: Option<Page<SimplifiedEpisode>>,
    #[serde(default, deserialize_with = "deserialize_page")]
    pub audiobooks: Option<Page<SimplifiedAudiobook>>,
}

fn deserialize_page<'de, D, T>(deserializer: D) -> Result<Option<Page<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    let page = Option::<Page<Option<T>>>::deserialize(deserializer)?;
    Ok(page.map(|page| Page {
        items: page.items.into_iter().flatten().collect(),
        href: page.href,
        next: page.next,
        previous: page.previous,
        limit: page.limit,
        offset: page.offset,
        total: page.total,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{SearchResult, ToTypesString};
    use crate::model::ItemType;

    fn page(items: serde_json::Value) -> serde_json::Value {
        json!({
            "href": "https://api.spotify.com/v1/search",
            "items": items,
            "limit": 5,
            "next": null,
            "offset": 0,
            "previous": null,
            "total": 1
        })
    }

    #[test]
    fn podcast_and_audiobook_results() {
        let result: SearchResult = serde_json::from_value(json!({
            "shows": page(json!([null, {
                "id": "s1",
                "name": "Show",
                "publisher": "Publisher",
                "description": "A show",
                "explicit": false,
                "href": "https://api.spotify.com/v1/shows/s1",
                "uri": "spotify:show:s1",
                "media_type": "audio",
                "total_episodes": 3,
                "type": "show"
            }])),
            "episodes": page(json!([{
                "id": "e1",
                "name": "Episode",
                "description": "An episode",
                "duration_ms": 1000,
                "explicit": false,
                "audio_preview_url": null,
                "href": "https://api.spotify.com/v1/episodes/e1",
                "uri": "spotify:episode:e1",
                "release_date": "2023",
                "release_date_precision": "year",
                "type": "episode"
            }])),
            "audiobooks": page(json!([{
                "id": "a1",
                "name": "Audiobook",
                "authors": [{ "name": "Author" }],
                "narrators": [],
                "publisher": "Publisher",
                "description": "An audiobook",
                "explicit": false,
                "href": "https://api.spotify.com/v1/audiobooks/a1",
                "uri": "spotify:audiobook:a1",
                "media_type": "audio",
                "total_chapters": 12,
                "type": "audiobook"
            }]))
        }))
        .unwrap();

        assert_eq!(result.shows.unwrap().items[0].id, "s1");
        assert_eq!(result.episodes.unwrap().items[0].id, "e1");
        assert_eq!(result.audiobooks.unwrap().items[0].total_chapters, 12);
        assert_eq!(result.tracks, None);
    }

    #[test]
    fn types_string_is_deduplicated() {
        assert_eq!(
            [ItemType::Track, ItemType::Album, ItemType::Track].to_types_string(),
            "track,album"
        );
    }
}
