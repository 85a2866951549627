//! Show (podcast) and episode models.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{page::Page, Copyright, DatePrecision, ExternalUrls, Image, Restrictions, ResumePoint};

/// A simplified show, as embedded in episodes, saved shows and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedShow {
    pub id: String,
    pub name: String,
    pub publisher: String,
    pub description: String,
    pub html_description: Option<String>,
    pub explicit: bool,
    #[serde(default)]
    pub available_markets: Vec<String>,
    #[serde(default)]
    pub copyrights: Vec<Copyright>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub href: String,
    pub uri: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub is_externally_hosted: Option<bool>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub media_type: String,
    pub total_episodes: u32,
}

/// A full show, including the first page of its episodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    #[serde(flatten)]
    pub show: SimplifiedShow,
    pub episodes: Page<SimplifiedEpisode>,
}

/// A simplified episode, as embedded in shows and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedEpisode {
    pub id: String,
    pub name: String,
    pub description: String,
    pub html_description: Option<String>,
    #[serde(rename = "duration_ms", with = "crate::util::duration_millis")]
    pub duration: Duration,
    pub explicit: bool,
    pub audio_preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub href: String,
    pub uri: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub is_externally_hosted: Option<bool>,
    pub is_playable: Option<bool>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub release_date: String,
    pub release_date_precision: DatePrecision,
    pub restrictions: Option<Restrictions>,
    /// Only present with a user's access token that has the `user-read-playback-position`
    /// [scope](crate::scope::Scope).
    pub resume_point: Option<ResumePoint>,
}

/// A full episode, including the show it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(flatten)]
    pub episode: SimplifiedEpisode,
    pub show: SimplifiedShow,
}

/// A show in the current user's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedShow {
    /// When the show was saved, as an ISO 8601 timestamp.
    pub added_at: String,
    pub show: SimplifiedShow,
}

/// An episode in the current user's library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedEpisode {
    pub added_at: String,
    pub episode: Episode,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Episode;

    #[test]
    fn episode_with_show() {
        let episode: Episode = serde_json::from_value(json!({
            "id": "e1",
            "name": "Episode",
            "description": "An episode",
            "html_description": "<p>An episode</p>",
            "duration_ms": 1500,
            "explicit": false,
            "audio_preview_url": null,
            "external_urls": { "spotify": "https://open.spotify.com/episode/e1" },
            "href": "https://api.spotify.com/v1/episodes/e1",
            "uri": "spotify:episode:e1",
            "images": [],
            "is_externally_hosted": false,
            "is_playable": true,
            "languages": ["en"],
            "release_date": "2023-05",
            "release_date_precision": "month",
            "resume_point": { "fully_played": false, "resume_position_ms": 300 },
            "type": "episode",
            "show": {
                "id": "s1",
                "name": "Show",
                "publisher": "Publisher",
                "description": "A show",
                "explicit": false,
                "href": "https://api.spotify.com/v1/shows/s1",
                "uri": "spotify:show:s1",
                "media_type": "audio",
                "total_episodes": 10,
                "type": "show"
            }
        }))
        .unwrap();

        assert_eq!(episode.episode.duration.as_millis(), 1500);
        assert_eq!(episode.episode.resume_point.map(|point| point.fully_played), Some(false));
        assert_eq!(episode.show.total_episodes, 10);
        assert!(episode.show.copyrights.is_empty());
    }
}
