//! Audiobook and chapter models.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{page::Page, Copyright, DatePrecision, ExternalUrls, Image, Restrictions, ResumePoint};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrator {
    pub name: String,
}

/// A simplified audiobook, as embedded in chapters and search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedAudiobook {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub narrators: Vec<Narrator>,
    pub publisher: String,
    pub description: String,
    pub html_description: Option<String>,
    pub edition: Option<String>,
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
    #[serde(default)]
    pub languages: Vec<String>,
    pub media_type: String,
    pub total_chapters: u32,
}

/// A full audiobook, including the first page of its chapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audiobook {
    #[serde(flatten)]
    pub audiobook: SimplifiedAudiobook,
    pub chapters: Page<SimplifiedChapter>,
}

/// A simplified chapter, as embedded in audiobooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedChapter {
    pub id: String,
    pub name: String,
    pub chapter_number: u32,
    pub description: String,
    pub html_description: Option<String>,
    #[serde(rename = "duration_ms", with = "crate::util::duration_millis")]
    pub duration: Duration,
    pub explicit: bool,
    pub audio_preview_url: Option<String>,
    #[serde(default)]
    pub available_markets: Vec<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub href: String,
    pub uri: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub is_playable: Option<bool>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub release_date: String,
    pub release_date_precision: DatePrecision,
    pub restrictions: Option<Restrictions>,
    pub resume_point: Option<ResumePoint>,
}

/// A full chapter, including the audiobook it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(flatten)]
    pub chapter: SimplifiedChapter,
    pub audiobook: SimplifiedAudiobook,
}

/// The response of the several audiobooks endpoint. Audiobooks that aren't available are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[doc(hidden)]
pub struct Audiobooks {
    audiobooks: Vec<Option<Audiobook>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[doc(hidden)]
pub struct Chapters {
    chapters: Vec<Option<Chapter>>,
}

impl From<Audiobooks> for Vec<Option<Audiobook>> {
    fn from(audiobooks: Audiobooks) -> Self {
        audiobooks.audiobooks
    }
}

impl From<Chapters> for Vec<Option<Chapter>> {
    fn from(chapters: Chapters) -> Self {
        chapters.chapters
    }
}
