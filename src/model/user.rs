use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ExternalUrls, Followers, Image};

/// Information about a user's explicit content settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitContent {
    /// When `true`, indicates that explicit content should not be played.
    pub filter_enabled: bool,
    /// When `true`, indicates that the explicit content setting is locked and can't be changed by the user.
    pub filter_locked: bool,
}

/// Publicly available information about a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub followers: Option<Followers>,
    pub href: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub uri: Option<String>,
}

/// The current user's profile. Fields other than the public ones require the matching
/// [scopes](crate::scope::Scope).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub followers: Option<Followers>,
    pub href: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub uri: Option<String>,
    /// Requires [UserReadPrivate](crate::scope::Scope::UserReadPrivate).
    pub country: Option<String>,
    /// Requires [UserReadEmail](crate::scope::Scope::UserReadEmail).
    pub email: Option<String>,
    pub explicit_content: Option<ExplicitContent>,
    /// The user's subscription level, e.g. `premium` or `free`.
    pub product: Option<String>,
}

/// Over what time frame a user's top items are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Calculated from about a year of data.
    LongTerm,
    /// Approximately the last 6 months.
    MediumTerm,
    /// Approximately the last 4 weeks.
    ShortTerm,
}

/// The kinds of items the current user can follow by ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowType {
    Artist,
    User,
}

#[derive(Debug, Serialize)]
pub(crate) struct FollowPlaylist {
    pub public: bool,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::LongTerm => "long_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::ShortTerm => "short_term",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FollowType {
    pub fn as_str(self) -> &'static str {
        match self {
            FollowType::Artist => "artist",
            FollowType::User => "user",
        }
    }
}

impl fmt::Display for FollowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CurrentUser> for PublicUser {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            external_urls: user.external_urls,
            followers: user.followers,
            href: user.href,
            images: user.images,
            uri: user.uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CurrentUser;

    #[test]
    fn current_user_without_private_fields() {
        let user: CurrentUser = serde_json::from_value(serde_json::json!({
            "display_name": "Someone",
            "external_urls": { "spotify": "https://open.spotify.com/user/someone" },
            "followers": { "href": null, "total": 3 },
            "href": "https://api.spotify.com/v1/users/someone",
            "id": "someone",
            "images": [],
            "type": "user",
            "uri": "spotify:user:someone"
        }))
        .unwrap();

        assert_eq!(user.id, "someone");
        assert_eq!(user.followers.map(|followers| followers.total), Some(3));
        assert_eq!(user.email, None);
        assert_eq!(user.explicit_content, None);
    }
}
