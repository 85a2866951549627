//! OAuth authorization scopes.
//!
//! [Spotify documentation on scopes.](https://developer.spotify.com/documentation/web-api/concepts/scopes)

use std::{fmt::Display, str::FromStr};

use crate::error::Error;

/// Joins scopes into the space-separated form the accounts service expects.
pub trait ToScopesString {
    fn to_scopes_string(self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    UgcImageUpload,
    UserReadPlaybackState,
    UserModifyPlaybackState,
    UserReadCurrentlyPlaying,
    AppRemoteControl,
    Streaming,
    PlaylistReadPrivate,
    PlaylistReadCollaborative,
    PlaylistModifyPrivate,
    PlaylistModifyPublic,
    UserFollowModify,
    UserFollowRead,
    UserReadPlaybackPosition,
    UserTopRead,
    UserReadRecentlyPlayed,
    UserLibraryModify,
    UserLibraryRead,
    UserReadEmail,
    UserReadPrivate,
}

const ALL_SCOPES: [Scope; 19] = [
    Scope::UgcImageUpload,
    Scope::UserReadPlaybackState,
    Scope::UserModifyPlaybackState,
    Scope::UserReadCurrentlyPlaying,
    Scope::AppRemoteControl,
    Scope::Streaming,
    Scope::PlaylistReadPrivate,
    Scope::PlaylistReadCollaborative,
    Scope::PlaylistModifyPrivate,
    Scope::PlaylistModifyPublic,
    Scope::UserFollowModify,
    Scope::UserFollowRead,
    Scope::UserReadPlaybackPosition,
    Scope::UserTopRead,
    Scope::UserReadRecentlyPlayed,
    Scope::UserLibraryModify,
    Scope::UserLibraryRead,
    Scope::UserReadEmail,
    Scope::UserReadPrivate,
];

impl Scope {
    pub fn all() -> impl Iterator<Item = Scope> {
        ALL_SCOPES.into_iter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::UgcImageUpload => "ugc-image-upload",
            Scope::UserReadPlaybackState => "user-read-playback-state",
            Scope::UserModifyPlaybackState => "user-modify-playback-state",
            Scope::UserReadCurrentlyPlaying => "user-read-currently-playing",
            Scope::AppRemoteControl => "app-remote-control",
            Scope::Streaming => "streaming",
            Scope::PlaylistReadPrivate => "playlist-read-private",
            Scope::PlaylistReadCollaborative => "playlist-read-collaborative",
            Scope::PlaylistModifyPrivate => "playlist-modify-private",
            Scope::PlaylistModifyPublic => "playlist-modify-public",
            Scope::UserFollowModify => "user-follow-modify",
            Scope::UserFollowRead => "user-follow-read",
            Scope::UserReadPlaybackPosition => "user-read-playback-position",
            Scope::UserTopRead => "user-top-read",
            Scope::UserReadRecentlyPlayed => "user-read-recently-played",
            Scope::UserLibraryModify => "user-library-modify",
            Scope::UserLibraryRead => "user-library-read",
            Scope::UserReadEmail => "user-read-email",
            Scope::UserReadPrivate => "user-read-private",
        }
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::all()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| Error::Configuration(format!("unknown scope: {s}")))
    }
}

impl<I> ToScopesString for I
where
    I: IntoIterator<Item = Scope>,
{
    fn to_scopes_string(self) -> String {
        self.into_iter()
            .map(|scope| scope.as_str())
            .collect::<Vec<&str>>()
            .join(" ")
    }
}
