use reqwest::Method;

use crate::{
    client::{
        request_builder::{
            segment, validate, BaseRequestBuilderContainer, CursorPagedRequestBuilder, RequestBuilder,
            TopItemsRequestBuilder,
        },
        IDS_QUERY,
    },
    http::HttpClient,
    model::{
        artist::{Artist, FollowedArtists},
        page::{CursorPage, Page},
        track::Track,
        user::{CurrentUser, FollowPlaylist, FollowType, PublicUser},
    },
    transport::Transport,
};

const TYPE_QUERY: &str = "type";

/// The most artists or users that can be followed, unfollowed or checked in one request.
pub const MAX_FOLLOW_IDS: usize = 50;
/// The most users that can be checked for following a playlist in one request.
pub const MAX_PLAYLIST_FOLLOWER_IDS: usize = 5;

/// User profile, top items and following endpoints. Returned from
/// [SpotifyClient::users](crate::client::SpotifyClient::users).
#[derive(Debug)]
pub struct UserService<'a, C>
where
    C: HttpClient,
{
    transport: &'a Transport<C>,
}

impl<'a, C> UserService<'a, C>
where
    C: HttpClient,
{
    pub(crate) fn new(transport: &'a Transport<C>) -> Self {
        Self { transport }
    }

    /// Get the current user's profile.
    pub fn current_profile(&self) -> RequestBuilder<'a, C, CurrentUser> {
        RequestBuilder::new(self.transport, Method::GET, "me")
    }

    /// Get a user's public profile.
    pub fn get(&self, user_id: &str) -> RequestBuilder<'a, C, PublicUser> {
        RequestBuilder::new(self.transport, Method::GET, format!("users/{}", segment(user_id)))
            .validate(validate::id(user_id, "user ID"))
    }

    /// Get a page of the current user's top artists. Requires the `user-top-read` [scope](crate::scope::Scope).
    pub fn top_artists(&self) -> TopItemsRequestBuilder<'a, C, Page<Artist>> {
        TopItemsRequestBuilder::from_base_builder(RequestBuilder::new(self.transport, Method::GET, "me/top/artists"))
    }

    /// Get a page of the current user's top tracks. Requires the `user-top-read` [scope](crate::scope::Scope).
    pub fn top_tracks(&self) -> TopItemsRequestBuilder<'a, C, Page<Track>> {
        TopItemsRequestBuilder::from_base_builder(RequestBuilder::new(self.transport, Method::GET, "me/top/tracks"))
    }

    /// Follow a playlist as the current user. If `public` is given, it sets whether the playlist is shown in the
    /// user's public playlists.
    pub fn follow_playlist(&self, id: &str, public: Option<bool>) -> RequestBuilder<'a, C, ()> {
        let builder = RequestBuilder::new(self.transport, Method::PUT, format!("playlists/{}/followers", segment(id)))
            .validate(validate::id(id, "playlist ID"));

        match public {
            Some(public) => builder.json_body(&FollowPlaylist { public }),
            None => builder,
        }
    }

    /// Unfollow a playlist as the current user.
    pub fn unfollow_playlist(&self, id: &str) -> RequestBuilder<'a, C, ()> {
        RequestBuilder::new(self.transport, Method::DELETE, format!("playlists/{}/followers", segment(id)))
            .validate(validate::id(id, "playlist ID"))
    }

    /// Get a page of the artists the current user follows. Requires the `user-follow-read`
    /// [scope](crate::scope::Scope::UserFollowRead).
    pub fn followed_artists(&self) -> CursorPagedRequestBuilder<'a, C, FollowedArtists, CursorPage<Artist>> {
        CursorPagedRequestBuilder::from_base_builder(
            RequestBuilder::new(self.transport, Method::GET, "me/following").query(TYPE_QUERY, FollowType::Artist),
        )
    }

    /// Follow up to 50 artists or users as the current user. Requires the `user-follow-modify`
    /// [scope](crate::scope::Scope::UserFollowModify).
    pub fn follow<S>(&self, follow_type: FollowType, ids: &[S]) -> RequestBuilder<'a, C, ()>
    where
        S: AsRef<str>,
    {
        self.following_request(Method::PUT, "me/following", follow_type, ids)
    }

    /// Unfollow up to 50 artists or users as the current user.
    pub fn unfollow<S>(&self, follow_type: FollowType, ids: &[S]) -> RequestBuilder<'a, C, ()>
    where
        S: AsRef<str>,
    {
        self.following_request(Method::DELETE, "me/following", follow_type, ids)
    }

    /// Check whether the current user follows up to 50 artists or users. The result is in the same order as the given
    /// IDs.
    pub fn follows<S>(&self, follow_type: FollowType, ids: &[S]) -> RequestBuilder<'a, C, Vec<bool>>
    where
        S: AsRef<str>,
    {
        self.following_request(Method::GET, "me/following/contains", follow_type, ids)
    }

    /// Check whether up to 5 users follow a playlist. The result is in the same order as the given user IDs.
    pub fn users_follow_playlist<S>(&self, id: &str, user_ids: &[S]) -> RequestBuilder<'a, C, Vec<bool>>
    where
        S: AsRef<str>,
    {
        RequestBuilder::new(
            self.transport,
            Method::GET,
            format!("playlists/{}/followers/contains", segment(id)),
        )
        .validate(validate::id(id, "playlist ID"))
        .validate(validate::ids(user_ids, "user IDs", MAX_PLAYLIST_FOLLOWER_IDS))
        .query(IDS_QUERY, validate::joined(user_ids))
    }

    fn following_request<S, TResponse>(
        &self,
        method: Method,
        path: &str,
        follow_type: FollowType,
        ids: &[S],
    ) -> RequestBuilder<'a, C, TResponse>
    where
        S: AsRef<str>,
    {
        RequestBuilder::new(self.transport, method, path)
            .validate(validate::ids(ids, "IDs", MAX_FOLLOW_IDS))
            .query(TYPE_QUERY, follow_type)
            .query(IDS_QUERY, validate::joined(ids))
    }
}
