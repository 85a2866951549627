use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// An access token and the information needed to decide when to refresh it. Refreshing a token produces a new
/// `TokenInfo` instead of modifying an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    /// Unix timestamp in seconds after which the token is no longer valid.
    pub expires_at: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenInfo {
    pub fn new<S>(access_token: S, expires_at: f64) -> Self
    where
        S: Into<String>,
    {
        Self {
            access_token: access_token.into(),
            expires_at,
            refresh_token: None,
            scope: None,
        }
    }

    /// A token that expires `expires_in` from now.
    pub fn expiring_in<S>(access_token: S, expires_in: Duration) -> Self
    where
        S: Into<String>,
    {
        Self::new(access_token, now_epoch() + expires_in.as_secs_f64())
    }

    pub fn refresh_token<S>(self, refresh_token: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            refresh_token: Some(refresh_token.into()),
            ..self
        }
    }

    pub fn scope<S>(self, scope: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            scope: Some(scope.into()),
            ..self
        }
    }

    /// Whether the token has expired or expires within `skew` from now.
    pub fn is_expired(&self, skew: Duration) -> bool {
        now_epoch() >= self.expires_at - skew.as_secs_f64()
    }
}

/// Current time as Unix seconds.
pub(crate) fn now_epoch() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{now_epoch, TokenInfo};

    #[test]
    fn expiry_honours_skew() {
        let token = TokenInfo::expiring_in("token", Duration::from_secs(60));
        assert!(!token.is_expired(Duration::ZERO));
        assert!(!token.is_expired(Duration::from_secs(30)));
        assert!(token.is_expired(Duration::from_secs(60)));
        assert!(token.is_expired(Duration::from_secs(90)));
    }

    #[test]
    fn past_token_is_expired() {
        let token = TokenInfo::new("token", now_epoch() - 1.0);
        assert!(token.is_expired(Duration::ZERO));
    }

    #[test]
    fn optional_fields_are_skipped() {
        let token = TokenInfo::new("token", 100.0);
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json, serde_json::json!({ "access_token": "token", "expires_at": 100.0 }));

        let token = token.refresh_token("refresh").scope("user-read-private");
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["refresh_token"], "refresh");
        assert_eq!(json["scope"], "user-read-private");
    }
}
