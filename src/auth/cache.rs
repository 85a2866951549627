use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::RwLock,
};

use log::{debug, warn};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use super::TokenInfo;
use crate::error::{Error, Result};

const DEFAULT_CACHE_FILE: &str = ".spotify_sdk_token.json";

/// A single-slot store for a provider's current token. Storing a token replaces the previous one.
///
/// Implementations are shared between threads and tasks, so they have to do their own locking.
pub trait TokenCache: Send + Sync {
    fn get(&self) -> Option<TokenInfo>;
    fn set(&self, token: &TokenInfo) -> Result<()>;
}

/// Keeps the token in memory. The default cache for every provider.
#[derive(Debug, Default)]
pub struct InMemoryTokenCache {
    token: RwLock<Option<TokenInfo>>,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenCache for InMemoryTokenCache {
    fn get(&self) -> Option<TokenInfo> {
        self.token.read().expect("token cache rwlock poisoned").clone()
    }

    fn set(&self, token: &TokenInfo) -> Result<()> {
        *self.token.write().expect("token cache rwlock poisoned") = Some(token.clone());
        Ok(())
    }
}

/// Persists the token as a JSON object in a file, so it survives restarts.
///
/// A missing, unreadable or malformed file reads as no token. Optional fields with the wrong type are ignored. Writes
/// replace the file atomically and restrict its permissions to the owner on Unix.
#[derive(Debug, Clone)]
pub struct FileTokenCache {
    path: PathBuf,
}

impl Default for FileTokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_FILE)
    }
}

impl FileTokenCache {
    pub fn new<P>(path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomically(&self, contents: &[u8]) -> std::io::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::create_dir_all(parent)?;

        // one temp file per writer
        let mut file = NamedTempFile::new_in(parent)?;
        file.write_all(contents)?;
        file.as_file().sync_all()?;

        restrict_permissions(file.path());
        file.persist(&self.path).map(drop).map_err(|e| e.error)
    }
}

impl TokenCache for FileTokenCache {
    fn get(&self) -> Option<TokenInfo> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("Token cache file {} not readable: {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(payload)) => token_from_payload(&payload),
            Ok(_) => None,
            Err(e) => {
                warn!("Token cache file {} contains invalid JSON: {e}", self.path.display());
                None
            }
        }
    }

    fn set(&self, token: &TokenInfo) -> Result<()> {
        let contents = serde_json::to_vec(token)?;
        self.write_atomically(&contents).map_err(Error::TokenCache)?;

        debug!("Stored token in cache file {}", self.path.display());
        Ok(())
    }
}

fn token_from_payload(payload: &Map<String, Value>) -> Option<TokenInfo> {
    let access_token = payload.get("access_token")?.as_str()?;
    let expires_at = match payload.get("expires_at")? {
        Value::Number(number) => number.as_f64()?,
        Value::String(string) => string.trim().parse().ok()?,
        _ => return None,
    };

    let optional_string = |key: &str| payload.get(key).and_then(Value::as_str).map(str::to_owned);

    Some(TokenInfo {
        access_token: access_token.to_owned(),
        expires_at,
        refresh_token: optional_string("refresh_token"),
        scope: optional_string("scope"),
    })
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        warn!("Failed to restrict token cache file permissions: {e}");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::{FileTokenCache, InMemoryTokenCache, TokenCache};
    use crate::auth::TokenInfo;

    #[test]
    fn in_memory_cache_overwrites() {
        let cache = InMemoryTokenCache::new();
        assert_eq!(cache.get(), None);

        cache.set(&TokenInfo::new("first", 1.0)).unwrap();
        cache.set(&TokenInfo::new("second", 2.0)).unwrap();

        assert_eq!(cache.get(), Some(TokenInfo::new("second", 2.0)));
    }

    #[test]
    fn file_cache_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileTokenCache::new(dir.path().join("token.json"));
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn file_cache_round_trip_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("token.json");
        let cache = FileTokenCache::new(&path);

        let token = TokenInfo::new("access", 1234.5).refresh_token("refresh").scope("user-top-read");
        cache.set(&token).unwrap();

        assert!(path.exists());
        assert_eq!(cache.get(), Some(token));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains('\n'));
        assert!(!contents.contains(": "));
    }

    #[test]
    fn concurrent_writers_leave_a_whole_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");

        std::thread::scope(|scope| {
            for writer in 0..4 {
                let cache = FileTokenCache::new(&path);

                scope.spawn(move || {
                    for round in 0..50 {
                        let token = TokenInfo::new(format!("access-{writer}-{round}"), f64::from(round))
                            .refresh_token("refresh");
                        cache.set(&token).unwrap();
                    }
                });
            }

            let reader = FileTokenCache::new(&path);
            scope.spawn(move || {
                for _ in 0..200 {
                    if reader.path().exists() {
                        let token = reader.get().expect("token file was read while partially written");
                        assert!(token.access_token.starts_with("access-"));
                        assert_eq!(token.refresh_token.as_deref(), Some("refresh"));
                    }
                }
            });
        });

        assert!(FileTokenCache::new(&path).get().is_some());
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn file_cache_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        FileTokenCache::new(&path).set(&TokenInfo::new("access", 1.0)).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn file_cache_invalid_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let cache = FileTokenCache::new(&path);

        for contents in [
            "not json",
            "[]",
            r#"{"expires_at": 1.0}"#,
            r#"{"access_token": "access"}"#,
            r#"{"access_token": 5, "expires_at": 1.0}"#,
            r#"{"access_token": "access", "expires_at": "soon"}"#,
        ] {
            std::fs::write(&path, contents).unwrap();
            assert_eq!(cache.get(), None, "{contents}");
        }
    }

    #[test]
    fn file_cache_ignores_invalid_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(
            &path,
            r#"{"access_token": "access", "expires_at": "99.5", "refresh_token": 12, "scope": null}"#,
        )
        .unwrap();

        assert_eq!(FileTokenCache::new(&path).get(), Some(TokenInfo::new("access", 99.5)));
    }
}
