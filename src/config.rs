use std::fmt;

use anyhow::{bail, Result};

const PLAYLIST_URL: &str = "https://open.spotify.com/playlist/3OK8UdRoB6IfDEa1pNJTQE";
const BUCKET: &str = "spotifyv";
const KEY_PREFIX: &str = "raw-data/to_processed/";
const WARM_UP_USER: &str = "spotify";
const API_URL: &str = "https://api.spotify.com/v1";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub playlist_url: String,
    pub bucket: String,
    pub key_prefix: String,
    /// Account whose playlists are listed before the extraction. `None` skips the call.
    pub warm_up_user: Option<String>,
    pub api_url: String,
    pub token_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            playlist_url: PLAYLIST_URL.to_string(),
            bucket: BUCKET.to_string(),
            key_prefix: KEY_PREFIX.to_string(),
            warm_up_user: Some(WARM_UP_USER.to_string()),
            api_url: API_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    // Missing credentials stay empty so the token exchange rejects them.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let warm_up_user = match lookup("WARM_UP_USER") {
            Some(user) if user.is_empty() => None,
            Some(user) => Some(user),
            None => Some(WARM_UP_USER.to_string()),
        };

        Self {
            credentials: Credentials {
                client_id: lookup("client_id").unwrap_or_default(),
                client_secret: lookup("client_secret").unwrap_or_default(),
            },
            playlist_url: or_default("PLAYLIST_URL", PLAYLIST_URL),
            bucket: or_default("BUCKET", BUCKET),
            key_prefix: or_default("KEY_PREFIX", KEY_PREFIX),
            warm_up_user,
            api_url: or_default("SPOTIFY_API_URL", API_URL),
            token_url: or_default("SPOTIFY_TOKEN_URL", TOKEN_URL),
        }
    }

    pub fn playlist_id(&self) -> Result<&str> {
        match self.playlist_url.rsplit('/').next() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => bail!("no playlist id in url '{}'", self.playlist_url),
        }
    }
}
