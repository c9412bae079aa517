use std::net::SocketAddr;

use rspotify::Credentials;

use crate::clients::{
    errors::{Error, Result},
    spotify::{DEFAULT_API_BASE_URL, SpotifyClient},
};

/// Address the proxy listens on unless configured otherwise
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Configuration for the proxy server
pub struct Config {
    pub spotify: SpotifyClient,
    pub bind_addr: SocketAddr,
}

/// Collects explicit settings and fills the rest in from the environment
#[derive(Default)]
pub struct ConfigBuilder {
    spotify: Option<SpotifyClient>,
    bind_addr: Option<SocketAddr>,
    api_base_url: Option<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn spotify(mut self, spotify: SpotifyClient) -> Self {
        self.spotify = Some(spotify);
        self
    }

    #[must_use]
    pub fn bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = Some(bind_addr);
        self
    }

    /// Spotify Web API root, used only when the client is built from the environment
    #[must_use]
    pub fn api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = Some(api_base_url.into());
        self
    }

    /// Build from the process environment (and `.env`, once loaded by `main`)
    pub fn build(self) -> Result<Config> {
        self.build_with(|key| std::env::var(key).ok())
    }

    /// Build, reading unset values through `env`
    pub fn build_with(self, env: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let bind_addr = match self.bind_addr {
            Some(a) => a,
            None => env("TOPDECK_BIND_ADDR")
                .as_deref()
                .unwrap_or(DEFAULT_BIND_ADDR)
                .parse()?,
        };
        let spotify = match self.spotify {
            Some(s) => s,
            None => {
                let api_base_url = self
                    .api_base_url
                    .or_else(|| env("TOPDECK_API_BASE_URL"))
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
                let creds = Credentials::new(
                    &required(&env, "RSPOTIFY_CLIENT_ID")?,
                    &required(&env, "RSPOTIFY_CLIENT_SECRET")?,
                );
                let refresh_token = required(&env, "SPOTIFY_REFRESH_TOKEN")?;
                SpotifyClient::with_refresh_token(creds, refresh_token, api_base_url)
            }
        };
        Ok(Config { spotify, bind_addr })
    }
}

fn required(env: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    env(key)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::ConfigurationError(format!("Missing {key} in environment variables")))
}
