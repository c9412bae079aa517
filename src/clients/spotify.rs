use std::future::Future;

use log::debug;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::clients::{
    entities::Track,
    errors::{Error, Result},
};
use rspotify::{AuthCodeSpotify, Config, Credentials, OAuth, Token, prelude::*, scopes};

/// Spotify Web API root used unless configured otherwise
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

#[derive(Deserialize, Debug)]
struct SpotifyArtist {
    name: String,
}

#[derive(Deserialize, Debug)]
struct SpotifyImage {
    url: String,
}

#[derive(Deserialize, Debug)]
struct SpotifyAlbum {
    images: Vec<SpotifyImage>,
}

#[derive(Deserialize, Debug)]
struct SpotifyExternalUrls {
    spotify: String,
}

#[derive(Deserialize, Debug)]
struct SpotifyTrack {
    id: String,
    name: String,
    artists: Vec<SpotifyArtist>,
    album: SpotifyAlbum,
    external_urls: SpotifyExternalUrls,
}

#[derive(Deserialize, Debug)]
struct TopTracksPage {
    items: Vec<SpotifyTrack>,
}

impl From<SpotifyTrack> for Track {
    fn from(t: SpotifyTrack) -> Track {
        let artist = t
            .artists
            .into_iter()
            .map(|a| a.name)
            .collect::<Vec<_>>()
            .join(", ");
        Track {
            id: t.id,
            title: t.name,
            artist,
            album_art: t
                .album
                .images
                .into_iter()
                .next()
                .map(|i| i.url)
                .unwrap_or_default(),
            spotify_url: t.external_urls.spotify,
        }
    }
}

/// Parse a `/me/top/tracks` page into normalized tracks, keeping upstream order
pub fn parse_top_tracks(body: &str) -> Result<Vec<Track>> {
    let page: TopTracksPage = serde_json::from_str(body)?;
    Ok(page.items.into_iter().map(Track::from).collect())
}

/// Raw answer of the top tracks endpoint, interpreted by the proxy
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

/// Anything able to ask Spotify for the listener's top tracks
pub trait TopTracksSource {
    fn top_tracks(&self, limit: usize) -> impl Future<Output = Result<UpstreamResponse>> + Send;
}

/// Spotify top tracks client authenticating with a long-lived refresh token
pub struct SpotifyClient {
    spotify: AuthCodeSpotify,
    http: reqwest::Client,
    api_base_url: String,
    // Held while checking and refreshing the access token
    refresh_lock: Mutex<()>,
}

impl SpotifyClient {
    pub fn new(spotify: AuthCodeSpotify, api_base_url: impl Into<String>) -> Self {
        SpotifyClient {
            spotify,
            http: reqwest::Client::new(),
            api_base_url: api_base_url.into(),
            refresh_lock: Mutex::new(()),
        }
    }

    // The access token is obtained lazily from the refresh token on the first request
    pub fn with_refresh_token(
        creds: Credentials,
        refresh_token: String,
        api_base_url: impl Into<String>,
    ) -> Self {
        let token = Token {
            refresh_token: Some(refresh_token),
            ..Default::default()
        };
        let oauth = OAuth {
            scopes: scopes!("user-top-read"),
            ..Default::default()
        };
        let spotify = AuthCodeSpotify::from_token_with_config(token, creds, oauth, Config::default());
        Self::new(spotify, api_base_url)
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    // Current access token, refreshed first when missing or expired
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.valid_access_token().await? {
            return Ok(token);
        }
        let _refreshing = self.refresh_lock.lock().await;
        // Another request may have refreshed while we waited
        if let Some(token) = self.valid_access_token().await? {
            return Ok(token);
        }
        debug!("Refreshing Spotify access token ...");
        self.spotify.refresh_token().await?;
        self.valid_access_token()
            .await?
            .ok_or_else(|| Error::TokenUnavailable("no refresh token to obtain one from".into()))
    }

    async fn valid_access_token(&self) -> Result<Option<String>> {
        let token = self.spotify.get_token();
        let token = token
            .lock()
            .await
            .map_err(|_| Error::TokenUnavailable("token lock poisoned".into()))?;
        Ok(token
            .as_ref()
            .filter(|t| !t.is_expired())
            .map(|t| t.access_token.clone()))
    }
}

impl TopTracksSource for SpotifyClient {
    async fn top_tracks(&self, limit: usize) -> Result<UpstreamResponse> {
        let access_token = self.access_token().await?;
        let url = format!("{}/me/top/tracks", self.api_base_url.trim_end_matches('/'));
        debug!("Requesting {limit} top tracks from {url}");
        let response = self
            .http
            .get(url)
            .query(&[("limit", limit)])
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("Spotify answered with status {status}");
        Ok(UpstreamResponse { status, body })
    }
}
