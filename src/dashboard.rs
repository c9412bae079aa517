//! Song list consumer that never ends up empty.
//!
//! The dashboard starts out with a built-in list and swaps in the proxy's
//! answer only when it arrives intact. Any failure keeps the built-in list.

use std::fmt::Write;

use log::{info, warn};

use crate::clients::entities::{StaticTrack, TopTracks, Track};
use crate::clients::errors::{Error, Result};

/// Songs shown until (or instead of) the live top tracks
pub const DEFAULT_TRACKS: [StaticTrack; 6] = [
    StaticTrack {
        id: "1",
        title: "Blinding Lights",
        artist: "The Weeknd",
        album_art: "https://i.scdn.co/image/ab67616d0000b2738863bc11d2aa12b54f5aeb36",
        spotify_url: "#",
    },
    StaticTrack {
        id: "2",
        title: "Someone You Loved",
        artist: "Lewis Capaldi",
        album_art: "https://i.scdn.co/image/ab67616d0000b273fc2101e6889d6ce9025f85f2",
        spotify_url: "#",
    },
    StaticTrack {
        id: "3",
        title: "Shape of You",
        artist: "Ed Sheeran",
        album_art: "https://i.scdn.co/image/ab67616d0000b273ba5db46f4b838ef6027e6f96",
        spotify_url: "#",
    },
    StaticTrack {
        id: "4",
        title: "Starboy",
        artist: "The Weeknd",
        album_art: "https://i.scdn.co/image/ab67616d0000b2734718e2b124f79258be7bc452",
        spotify_url: "#",
    },
    StaticTrack {
        id: "5",
        title: "Levitating",
        artist: "Dua Lipa",
        album_art: "https://i.scdn.co/image/ab67616d0000b273be841ba4bc24340152e3a79a",
        spotify_url: "#",
    },
    StaticTrack {
        id: "6",
        title: "Save Your Tears",
        artist: "The Weeknd",
        album_art: "https://i.scdn.co/image/ab67616d0000b2738863bc11d2aa12b54f5aeb36",
        spotify_url: "#",
    },
];

/// Owned copy of [`DEFAULT_TRACKS`]
pub fn default_tracks() -> Vec<Track> {
    DEFAULT_TRACKS.iter().map(Track::from).collect()
}

/// Where the song list comes from right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSource {
    /// The built-in [`DEFAULT_TRACKS`]
    Defaults,
    /// Tracks fetched from the proxy
    Live,
}

/// Song list backed by the top tracks proxy
pub struct Dashboard {
    http: reqwest::Client,
    endpoint: String,
    tracks: Vec<Track>,
    source: TrackSource,
}

impl Dashboard {
    /// Dashboard fetching from the proxy at `endpoint`, showing the defaults meanwhile
    pub fn new(endpoint: impl Into<String>) -> Self {
        Dashboard {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            tracks: default_tracks(),
            source: TrackSource::Defaults,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn source(&self) -> TrackSource {
        self.source
    }

    /// Ask the proxy once; swap in its tracks or silently keep what is shown
    pub async fn refresh(&mut self) {
        match self.fetch().await {
            Ok(tracks) => {
                info!("Showing {} live top tracks", tracks.len());
                self.tracks = tracks;
                self.source = TrackSource::Live;
            }
            Err(e) => {
                // Keep default songs on error
                warn!("Failed to fetch top tracks: {e}");
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<Track>> {
        let response = self.http.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::ProxyStatus(status.as_u16()));
        }
        let body = response.text().await?;
        let TopTracks { tracks } = serde_json::from_str(&body)?;
        if tracks.is_empty() {
            return Err(Error::NoTracks);
        }
        Ok(tracks)
    }

    /// Plain text song list, one numbered line per track
    pub fn render(&self) -> String {
        render(&self.tracks)
    }
}

/// Numbered song lines, each followed by its cover URL when there is one
pub fn render(tracks: &[Track]) -> String {
    let mut out = String::from("Top songs\n");
    for (i, track) in tracks.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} by {} <{}>",
            i + 1,
            track.title,
            track.artist,
            track.spotify_url
        );
        if !track.album_art.is_empty() {
            let _ = writeln!(out, "    cover: {}", track.album_art);
        }
    }
    out
}
