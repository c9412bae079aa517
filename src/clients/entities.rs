use serde::{Deserialize, Serialize};

/// Number of top tracks requested from Spotify and handed out to clients
pub const TOP_TRACKS_LIMIT: usize = 6;

/// Normalized song record exposed to the dashboard
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String, // comma joined artist names
    pub album_art: String,
    pub spotify_url: String,
}

/// Body of a successful top tracks response
#[derive(Serialize, Deserialize, Debug)]
pub struct TopTracks {
    pub tracks: Vec<Track>,
}

/// Body of a failed top tracks response
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

/// Compile time song record, used for the dashboard defaults
#[derive(Debug)]
pub struct StaticTrack {
    pub id: &'static str,
    pub title: &'static str,
    pub artist: &'static str,
    pub album_art: &'static str,
    pub spotify_url: &'static str,
}

impl From<&StaticTrack> for Track {
    fn from(t: &StaticTrack) -> Track {
        Track {
            id: t.id.to_owned(),
            title: t.title.to_owned(),
            artist: t.artist.to_owned(),
            album_art: t.album_art.to_owned(),
            spotify_url: t.spotify_url.to_owned(),
        }
    }
}
