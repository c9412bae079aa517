//! HTTP endpoint that hides Spotify credentials and response shape from the dashboard.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use log::{debug, error};

use crate::clients::{
    entities::{ErrorBody, TOP_TRACKS_LIMIT, TopTracks, Track},
    errors::{Error, Result},
    spotify::{TopTracksSource, UpstreamResponse, parse_top_tracks},
};

/// Path the dashboard fetches its song list from
pub const TOP_TRACKS_PATH: &str = "/api/spotify/top-tracks";

/// Fetch the listener's top tracks from `source` and normalize them.
///
/// At most [`TOP_TRACKS_LIMIT`] tracks are returned, whatever upstream sends.
pub async fn fetch_top_tracks<S: TopTracksSource>(source: &S) -> Result<Vec<Track>> {
    let response = source.top_tracks(TOP_TRACKS_LIMIT).await?;
    reshape(response)
}

// 204 means the listener has no history yet
fn reshape(response: UpstreamResponse) -> Result<Vec<Track>> {
    if response.status == 204 || response.status >= 400 {
        return Err(Error::UpstreamStatus(response.status));
    }
    let mut tracks = parse_top_tracks(&response.body)?;
    tracks.truncate(TOP_TRACKS_LIMIT);
    Ok(tracks)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::UpstreamStatus(code) => (
                StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                "Failed to fetch top tracks",
            ),
            err => {
                error!("Error fetching top tracks: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        let body = ErrorBody {
            error: message.to_owned(),
        };
        (status, Json(body)).into_response()
    }
}

async fn top_tracks_handler<S>(State(source): State<Arc<S>>) -> Result<Json<TopTracks>>
where
    S: TopTracksSource + Send + Sync + 'static,
{
    let tracks = fetch_top_tracks(source.as_ref()).await?;
    debug!("Serving {} top tracks", tracks.len());
    Ok(Json(TopTracks { tracks }))
}

/// Router exposing the top tracks endpoint backed by `source`
pub fn router<S>(source: S) -> Router
where
    S: TopTracksSource + Send + Sync + 'static,
{
    Router::new()
        .route(TOP_TRACKS_PATH, get(top_tracks_handler::<S>))
        .with_state(Arc::new(source))
}

/// Serve the proxy on an already bound listener until the process stops
pub async fn serve<S>(listener: tokio::net::TcpListener, source: S) -> Result<()>
where
    S: TopTracksSource + Send + Sync + 'static,
{
    axum::serve(listener, router(source)).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::{Value, json};

    /// Upstream stand-in replaying a canned answer
    pub(crate) enum StubSource {
        Respond(u16, String),
        Fail,
    }

    impl TopTracksSource for StubSource {
        async fn top_tracks(&self, limit: usize) -> Result<UpstreamResponse> {
            assert_eq!(limit, TOP_TRACKS_LIMIT);
            match self {
                StubSource::Respond(status, body) => Ok(UpstreamResponse {
                    status: *status,
                    body: body.clone(),
                }),
                StubSource::Fail => Err(Error::TokenUnavailable("stubbed failure".into())),
            }
        }
    }

    pub(crate) fn upstream_item(n: usize) -> Value {
        json!({
            "id": n.to_string(),
            "name": format!("Song {n}"),
            "artists": [{"name": "X"}],
            "album": {"images": [{"url": format!("http://img/{n}")}]},
            "external_urls": {"spotify": format!("http://link/{n}")},
        })
    }

    fn page(count: usize) -> String {
        let items: Vec<Value> = (0..count).map(upstream_item).collect();
        json!({ "items": items }).to_string()
    }

    async fn spawn(source: StubSource) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, source));
        format!("http://{addr}{TOP_TRACKS_PATH}")
    }

    #[tokio::test]
    async fn maps_upstream_payload() {
        let body = json!({"items":[{"id":"1","name":"Song A","artists":[{"name":"X"},{"name":"Y"}],
            "album":{"images":[{"url":"http://img"}]},"external_urls":{"spotify":"http://link"}}]});
        let url = spawn(StubSource::Respond(200, body.to_string())).await;

        let response = reqwest::get(url).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let value: Value = response.json().await.unwrap();
        assert_eq!(
            value,
            json!({"tracks":[{"id":"1","title":"Song A","artist":"X, Y","albumArt":"http://img","spotifyUrl":"http://link"}]})
        );
    }

    #[tokio::test]
    async fn caps_track_count() {
        for (count, expected) in [(0, 0), (3, 3), (6, 6), (10, 6)] {
            let tracks = fetch_top_tracks(&StubSource::Respond(200, page(count)))
                .await
                .unwrap();
            assert_eq!(tracks.len(), expected);
        }
    }

    #[tokio::test]
    async fn keeps_upstream_order_when_truncating() {
        let tracks = fetch_top_tracks(&StubSource::Respond(200, page(9)))
            .await
            .unwrap();
        let ids: Vec<_> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["0", "1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn error_statuses_are_passed_through() {
        for status in [400, 401, 403, 404, 429, 500, 502, 503] {
            let url = spawn(StubSource::Respond(status, String::new())).await;
            let response = reqwest::get(url).await.unwrap();
            assert_eq!(response.status().as_u16(), status);
            let body: ErrorBody = response.json().await.unwrap();
            assert_eq!(body.error, "Failed to fetch top tracks");
        }
    }

    #[tokio::test]
    async fn no_content_is_passed_through() {
        let result = fetch_top_tracks(&StubSource::Respond(204, String::new())).await;
        assert!(matches!(result, Err(Error::UpstreamStatus(204))));

        let url = spawn(StubSource::Respond(204, String::new())).await;
        let response = reqwest::get(url).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn malformed_payload_is_internal_error() {
        let url = spawn(StubSource::Respond(200, "{not json".into())).await;
        let response = reqwest::get(url).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = response.json().await.unwrap();
        assert_eq!(body.error, "Internal server error");
    }

    #[tokio::test]
    async fn source_failure_is_internal_error() {
        let url = spawn(StubSource::Fail).await;
        let response = reqwest::get(url).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
