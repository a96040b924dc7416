use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use log::{error, warn};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::catalog::{self, Track};
use crate::error::DownloadError;
use crate::pathmap::{self, PathMapping};
use crate::remote::ScpFetcher;
use crate::transcode::Transcoder;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub path_mapping: Arc<PathMapping>,
    pub fetcher: Arc<ScpFetcher>,
    pub transcoder: Arc<Transcoder>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/tracks/TracksInAlbum", get(tracks_in_album))
        .route("/tracks/AlbumList", get(album_list))
        .route("/tracks/FindKeyword", get(find_keyword))
        .route("/tracks/:id", get(download_track))
        .with_state(state)
}

#[derive(Deserialize)]
struct AlbumQuery {
    album: String,
}

#[derive(Deserialize)]
struct KeywordQuery {
    keyword: String,
}

#[derive(Deserialize)]
struct DownloadQuery {
    #[serde(rename = "notConvertM4a", default)]
    not_convert_m4a: bool,
}

// GET /tracks/TracksInAlbum?album= - tracks of one album in playing order
async fn tracks_in_album(
    State(state): State<AppState>,
    Query(params): Query<AlbumQuery>,
) -> Result<Json<Vec<Track>>, StatusCode> {
    let tracks = catalog::tracks_in_album(&state.db, &params.album)
        .await
        .map_err(|e| {
            error!("album lookup failed for {:?}: {}", params.album, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if tracks.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(tracks))
}

// GET /tracks/AlbumList - distinct non-null album names
async fn album_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, StatusCode> {
    let albums = catalog::album_list(&state.db).await.map_err(|e| {
        error!("album list failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if albums.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(albums))
}

// GET /tracks/FindKeyword?keyword= - substring search over the text columns
async fn find_keyword(
    State(state): State<AppState>,
    Query(params): Query<KeywordQuery>,
) -> Result<Json<Vec<Track>>, StatusCode> {
    let tracks = catalog::find_keyword(&state.db, &params.keyword)
        .await
        .map_err(|e| {
            error!("keyword search failed for {:?}: {}", params.keyword, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if tracks.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(tracks))
}

// GET /tracks/:id?notConvertM4a= - fetch the file over SCP, convert ALAC
// unless suppressed, and hand the bytes back as an attachment
async fn download_track(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<DownloadQuery>,
) -> Result<Response, DownloadError> {
    let track = catalog::find_track_by_id(&state.db, id)
        .await?
        .ok_or(DownloadError::NotFound)?;

    // A row without a location has nothing to serve. No session is opened.
    let location = match track.location {
        Some(ref l) if !l.is_empty() => l.clone(),
        _ => {
            warn!("track {} has no stored location", id);
            return Err(DownloadError::NotFound);
        }
    };

    let remote_path = pathmap::translate(&location, &state.path_mapping);
    let file_name = pathmap::file_name(&remote_path).to_string();

    let fetcher = state.fetcher.clone();
    let fetch_path = remote_path.clone();
    let bytes = tokio::task::spawn_blocking(move || fetcher.fetch(&fetch_path)).await??;

    let (payload, final_name) = state
        .transcoder
        .maybe_convert(bytes, track.kind.as_deref(), &file_name, params.not_convert_m4a)
        .await?;

    Ok(attachment_response(payload, &final_name))
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        match self {
            DownloadError::NotFound => StatusCode::NOT_FOUND.into_response(),
            other => {
                error!("download failed: {:?}", other);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

fn attachment_response(payload: Bytes, file_name: &str) -> Response {
    (
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", attachment_file_name(file_name)),
            ),
        ],
        Body::from(payload),
    )
        .into_response()
}

/// Percent-encodes the filename for the disposition header. A literal `+`
/// would render as-is in browsers, so any space encoded that way is
/// normalized to `%20`.
fn attachment_file_name(file_name: &str) -> String {
    urlencoding::encode(file_name).replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_render_as_percent_twenty() {
        assert_eq!(attachment_file_name("My Song.m4a"), "My%20Song.m4a");
        assert!(!attachment_file_name("My Song.m4a").contains('+'));
    }

    #[test]
    fn non_ascii_names_are_percent_encoded() {
        let encoded = attachment_file_name("曲.flac");
        assert!(encoded.starts_with('%'));
        assert!(encoded.ends_with(".flac"));
    }

    #[test]
    fn attachment_carries_binary_content_type_and_disposition() {
        let response = attachment_response(Bytes::from_static(b"x"), "My Song.flac");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/octet-stream"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=My%20Song.flac"
        );
    }

    #[test]
    fn not_found_maps_to_404_and_failures_to_500() {
        assert_eq!(
            DownloadError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        let remote = DownloadError::Remote(crate::error::RemoteFetchError::Connect {
            host: "host:22".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        });
        assert_eq!(
            remote.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let conversion = DownloadError::Conversion(crate::error::ConversionError::Status(
            reqwest::StatusCode::BAD_GATEWAY,
        ));
        assert_eq!(
            conversion.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
