use chrono::NaiveDateTime;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;

use entity::prelude::Track as TrackEntity;
use entity::track;

/// One catalog row, typed. Built fresh per request and discarded with the
/// response; nothing here is cached or shared.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Track {
    #[serde(rename = "TrackID")]
    pub track_id: i64,
    pub size_byte: Option<i64>,
    pub total_time_ms: Option<i64>,
    pub disc_number: Option<i32>,
    pub disc_count: Option<i32>,
    pub track_number: Option<i32>,
    pub track_count: Option<i32>,
    pub year: Option<i32>,
    pub bpm: Option<i32>,
    pub artwork_count: Option<i32>,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub play_count: Option<i32>,
    pub kind: Option<String>,
    pub location: Option<String>,
    pub date_added: Option<NaiveDateTime>,
    pub date_modified: Option<NaiveDateTime>,
}

impl From<track::Model> for Track {
    fn from(model: track::Model) -> Self {
        Self {
            track_id: model.track_id,
            size_byte: parse_long(&model.size_byte),
            total_time_ms: parse_long(&model.total_time_ms),
            disc_number: parse_int(&model.disc_number),
            disc_count: parse_int(&model.disc_count),
            track_number: parse_int(&model.track_number),
            track_count: parse_int(&model.track_count),
            year: parse_int(&model.year),
            bpm: parse_int(&model.bpm),
            artwork_count: parse_int(&model.artwork_count),
            name: model.name,
            artist: model.artist,
            album: model.album,
            album_artist: model.album_artist,
            composer: model.composer,
            genre: model.genre,
            play_count: parse_int(&model.play_count),
            kind: model.kind,
            location: model.location,
            date_added: parse_datetime(&model.date_added),
            date_modified: parse_datetime(&model.date_modified),
        }
    }
}

// The catalog stores numerics and timestamps as text and does not guarantee
// they parse. A malformed value resolves to None; it never fails the row.

fn parse_long(value: &Option<String>) -> Option<i64> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

fn parse_int(value: &Option<String>) -> Option<i32> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

fn parse_datetime(value: &Option<String>) -> Option<NaiveDateTime> {
    let v = value.as_deref()?.trim();
    NaiveDateTime::parse_from_str(v, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(v)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

pub async fn find_track_by_id(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<Track>, DbErr> {
    let model = TrackEntity::find_by_id(id).one(db).await?;
    Ok(model.map(Track::from))
}

pub async fn tracks_in_album(
    db: &DatabaseConnection,
    album: &str,
) -> Result<Vec<Track>, DbErr> {
    let mut tracks: Vec<Track> = TrackEntity::find()
        .filter(track::Column::Album.eq(album))
        .all(db)
        .await?
        .into_iter()
        .map(Track::from)
        .collect();

    sort_by_position(&mut tracks);
    Ok(tracks)
}

pub async fn album_list(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    TrackEntity::find()
        .select_only()
        .column(track::Column::Album)
        .filter(track::Column::Album.is_not_null())
        .group_by(track::Column::Album)
        .order_by_asc(track::Column::Album)
        .into_tuple()
        .all(db)
        .await
}

pub async fn find_keyword(
    db: &DatabaseConnection,
    keyword: &str,
) -> Result<Vec<Track>, DbErr> {
    let pattern = format!("%{}%", keyword);

    let condition = Condition::any()
        .add(Expr::col((track::Entity, track::Column::Name)).ilike(pattern.clone()))
        .add(Expr::col((track::Entity, track::Column::Artist)).ilike(pattern.clone()))
        .add(Expr::col((track::Entity, track::Column::Album)).ilike(pattern.clone()))
        .add(Expr::col((track::Entity, track::Column::AlbumArtist)).ilike(pattern.clone()))
        .add(Expr::col((track::Entity, track::Column::Composer)).ilike(pattern));

    let mut tracks: Vec<Track> = TrackEntity::find()
        .filter(condition)
        .all(db)
        .await?
        .into_iter()
        .map(Track::from)
        .collect();

    sort_by_album_position(&mut tracks);
    Ok(tracks)
}

// Disc/track numbers live in text columns, so SQL ordering would be
// lexicographic ("10" before "2"). Sorting happens here on the parsed
// values instead; absent values sort first, matching NULLS FIRST.

fn sort_by_position(tracks: &mut [Track]) {
    tracks.sort_by(|a, b| {
        (a.disc_number, a.track_number).cmp(&(b.disc_number, b.track_number))
    });
}

fn sort_by_album_position(tracks: &mut [Track]) {
    tracks.sort_by(|a, b| {
        (&a.album, a.disc_number, a.track_number).cmp(&(&b.album, b.disc_number, b.track_number))
    });
}
