use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Row of the external `Tracks` catalog. The catalog is a text import of
/// player-library metadata, so every non-key column is nullable text and the
/// numeric/date columns are not guaranteed to parse; typed access happens in
/// the gateway's catalog mapping layer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Tracks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "TrackID")]
    pub track_id: i64,
    #[sea_orm(column_name = "SizeByte")]
    pub size_byte: Option<String>,
    #[sea_orm(column_name = "TotalTimeMs")]
    pub total_time_ms: Option<String>,
    #[sea_orm(column_name = "DiscNumber")]
    pub disc_number: Option<String>,
    #[sea_orm(column_name = "DiscCount")]
    pub disc_count: Option<String>,
    #[sea_orm(column_name = "TrackNumber")]
    pub track_number: Option<String>,
    #[sea_orm(column_name = "TrackCount")]
    pub track_count: Option<String>,
    #[sea_orm(column_name = "Year")]
    pub year: Option<String>,
    #[sea_orm(column_name = "Bpm")]
    pub bpm: Option<String>,
    #[sea_orm(column_name = "ArtworkCount")]
    pub artwork_count: Option<String>,
    #[sea_orm(column_name = "Name")]
    pub name: Option<String>,
    #[sea_orm(column_name = "Artist")]
    pub artist: Option<String>,
    #[sea_orm(column_name = "Album")]
    pub album: Option<String>,
    #[sea_orm(column_name = "AlbumArtist")]
    pub album_artist: Option<String>,
    #[sea_orm(column_name = "Composer")]
    pub composer: Option<String>,
    #[sea_orm(column_name = "Genre")]
    pub genre: Option<String>,
    #[sea_orm(column_name = "PlayCount")]
    pub play_count: Option<String>,
    #[sea_orm(column_name = "Kind")]
    pub kind: Option<String>,
    #[sea_orm(column_name = "Location")]
    pub location: Option<String>,
    #[sea_orm(column_name = "DateAdded")]
    pub date_added: Option<String>,
    #[sea_orm(column_name = "DateModified")]
    pub date_modified: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
