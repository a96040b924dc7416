use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tracks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tracks::TrackId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tracks::SizeByte).string().null())
                    .col(ColumnDef::new(Tracks::TotalTimeMs).string().null())
                    .col(ColumnDef::new(Tracks::DiscNumber).string().null())
                    .col(ColumnDef::new(Tracks::DiscCount).string().null())
                    .col(ColumnDef::new(Tracks::TrackNumber).string().null())
                    .col(ColumnDef::new(Tracks::TrackCount).string().null())
                    .col(ColumnDef::new(Tracks::Year).string().null())
                    .col(ColumnDef::new(Tracks::Bpm).string().null())
                    .col(ColumnDef::new(Tracks::ArtworkCount).string().null())
                    .col(ColumnDef::new(Tracks::Name).string().null())
                    .col(ColumnDef::new(Tracks::Artist).string().null())
                    .col(ColumnDef::new(Tracks::Album).string().null())
                    .col(ColumnDef::new(Tracks::AlbumArtist).string().null())
                    .col(ColumnDef::new(Tracks::Composer).string().null())
                    .col(ColumnDef::new(Tracks::Genre).string().null())
                    .col(ColumnDef::new(Tracks::PlayCount).string().null())
                    .col(ColumnDef::new(Tracks::Kind).string().null())
                    .col(ColumnDef::new(Tracks::Location).string().null())
                    .col(ColumnDef::new(Tracks::DateAdded).string().null())
                    .col(ColumnDef::new(Tracks::DateModified).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tracks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tracks {
    Table,
    #[sea_orm(iden = "TrackID")]
    TrackId,
    SizeByte,
    TotalTimeMs,
    DiscNumber,
    DiscCount,
    TrackNumber,
    TrackCount,
    Year,
    Bpm,
    ArtworkCount,
    Name,
    Artist,
    Album,
    AlbumArtist,
    Composer,
    Genre,
    PlayCount,
    Kind,
    Location,
    DateAdded,
    DateModified,
}
