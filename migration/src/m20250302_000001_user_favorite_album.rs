use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum UserFavoriteAlbum {
    Table,
    Id,
    UserId,
    AlbumId,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Album {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserFavoriteAlbum::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserFavoriteAlbum::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserFavoriteAlbum::UserId).integer().not_null())
                    .col(ColumnDef::new(UserFavoriteAlbum::AlbumId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_favorite_album-user_id")
                            .from(UserFavoriteAlbum::Table, UserFavoriteAlbum::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_favorite_album-album_id")
                            .from(UserFavoriteAlbum::Table, UserFavoriteAlbum::AlbumId)
                            .to(Album::Table, Album::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One favorite per (user, album)
        manager
            .create_index(
                Index::create()
                    .name("idx-user_favorite_album-user_id-album_id")
                    .table(UserFavoriteAlbum::Table)
                    .col(UserFavoriteAlbum::UserId)
                    .col(UserFavoriteAlbum::AlbumId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserFavoriteAlbum::Table).to_owned())
            .await?;
        Ok(())
    }
}
