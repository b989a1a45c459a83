use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000001_create_tables" // Make sure this matches with the file name
    }
}

#[derive(Iden)]
enum Album {
    Table,
    Id,
    Title,
    Artist,
    ReleaseDate,
    Genre,
}

#[derive(Iden)]
enum Event {
    Table,
    Id,
    Title,
    Date,
    Venue,
    Description,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Username,
    Password,
    Email,
    FirstName,
    LastName,
    IsActive,
    DateJoined,
    LastLogin,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    // Create the album, event and user tables
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Album::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Album::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Album::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Album::Artist).string_len(100).not_null())
                    .col(ColumnDef::new(Album::ReleaseDate).date().not_null())
                    .col(ColumnDef::new(Album::Genre).string_len(50).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Event::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Event::Title).string_len(100).not_null())
                    .col(ColumnDef::new(Event::Date).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Event::Venue).string_len(100).not_null())
                    .col(ColumnDef::new(Event::Description).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(User::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::Password).string().not_null())
                    .col(ColumnDef::new(User::Email).string().not_null().default(""))
                    .col(ColumnDef::new(User::FirstName).string_len(150).not_null().default(""))
                    .col(ColumnDef::new(User::LastName).string_len(150).not_null().default(""))
                    .col(ColumnDef::new(User::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(User::DateJoined).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(User::LastLogin).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Album::Table).to_owned())
            .await?;
        Ok(())
    }
}
