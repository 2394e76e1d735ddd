use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Actors::Table)
                    .if_not_exists()
                    .col(integer(Actors::ActorId).primary_key())
                    .col(string(Actors::ActorName))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Directors::Table)
                    .if_not_exists()
                    .col(integer(Directors::DirectorId).primary_key())
                    .col(string(Directors::DirectorName))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DirectorsGenres::Table)
                    .if_not_exists()
                    .col(integer(DirectorsGenres::DirectorId))
                    .col(string(DirectorsGenres::Genre))
                    .primary_key(
                        Index::create().col(DirectorsGenres::DirectorId).col(DirectorsGenres::Genre),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_directors_genres_genre")
                    .table(DirectorsGenres::Table)
                    .col(DirectorsGenres::Genre)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(integer(Movies::MovieId).primary_key())
                    .col(string(Movies::MovieName))
                    .col(integer_null(Movies::MovieYear))
                    .col(double_null(Movies::MovieRank))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MoviesGenres::Table)
                    .if_not_exists()
                    .col(integer(MoviesGenres::MovieId))
                    .col(string(MoviesGenres::Genre))
                    .primary_key(Index::create().col(MoviesGenres::MovieId).col(MoviesGenres::Genre))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_genres_genre")
                    .table(MoviesGenres::Table)
                    .col(MoviesGenres::Genre)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(integer(Roles::ActorId))
                    .col(integer(Roles::MovieId))
                    .col(string(Roles::RoleName))
                    .primary_key(Index::create().col(Roles::ActorId).col(Roles::MovieId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_roles_movie_id")
                    .table(Roles::Table)
                    .col(Roles::MovieId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Roles::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MoviesGenres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(DirectorsGenres::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Directors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actors::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Actors {
    Table,
    ActorId,
    ActorName,
}

#[derive(DeriveIden)]
enum Directors {
    Table,
    DirectorId,
    DirectorName,
}

#[derive(DeriveIden)]
enum DirectorsGenres {
    Table,
    DirectorId,
    Genre,
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    MovieId,
    MovieName,
    MovieYear,
    MovieRank,
}

#[derive(DeriveIden)]
enum MoviesGenres {
    Table,
    MovieId,
    Genre,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    ActorId,
    MovieId,
    RoleName,
}
