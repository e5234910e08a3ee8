use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create teams table
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(pk_auto(Teams::Id))
                    .col(string(Teams::Name))
                    .col(integer(Teams::AttackStrength))
                    .col(integer(Teams::DefenseStrength))
                    .to_owned(),
            )
            .await?;

        // Create leagues table
        manager
            .create_table(
                Table::create()
                    .table(Leagues::Table)
                    .if_not_exists()
                    .col(pk_auto(Leagues::Id))
                    .col(string(Leagues::Name))
                    .col(integer(Leagues::CurrentWeek).default(0))
                    .col(
                        date_time(Leagues::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create league_teams table (join table)
        manager
            .create_table(
                Table::create()
                    .table(LeagueTeams::Table)
                    .if_not_exists()
                    .col(integer(LeagueTeams::LeagueId))
                    .col(integer(LeagueTeams::TeamId))
                    .primary_key(
                        Index::create()
                            .name("pk_league_teams")
                            .col(LeagueTeams::LeagueId)
                            .col(LeagueTeams::TeamId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_teams_league")
                            .from(LeagueTeams::Table, LeagueTeams::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_teams_team")
                            .from(LeagueTeams::Table, LeagueTeams::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create matches table
        manager
            .create_table(
                Table::create()
                    .table(Matches::Table)
                    .if_not_exists()
                    .col(pk_auto(Matches::Id))
                    .col(integer(Matches::LeagueId))
                    .col(integer(Matches::HomeTeamId))
                    .col(integer(Matches::AwayTeamId))
                    .col(integer(Matches::HomeTeamScore).default(0))
                    .col(integer(Matches::AwayTeamScore).default(0))
                    .col(integer(Matches::Week))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_league")
                            .from(Matches::Table, Matches::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_home_team")
                            .from(Matches::Table, Matches::HomeTeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_away_team")
                            .from(Matches::Table, Matches::AwayTeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_matches_league_week")
                    .table(Matches::Table)
                    .col(Matches::LeagueId)
                    .col(Matches::Week)
                    .to_owned(),
            )
            .await?;

        // Create standings table
        manager
            .create_table(
                Table::create()
                    .table(Standings::Table)
                    .if_not_exists()
                    .col(pk_auto(Standings::Id))
                    .col(integer(Standings::LeagueId))
                    .col(integer(Standings::TeamId))
                    .col(integer(Standings::Points).default(0))
                    .col(integer(Standings::Played).default(0))
                    .col(integer(Standings::Wins).default(0))
                    .col(integer(Standings::Draws).default(0))
                    .col(integer(Standings::Losses).default(0))
                    .col(integer(Standings::GoalDifference).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_standings_league")
                            .from(Standings::Table, Standings::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_standings_team")
                            .from(Standings::Table, Standings::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One standings row per team and league
        manager
            .create_index(
                Index::create()
                    .name("idx_standings_league_team")
                    .table(Standings::Table)
                    .col(Standings::LeagueId)
                    .col(Standings::TeamId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Standings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Matches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeagueTeams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leagues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
    Name,
    AttackStrength,
    DefenseStrength,
}

#[derive(DeriveIden)]
enum Leagues {
    Table,
    Id,
    Name,
    CurrentWeek,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LeagueTeams {
    Table,
    LeagueId,
    TeamId,
}

#[derive(DeriveIden)]
enum Matches {
    Table,
    Id,
    LeagueId,
    HomeTeamId,
    AwayTeamId,
    HomeTeamScore,
    AwayTeamScore,
    Week,
}

#[derive(DeriveIden)]
enum Standings {
    Table,
    Id,
    LeagueId,
    TeamId,
    Points,
    Played,
    Wins,
    Draws,
    Losses,
    GoalDifference,
}
