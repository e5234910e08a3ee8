//! Roster management: attaching teams to leagues and removing them again.

use model::entities::{league_match, league_team, standing, team};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::season::{self, ROSTER_SIZE, SeasonViolation};
use crate::standings::{self, LedgerOp};
use crate::store;

/// Attaches a team to a league and returns the new roster.
#[instrument(skip(db))]
pub async fn add_team_to_league(db: &DatabaseConnection, league_id: i32, team_id: i32) -> Result<Vec<team::Model>> {
    let txn = db.begin().await?;

    let league = store::find_league(&txn, league_id).await?;
    season::ensure_roster_editable(league.current_week)?;
    let team = store::find_team(&txn, team_id).await?;

    let mut roster = store::league_roster(&txn, &league).await?;
    if roster.iter().any(|t| t.id == team_id) {
        return Err(SeasonViolation::TeamAlreadyInLeague { team_id }.into());
    }
    if roster.len() >= ROSTER_SIZE {
        return Err(SeasonViolation::RosterFull.into());
    }

    league_team::ActiveModel {
        league_id: Set(league_id),
        team_id: Set(team_id),
    }
        .insert(&txn)
        .await?;
    txn.commit().await?;

    roster.push(team);
    roster.sort_by_key(|t| t.id);
    info!(roster_size = roster.len(), "Team added to league");
    Ok(roster)
}

/// Detaches a team from a league and returns the remaining roster.
#[instrument(skip(db))]
pub async fn remove_team_from_league(
    db: &DatabaseConnection,
    league_id: i32,
    team_id: i32,
) -> Result<Vec<team::Model>> {
    let txn = db.begin().await?;

    let league = store::find_league(&txn, league_id).await?;
    season::ensure_roster_editable(league.current_week)?;
    store::find_team(&txn, team_id).await?;

    let deleted = league_team::Entity::delete_many()
        .filter(
            Condition::all()
                .add(league_team::Column::LeagueId.eq(league_id))
                .add(league_team::Column::TeamId.eq(team_id)),
        )
        .exec(&txn)
        .await?;
    if deleted.rows_affected == 0 {
        return Err(SeasonViolation::TeamNotInLeague { team_id }.into());
    }

    let roster = store::league_roster(&txn, &league).await?;
    txn.commit().await?;

    info!(roster_size = roster.len(), "Team removed from league");
    Ok(roster)
}

/// Deletes a team together with its memberships, matches and standings.
///
/// Refused while the team plays in an active league. Every deleted match is
/// reverted from the opponent's standing first, so the remaining standings
/// still add up to the stored matches.
#[instrument(skip(db))]
pub async fn delete_team(db: &DatabaseConnection, team_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let leagues = store::leagues_for_team(&txn, team_id).await?;
    if leagues.iter().any(|l| season::is_active(l.current_week)) {
        return Err(SeasonViolation::TeamInActiveLeague { team_id }.into());
    }

    let played = Condition::any()
        .add(league_match::Column::HomeTeamId.eq(team_id))
        .add(league_match::Column::AwayTeamId.eq(team_id));
    let matches = league_match::Entity::find()
        .filter(played.clone())
        .all(&txn)
        .await?;
    for m in &matches {
        standings::record_match(
            &txn,
            m.league_id,
            m.home_team_id,
            m.away_team_id,
            m.home_team_score,
            m.away_team_score,
            LedgerOp::Revert,
        )
            .await?;
    }
    debug!(matches = matches.len(), "Match results reverted");

    league_match::Entity::delete_many()
        .filter(played)
        .exec(&txn)
        .await?;
    standing::Entity::delete_many()
        .filter(standing::Column::TeamId.eq(team_id))
        .exec(&txn)
        .await?;
    league_team::Entity::delete_many()
        .filter(league_team::Column::TeamId.eq(team_id))
        .exec(&txn)
        .await?;
    team::Entity::delete_by_id(team_id).exec(&txn).await?;

    txn.commit().await?;
    info!(leagues = leagues.len(), "Team deleted");
    Ok(())
}
