//! Standings ledger.
//!
//! Standing rows are never recomputed from the match history. Each played match
//! is applied once per side and an edited match is reverted with its stored score
//! before the corrected score is applied.

use model::entities::standing;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use tracing::{debug, instrument, trace};

use crate::error::{EngineError, Result};
use crate::store;

/// Result of a match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn from_scores(team_score: i32, opponent_score: i32) -> Self {
        if team_score > opponent_score {
            Outcome::Win
        } else if team_score == opponent_score {
            Outcome::Draw
        } else {
            Outcome::Loss
        }
    }

    pub fn points(self) -> i32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }
}

/// Whether a result is being added to or taken out of a standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOp {
    Apply,
    Revert,
}

/// A zeroed standing for a team that has not played yet.
pub fn empty_standing(league_id: i32, team_id: i32) -> standing::Model {
    standing::Model {
        id: 0,
        league_id,
        team_id,
        points: 0,
        played: 0,
        wins: 0,
        draws: 0,
        losses: 0,
        goal_difference: 0,
    }
}

/// Adds one result to a standing.
pub fn apply_result(row: &mut standing::Model, team_score: i32, opponent_score: i32) {
    let outcome = Outcome::from_scores(team_score, opponent_score);
    row.played += 1;
    row.goal_difference += team_score - opponent_score;
    row.points += outcome.points();
    match outcome {
        Outcome::Win => row.wins += 1,
        Outcome::Draw => row.draws += 1,
        Outcome::Loss => row.losses += 1,
    }
}

/// Takes a previously applied result back out of a standing.
///
/// The row is left untouched when the result cannot have been applied to it,
/// e.g. reverting a win from a row without wins.
pub fn revert_result(row: &mut standing::Model, team_score: i32, opponent_score: i32) -> Result<()> {
    let outcome = Outcome::from_scores(team_score, opponent_score);
    let counter = match outcome {
        Outcome::Win => row.wins,
        Outcome::Draw => row.draws,
        Outcome::Loss => row.losses,
    };
    if row.played < 1 || counter < 1 || row.points < outcome.points() {
        return Err(EngineError::InconsistentState(format!(
            "cannot revert {}-{} from standing of team {} in league {} (played {}, wins {}, draws {}, losses {})",
            team_score, opponent_score, row.team_id, row.league_id, row.played, row.wins, row.draws, row.losses
        )));
    }

    row.played -= 1;
    row.goal_difference -= team_score - opponent_score;
    row.points -= outcome.points();
    match outcome {
        Outcome::Win => row.wins -= 1,
        Outcome::Draw => row.draws -= 1,
        Outcome::Loss => row.losses -= 1,
    }
    Ok(())
}

/// Checks the two counting invariants of a standing row.
pub fn is_consistent(row: &standing::Model) -> bool {
    row.played == row.wins + row.draws + row.losses
        && row.points == 3 * row.wins + row.draws
        && row.wins >= 0
        && row.draws >= 0
        && row.losses >= 0
}

/// Orders rows as a league table: points, goal difference and wins descending, then team id.
pub fn sort_table(rows: &mut [standing::Model]) {
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.wins.cmp(&a.wins))
            .then(a.team_id.cmp(&b.team_id))
    });
}

/// Applies or reverts one side of a match on the persisted standing of `team_id`.
///
/// A missing row is created on apply. Reverting against a missing row means no
/// result was ever applied and fails with [`EngineError::InconsistentState`].
#[instrument(skip(conn))]
pub async fn apply_or_revert<C: ConnectionTrait>(
    conn: &C,
    league_id: i32,
    team_id: i32,
    team_score: i32,
    opponent_score: i32,
    op: LedgerOp,
) -> Result<standing::Model> {
    trace!("Looking up standing");
    let existing = store::standing_by_team(conn, league_id, team_id).await?;

    let (mut row, is_new) = match existing {
        Some(row) => (row, false),
        None => (empty_standing(league_id, team_id), true),
    };

    match op {
        LedgerOp::Apply => apply_result(&mut row, team_score, opponent_score),
        LedgerOp::Revert if is_new => {
            return Err(EngineError::InconsistentState(format!(
                "no standing for team {} in league {} to revert",
                team_id, league_id
            )));
        }
        LedgerOp::Revert => revert_result(&mut row, team_score, opponent_score)?,
    }

    debug!(
        points = row.points,
        played = row.played,
        goal_difference = row.goal_difference,
        "Standing adjusted"
    );

    let saved = if is_new {
        standing::ActiveModel {
            league_id: Set(row.league_id),
            team_id: Set(row.team_id),
            points: Set(row.points),
            played: Set(row.played),
            wins: Set(row.wins),
            draws: Set(row.draws),
            losses: Set(row.losses),
            goal_difference: Set(row.goal_difference),
            ..Default::default()
        }
            .insert(conn)
            .await?
    } else {
        standing::ActiveModel {
            id: Set(row.id),
            league_id: Set(row.league_id),
            team_id: Set(row.team_id),
            points: Set(row.points),
            played: Set(row.played),
            wins: Set(row.wins),
            draws: Set(row.draws),
            losses: Set(row.losses),
            goal_difference: Set(row.goal_difference),
        }
            .update(conn)
            .await?
    };

    Ok(saved)
}

/// Applies or reverts a whole match: once for the home side and once for the away side.
pub async fn record_match<C: ConnectionTrait>(
    conn: &C,
    league_id: i32,
    home_team_id: i32,
    away_team_id: i32,
    home_score: i32,
    away_score: i32,
    op: LedgerOp,
) -> Result<()> {
    apply_or_revert(conn, league_id, home_team_id, home_score, away_score, op).await?;
    apply_or_revert(conn, league_id, away_team_id, away_score, home_score, op).await?;
    Ok(())
}
