//! Season lifecycle guard.
//!
//! Every precondition the engine checks before touching a league lives here as a
//! pure predicate, so the operations in [`crate::progression`] and
//! [`crate::roster`] cannot drift apart.

use common::SeasonPhase;
use thiserror::Error;

/// Number of weeks in a season.
pub const SEASON_WEEKS: i32 = 38;
/// Number of teams a league needs to play.
pub const ROSTER_SIZE: usize = 4;
/// First week at which a championship prediction is produced.
pub const PREDICTION_MIN_WEEK: i32 = 4;

/// Reasons a season or roster operation is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeasonViolation {
    #[error("league must have exactly 4 teams, found {found}")]
    InvalidRosterSize { found: usize },
    #[error("league is already active")]
    AlreadyActive,
    #[error("league has already ended")]
    AlreadyEnded,
    #[error("league has not been started")]
    NotStarted,
    #[error("season has ended")]
    SeasonEnded,
    #[error("league is not active")]
    LeagueNotActive,
    #[error("prediction is available from week 4, league is in week {week}")]
    TooEarly { week: i32 },
    #[error("incomplete data for prediction: {0}")]
    IncompleteData(String),
    #[error("cannot add more than 4 teams to a league")]
    RosterFull,
    #[error("team {team_id} is already part of the league")]
    TeamAlreadyInLeague { team_id: i32 },
    #[error("team {team_id} is not part of the league")]
    TeamNotInLeague { team_id: i32 },
    #[error("roster cannot change while the season is running")]
    RosterLocked,
    #[error("team {team_id} is part of an active league")]
    TeamInActiveLeague { team_id: i32 },
    #[error("scores must be non-negative, got {home}-{away}")]
    InvalidScore { home: i32, away: i32 },
}

/// Derives the lifecycle phase from a week counter.
pub fn phase(current_week: i32) -> SeasonPhase {
    if current_week <= 0 {
        SeasonPhase::Unstarted
    } else if current_week <= SEASON_WEEKS {
        SeasonPhase::Active
    } else {
        SeasonPhase::Ended
    }
}

pub fn is_active(current_week: i32) -> bool {
    phase(current_week) == SeasonPhase::Active
}

pub fn ensure_roster_size(team_count: usize) -> Result<(), SeasonViolation> {
    if team_count == ROSTER_SIZE {
        Ok(())
    } else {
        Err(SeasonViolation::InvalidRosterSize { found: team_count })
    }
}

/// A season can only be started from week 0.
pub fn ensure_startable(current_week: i32) -> Result<(), SeasonViolation> {
    match phase(current_week) {
        SeasonPhase::Unstarted => Ok(()),
        SeasonPhase::Active => Err(SeasonViolation::AlreadyActive),
        SeasonPhase::Ended => Err(SeasonViolation::AlreadyEnded),
    }
}

/// A week can be played only while the season is running.
pub fn ensure_playable(current_week: i32) -> Result<(), SeasonViolation> {
    match phase(current_week) {
        SeasonPhase::Unstarted => Err(SeasonViolation::NotStarted),
        SeasonPhase::Active => Ok(()),
        SeasonPhase::Ended => Err(SeasonViolation::SeasonEnded),
    }
}

pub fn ensure_active(current_week: i32) -> Result<(), SeasonViolation> {
    if is_active(current_week) {
        Ok(())
    } else {
        Err(SeasonViolation::LeagueNotActive)
    }
}

pub fn ensure_predictable(current_week: i32) -> Result<(), SeasonViolation> {
    ensure_active(current_week)?;
    if current_week < PREDICTION_MIN_WEEK {
        return Err(SeasonViolation::TooEarly { week: current_week });
    }
    Ok(())
}

/// Roster changes are allowed before the season starts and after it ends.
pub fn ensure_roster_editable(current_week: i32) -> Result<(), SeasonViolation> {
    if is_active(current_week) {
        Err(SeasonViolation::RosterLocked)
    } else {
        Ok(())
    }
}

pub fn ensure_valid_scores(home: i32, away: i32) -> Result<(), SeasonViolation> {
    if home < 0 || away < 0 {
        return Err(SeasonViolation::InvalidScore { home, away });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(phase(0), SeasonPhase::Unstarted);
        assert_eq!(phase(1), SeasonPhase::Active);
        assert_eq!(phase(38), SeasonPhase::Active);
        assert_eq!(phase(39), SeasonPhase::Ended);
    }

    #[test]
    fn test_startable_only_when_unstarted() {
        assert_eq!(ensure_startable(0), Ok(()));
        assert_eq!(ensure_startable(5), Err(SeasonViolation::AlreadyActive));
        assert_eq!(ensure_startable(39), Err(SeasonViolation::AlreadyEnded));
    }

    #[test]
    fn test_playable_rejects_unstarted_and_ended() {
        assert_eq!(ensure_playable(0), Err(SeasonViolation::NotStarted));
        assert_eq!(ensure_playable(38), Ok(()));
        assert_eq!(ensure_playable(39), Err(SeasonViolation::SeasonEnded));
    }

    #[test]
    fn test_roster_size() {
        assert!(ensure_roster_size(4).is_ok());
        assert_eq!(
            ensure_roster_size(3),
            Err(SeasonViolation::InvalidRosterSize { found: 3 })
        );
    }

    #[test]
    fn test_prediction_window() {
        assert_eq!(ensure_predictable(3), Err(SeasonViolation::TooEarly { week: 3 }));
        assert_eq!(ensure_predictable(4), Ok(()));
        assert_eq!(ensure_predictable(0), Err(SeasonViolation::LeagueNotActive));
        assert_eq!(ensure_predictable(40), Err(SeasonViolation::LeagueNotActive));
    }

    #[test]
    fn test_roster_locked_while_active() {
        assert!(ensure_roster_editable(0).is_ok());
        assert_eq!(ensure_roster_editable(2), Err(SeasonViolation::RosterLocked));
        assert!(ensure_roster_editable(39).is_ok());
    }

    #[test]
    fn test_scores_must_be_non_negative() {
        assert!(ensure_valid_scores(0, 0).is_ok());
        assert_eq!(
            ensure_valid_scores(-1, 2),
            Err(SeasonViolation::InvalidScore { home: -1, away: 2 })
        );
    }
}
