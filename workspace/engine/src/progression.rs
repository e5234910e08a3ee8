//! League progression engine.
//!
//! Drives a league through its season: starting it, playing weeks of fixtures,
//! correcting match results and estimating the champion. Every mutating
//! operation runs inside a single database transaction, so a failure part way
//! through a week (or a whole season) leaves no partial writes behind.

use std::sync::{Arc, Mutex};

use common::TeamPrediction;
use model::entities::{league, league_match, league_team, standing, team};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::fixtures::fixtures_for_week;
use crate::prediction;
use crate::season::{self, SEASON_WEEKS, SeasonViolation};
use crate::simulator::simulate_match;
use crate::standings::{self, LedgerOp};
use crate::store::{self, LeagueDetails};

/// Teams created by [`LeagueEngine::create_demo_league`]: name, attack, defense.
pub const DEMO_TEAMS: [(&str, i32, i32); 4] = [
    ("Chelsea", 80, 75),
    ("Arsenal", 70, 80),
    ("Manchester City", 65, 70),
    ("Liverpool", 60, 65),
];

/// Weeks the demo league is advanced after starting.
pub const DEMO_WEEKS: usize = 5;

/// Matches played in one week of a season.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedWeek {
    pub week: i32,
    pub matches: Vec<league_match::Model>,
}

/// A simulated fixture that has not been persisted yet.
#[derive(Debug, Clone, Copy)]
struct SimulatedMatch {
    home_team_id: i32,
    away_team_id: i32,
    home_score: i32,
    away_score: i32,
}

/// Runs season operations against the database.
///
/// The random source is shared between clones, so one engine can be stored in
/// application state and handed to every request.
#[derive(Debug, Clone)]
pub struct LeagueEngine {
    rng: Arc<Mutex<StdRng>>,
}

impl Default for LeagueEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LeagueEngine {
    /// An engine seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// An engine whose match results are reproducible for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Simulates the fixtures of `week` for an ordered roster.
    fn simulate_week(&self, roster: &[team::Model], week: i32) -> std::result::Result<Vec<SimulatedMatch>, SeasonViolation> {
        let fixtures = fixtures_for_week(roster.len(), week)?;
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let simulated = fixtures
            .iter()
            .map(|&(home, away)| {
                let (home_team, away_team) = (&roster[home], &roster[away]);
                let (home_score, away_score) = simulate_match(&mut *rng, home_team, away_team);
                SimulatedMatch {
                    home_team_id: home_team.id,
                    away_team_id: away_team.id,
                    home_score,
                    away_score,
                }
            })
            .collect();
        Ok(simulated)
    }

    /// Plays one week: simulates its fixtures, stores the matches and applies them to the standings.
    /// Does not touch the week counter.
    async fn play_week<C: ConnectionTrait>(
        &self,
        conn: &C,
        league_id: i32,
        roster: &[team::Model],
        week: i32,
    ) -> Result<PlayedWeek> {
        let simulated = self.simulate_week(roster, week)?;

        let mut matches = Vec::with_capacity(simulated.len());
        for m in simulated {
            let stored = store::insert_match(
                conn,
                league_id,
                week,
                m.home_team_id,
                m.away_team_id,
                m.home_score,
                m.away_score,
            )
                .await?;
            standings::record_match(
                conn,
                league_id,
                m.home_team_id,
                m.away_team_id,
                m.home_score,
                m.away_score,
                LedgerOp::Apply,
            )
                .await?;
            debug!(
                week,
                home = m.home_team_id,
                away = m.away_team_id,
                score = %format!("{}-{}", m.home_score, m.away_score),
                "Match played"
            );
            matches.push(stored);
        }

        Ok(PlayedWeek { week, matches })
    }

    /// Resets the season of a league and moves it to week 1.
    async fn start_on<C: ConnectionTrait>(&self, conn: &C, league_id: i32) -> Result<league::Model> {
        let league = store::find_league(conn, league_id).await?;
        season::ensure_startable(league.current_week)?;
        let roster = store::league_roster(conn, &league).await?;
        season::ensure_roster_size(roster.len())?;

        store::clear_season(conn, league_id).await?;
        store::set_current_week(conn, league, 1).await
    }

    /// Plays the current week of a league and bumps its week counter.
    async fn advance_on<C: ConnectionTrait>(&self, conn: &C, league_id: i32) -> Result<PlayedWeek> {
        let league = store::find_league(conn, league_id).await?;
        season::ensure_playable(league.current_week)?;
        let roster = store::league_roster(conn, &league).await?;
        season::ensure_roster_size(roster.len())?;

        let week = league.current_week;
        let played = self.play_week(conn, league_id, &roster, week).await?;
        store::set_current_week(conn, league, week + 1).await?;
        Ok(played)
    }

    /// Starts a fresh season: week 1, no matches, no standings.
    #[instrument(skip(self, db))]
    pub async fn start_league(&self, db: &DatabaseConnection, league_id: i32) -> Result<league::Model> {
        let txn = db.begin().await?;
        let league = self.start_on(&txn, league_id).await?;
        txn.commit().await?;

        info!("League started");
        Ok(league)
    }

    /// Plays the current week and moves the league to the next one.
    #[instrument(skip(self, db))]
    pub async fn advance_week(&self, db: &DatabaseConnection, league_id: i32) -> Result<PlayedWeek> {
        let txn = db.begin().await?;
        let played = self.advance_on(&txn, league_id).await?;
        txn.commit().await?;

        info!(week = played.week, next_week = played.week + 1, "Week played");
        Ok(played)
    }

    /// Plays every remaining week until the counter reaches the last week of the season.
    ///
    /// From a freshly started league this plays weeks 1 to 37 and leaves the
    /// league at week 38. The whole run is one transaction.
    #[instrument(skip(self, db))]
    pub async fn play_all_matches(&self, db: &DatabaseConnection, league_id: i32) -> Result<Vec<PlayedWeek>> {
        let txn = db.begin().await?;

        let league = store::find_league(&txn, league_id).await?;
        season::ensure_playable(league.current_week)?;
        let roster = store::league_roster(&txn, &league).await?;
        season::ensure_roster_size(roster.len())?;

        let mut week = league.current_week;
        let mut played = Vec::new();
        while week < SEASON_WEEKS {
            played.push(self.play_week(&txn, league_id, &roster, week).await?);
            week += 1;
        }
        store::set_current_week(&txn, league, week).await?;
        txn.commit().await?;

        info!(weeks_played = played.len(), current_week = week, "Remaining weeks played");
        Ok(played)
    }

    /// Replaces the score of a played match.
    ///
    /// The stored score is reverted from both standings before the new one is
    /// written and applied.
    #[instrument(skip(self, db))]
    pub async fn edit_match_results(
        &self,
        db: &DatabaseConnection,
        match_id: i32,
        home_score: i32,
        away_score: i32,
    ) -> Result<league_match::Model> {
        season::ensure_valid_scores(home_score, away_score)?;
        let txn = db.begin().await?;

        let existing = store::find_match(&txn, match_id).await?;
        standings::record_match(
            &txn,
            existing.league_id,
            existing.home_team_id,
            existing.away_team_id,
            existing.home_team_score,
            existing.away_team_score,
            LedgerOp::Revert,
        )
            .await?;

        let (old_home, old_away) = (existing.home_team_score, existing.away_team_score);
        let mut active: league_match::ActiveModel = existing.into();
        active.home_team_score = Set(home_score);
        active.away_team_score = Set(away_score);
        let updated = active.update(&txn).await?;

        standings::record_match(
            &txn,
            updated.league_id,
            updated.home_team_id,
            updated.away_team_id,
            home_score,
            away_score,
            LedgerOp::Apply,
        )
            .await?;
        txn.commit().await?;

        info!(
            league_id = updated.league_id,
            old = %format!("{}-{}", old_home, old_away),
            new = %format!("{}-{}", home_score, away_score),
            "Match result edited"
        );
        Ok(updated)
    }

    /// Matches of the most recently played week. Empty before the first week is played.
    #[instrument(skip(self, db))]
    pub async fn view_match_results(&self, db: &DatabaseConnection, league_id: i32) -> Result<Vec<league_match::Model>> {
        let league = store::find_league(db, league_id).await?;
        season::ensure_active(league.current_week)?;

        let last_played = league.current_week - 1;
        if last_played < 1 {
            return Ok(Vec::new());
        }
        store::matches_by_week(db, league_id, last_played).await
    }

    /// Standings of a league ordered as a table.
    pub async fn league_table(&self, db: &DatabaseConnection, league_id: i32) -> Result<Vec<standing::Model>> {
        store::find_league(db, league_id).await?;
        let mut rows = store::standings_for_league(db, league_id).await?;
        standings::sort_table(&mut rows);
        Ok(rows)
    }

    #[instrument(skip(self, db))]
    pub async fn predict_champion(&self, db: &DatabaseConnection, league_id: i32) -> Result<Vec<TeamPrediction>> {
        let league = store::find_league(db, league_id).await?;
        season::ensure_predictable(league.current_week)?;

        let teams = store::league_roster(db, &league).await?;
        let rows = store::standings_for_league(db, league_id).await?;
        let predictions = prediction::predict(league_id, &rows, &teams)?;

        debug!(
            favourite = ?predictions.first().map(|p| p.team_id),
            "Champion predicted"
        );
        Ok(predictions)
    }

    /// Deletes a league and everything it owns.
    #[instrument(skip(self, db))]
    pub async fn delete_league(&self, db: &DatabaseConnection, league_id: i32) -> Result<()> {
        let txn = db.begin().await?;
        store::delete_league(&txn, league_id).await?;
        txn.commit().await?;
        info!("League deleted");
        Ok(())
    }

    /// Creates the four demo teams and a league, starts it and plays the first weeks.
    ///
    /// Everything happens in one transaction, so a failure leaves no demo data behind.
    #[instrument(skip(self, db))]
    pub async fn create_demo_league(&self, db: &DatabaseConnection, name: &str) -> Result<LeagueDetails> {
        let txn = db.begin().await?;
        let league = store::create_league(&txn, name.to_string()).await?;
        for (team_name, attack, defense) in DEMO_TEAMS {
            let team = store::create_team(&txn, team_name.to_string(), attack, defense).await?;
            league_team::ActiveModel {
                league_id: Set(league.id),
                team_id: Set(team.id),
            }
                .insert(&txn)
                .await?;
        }

        self.start_on(&txn, league.id).await?;
        for _ in 0..DEMO_WEEKS {
            self.advance_on(&txn, league.id).await?;
        }
        let details = store::load_league(&txn, league.id).await?;
        txn.commit().await?;

        info!(league_id = league.id, "Demo league created");
        Ok(details)
    }
}
