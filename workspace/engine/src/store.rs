//! Persistence queries used by the engine and the HTTP layer.
//!
//! All functions are generic over [`ConnectionTrait`] so they run equally on a
//! plain connection or inside a transaction.

use model::entities::{league, league_match, league_team, standing, team};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::error::{EngineError, Result};

/// A league with its roster, matches and standings loaded.
#[derive(Debug, Clone)]
pub struct LeagueDetails {
    pub league: league::Model,
    pub teams: Vec<team::Model>,
    pub matches: Vec<league_match::Model>,
    pub standings: Vec<standing::Model>,
}

pub async fn find_league<C: ConnectionTrait>(conn: &C, league_id: i32) -> Result<league::Model> {
    league::Entity::find_by_id(league_id)
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::not_found("league", league_id))
}

pub async fn find_team<C: ConnectionTrait>(conn: &C, team_id: i32) -> Result<team::Model> {
    team::Entity::find_by_id(team_id)
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::not_found("team", team_id))
}

pub async fn find_match<C: ConnectionTrait>(conn: &C, match_id: i32) -> Result<league_match::Model> {
    league_match::Entity::find_by_id(match_id)
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::not_found("match", match_id))
}

pub async fn find_standing<C: ConnectionTrait>(conn: &C, standing_id: i32) -> Result<standing::Model> {
    standing::Entity::find_by_id(standing_id)
        .one(conn)
        .await?
        .ok_or_else(|| EngineError::not_found("standing", standing_id))
}

/// Teams of a league in roster order (team id ascending).
pub async fn league_roster<C: ConnectionTrait>(conn: &C, league: &league::Model) -> Result<Vec<team::Model>> {
    let teams = league
        .find_related(team::Entity)
        .order_by_asc(team::Column::Id)
        .all(conn)
        .await?;
    Ok(teams)
}

/// Loads a league together with its teams, matches and standings.
pub async fn load_league<C: ConnectionTrait>(conn: &C, league_id: i32) -> Result<LeagueDetails> {
    let league = find_league(conn, league_id).await?;
    let teams = league_roster(conn, &league).await?;
    let matches = league
        .find_related(league_match::Entity)
        .order_by_asc(league_match::Column::Week)
        .order_by_asc(league_match::Column::Id)
        .all(conn)
        .await?;
    let standings = standings_for_league(conn, league_id).await?;

    Ok(LeagueDetails { league, teams, matches, standings })
}

pub async fn list_leagues<C: ConnectionTrait>(conn: &C) -> Result<Vec<league::Model>> {
    let leagues = league::Entity::find()
        .order_by_asc(league::Column::Id)
        .all(conn)
        .await?;
    Ok(leagues)
}

/// Leagues whose roster contains `team_id`.
pub async fn leagues_for_team<C: ConnectionTrait>(conn: &C, team_id: i32) -> Result<Vec<league::Model>> {
    let team = find_team(conn, team_id).await?;
    let leagues = team
        .find_related(league::Entity)
        .order_by_asc(league::Column::Id)
        .all(conn)
        .await?;
    Ok(leagues)
}

pub async fn matches_by_week<C: ConnectionTrait>(
    conn: &C,
    league_id: i32,
    week: i32,
) -> Result<Vec<league_match::Model>> {
    let matches = league_match::Entity::find()
        .filter(
            Condition::all()
                .add(league_match::Column::LeagueId.eq(league_id))
                .add(league_match::Column::Week.eq(week)),
        )
        .order_by_asc(league_match::Column::Id)
        .all(conn)
        .await?;
    Ok(matches)
}

pub async fn standing_by_team<C: ConnectionTrait>(
    conn: &C,
    league_id: i32,
    team_id: i32,
) -> Result<Option<standing::Model>> {
    let standing = standing::Entity::find()
        .filter(
            Condition::all()
                .add(standing::Column::LeagueId.eq(league_id))
                .add(standing::Column::TeamId.eq(team_id)),
        )
        .one(conn)
        .await?;
    Ok(standing)
}

/// Standings of a league in retrieval order (id ascending).
pub async fn standings_for_league<C: ConnectionTrait>(conn: &C, league_id: i32) -> Result<Vec<standing::Model>> {
    let standings = standing::Entity::find()
        .filter(standing::Column::LeagueId.eq(league_id))
        .order_by_asc(standing::Column::Id)
        .all(conn)
        .await?;
    Ok(standings)
}

pub async fn list_teams<C: ConnectionTrait>(conn: &C) -> Result<Vec<team::Model>> {
    let teams = team::Entity::find()
        .order_by_asc(team::Column::Id)
        .all(conn)
        .await?;
    Ok(teams)
}

pub async fn create_team<C: ConnectionTrait>(
    conn: &C,
    name: String,
    attack_strength: i32,
    defense_strength: i32,
) -> Result<team::Model> {
    let created = team::ActiveModel {
        name: Set(name),
        attack_strength: Set(attack_strength),
        defense_strength: Set(defense_strength),
        ..Default::default()
    }
        .insert(conn)
        .await?;
    Ok(created)
}

/// Full replace of a team's attributes.
pub async fn update_team<C: ConnectionTrait>(
    conn: &C,
    team_id: i32,
    name: String,
    attack_strength: i32,
    defense_strength: i32,
) -> Result<team::Model> {
    let mut active: team::ActiveModel = find_team(conn, team_id).await?.into();
    active.name = Set(name);
    active.attack_strength = Set(attack_strength);
    active.defense_strength = Set(defense_strength);
    Ok(active.update(conn).await?)
}

pub async fn create_league<C: ConnectionTrait>(conn: &C, name: String) -> Result<league::Model> {
    let created = league::ActiveModel {
        name: Set(name),
        current_week: Set(0),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
        .insert(conn)
        .await?;
    Ok(created)
}

pub async fn rename_league<C: ConnectionTrait>(conn: &C, league_id: i32, name: String) -> Result<league::Model> {
    let mut active: league::ActiveModel = find_league(conn, league_id).await?.into();
    active.name = Set(name);
    Ok(active.update(conn).await?)
}

pub async fn insert_match<C: ConnectionTrait>(
    conn: &C,
    league_id: i32,
    week: i32,
    home_team_id: i32,
    away_team_id: i32,
    home_score: i32,
    away_score: i32,
) -> Result<league_match::Model> {
    let created = league_match::ActiveModel {
        league_id: Set(league_id),
        home_team_id: Set(home_team_id),
        away_team_id: Set(away_team_id),
        home_team_score: Set(home_score),
        away_team_score: Set(away_score),
        week: Set(week),
        ..Default::default()
    }
        .insert(conn)
        .await?;
    Ok(created)
}

pub async fn set_current_week<C: ConnectionTrait>(
    conn: &C,
    league: league::Model,
    week: i32,
) -> Result<league::Model> {
    let mut active: league::ActiveModel = league.into();
    active.current_week = Set(week);
    Ok(active.update(conn).await?)
}

/// Removes every match and standing of a league, leaving its roster intact.
pub async fn clear_season<C: ConnectionTrait>(conn: &C, league_id: i32) -> Result<()> {
    league_match::Entity::delete_many()
        .filter(league_match::Column::LeagueId.eq(league_id))
        .exec(conn)
        .await?;
    standing::Entity::delete_many()
        .filter(standing::Column::LeagueId.eq(league_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Deletes a league with everything it owns.
pub async fn delete_league<C: ConnectionTrait>(conn: &C, league_id: i32) -> Result<()> {
    find_league(conn, league_id).await?;
    clear_season(conn, league_id).await?;
    league_team::Entity::delete_many()
        .filter(league_team::Column::LeagueId.eq(league_id))
        .exec(conn)
        .await?;
    league::Entity::delete_by_id(league_id).exec(conn).await?;
    Ok(())
}
