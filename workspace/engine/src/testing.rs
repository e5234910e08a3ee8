//! Shared fixtures for the engine tests.

use migration::{Migrator, MigratorTrait};
use model::entities::{league, league_team, team};
use crate::progression::DEMO_TEAMS;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn create_team(db: &DatabaseConnection, name: &str, attack: i32, defense: i32) -> team::Model {
    team::ActiveModel {
        name: Set(name.to_string()),
        attack_strength: Set(attack),
        defense_strength: Set(defense),
        ..Default::default()
    }
        .insert(db)
        .await
        .unwrap()
}

pub async fn create_league(db: &DatabaseConnection, name: &str) -> league::Model {
    league::ActiveModel {
        name: Set(name.to_string()),
        current_week: Set(0),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
        .insert(db)
        .await
        .unwrap()
}

pub async fn attach(db: &DatabaseConnection, league_id: i32, team_id: i32) {
    league_team::ActiveModel {
        league_id: Set(league_id),
        team_id: Set(team_id),
    }
        .insert(db)
        .await
        .unwrap();
}

/// An unstarted league with the four demo teams attached, teams in roster order.
pub async fn reference_league(db: &DatabaseConnection) -> (league::Model, Vec<team::Model>) {
    let league = create_league(db, "Premier League").await;
    let mut teams = Vec::new();
    for (name, attack, defense) in DEMO_TEAMS {
        let team = create_team(db, name, attack, defense).await;
        attach(db, league.id, team.id).await;
        teams.push(team);
    }
    (league, teams)
}
