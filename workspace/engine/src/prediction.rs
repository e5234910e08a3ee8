use common::TeamPrediction;
use model::entities::{standing, team};

use crate::season::{ROSTER_SIZE, SeasonViolation};

const POINTS_WEIGHT: f64 = 0.5;
const ATTACK_WEIGHT: f64 = 0.3;
const DEFENSE_WEIGHT: f64 = 0.2;

/// Estimates each team's chance of winning the league.
///
/// Every team gets `0.5 * points share + 0.3 * attack share + 0.2 * defense share`,
/// the scores are normalized to sum to one and sorted by probability descending.
/// Equal probabilities are ordered by team id ascending.
pub fn predict(
    league_id: i32,
    standings: &[standing::Model],
    teams: &[team::Model],
) -> Result<Vec<TeamPrediction>, SeasonViolation> {
    if standings.len() != ROSTER_SIZE || teams.len() != ROSTER_SIZE {
        return Err(SeasonViolation::IncompleteData(format!(
            "expected {} standings and {} teams, found {} and {}",
            ROSTER_SIZE,
            ROSTER_SIZE,
            standings.len(),
            teams.len()
        )));
    }

    let total_points: i64 = standings.iter().map(|s| i64::from(s.points)).sum();
    let total_attack: i64 = teams.iter().map(|t| i64::from(t.attack_strength)).sum();
    let total_defense: i64 = teams.iter().map(|t| i64::from(t.defense_strength)).sum();
    if total_points <= 0 || total_attack <= 0 || total_defense <= 0 {
        return Err(SeasonViolation::IncompleteData(format!(
            "totals must be positive (points {}, attack {}, defense {})",
            total_points, total_attack, total_defense
        )));
    }

    let mut scored = Vec::with_capacity(ROSTER_SIZE);
    for row in standings {
        let team = teams
            .iter()
            .find(|t| t.id == row.team_id)
            .ok_or_else(|| SeasonViolation::IncompleteData(format!("no team for standing of team {}", row.team_id)))?;

        let score = POINTS_WEIGHT * f64::from(row.points) / total_points as f64
            + ATTACK_WEIGHT * f64::from(team.attack_strength) / total_attack as f64
            + DEFENSE_WEIGHT * f64::from(team.defense_strength) / total_defense as f64;
        scored.push((team, score));
    }

    let total_score: f64 = scored.iter().map(|(_, score)| score).sum();
    let mut predictions: Vec<TeamPrediction> = scored
        .into_iter()
        .map(|(team, score)| TeamPrediction {
            league_id,
            team_id: team.id,
            team_name: team.name.clone(),
            win_probability: score / total_score,
        })
        .collect();

    predictions.sort_by(|a, b| {
        b.win_probability
            .total_cmp(&a.win_probability)
            .then(a.team_id.cmp(&b.team_id))
    });
    Ok(predictions)
}
