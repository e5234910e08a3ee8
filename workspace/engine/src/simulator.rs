use model::entities::team;
use rand::Rng;

/// Goals scored by one side of a match.
///
/// `base + trunc(u1 * attack / 100 * 10) - trunc(u2 * defense / 100 * 5)` where
/// `base` is uniform in {0, 1, 2} and `u1`, `u2` are uniform in [0, 1).
/// Attack weighs twice as much as defense. Never negative.
pub fn simulate_score<R: Rng + ?Sized>(rng: &mut R, attack: i32, defense: i32) -> i32 {
    let base: i32 = rng.gen_range(0..3);
    let attack_factor = rng.r#gen::<f64>() * f64::from(attack) / 100.0;
    let defense_factor = rng.r#gen::<f64>() * f64::from(defense) / 100.0;

    let score = base + (attack_factor * 10.0) as i32 - (defense_factor * 5.0) as i32;
    score.max(0)
}

/// Simulates a full match and returns `(home_score, away_score)`.
pub fn simulate_match<R: Rng + ?Sized>(rng: &mut R, home: &team::Model, away: &team::Model) -> (i32, i32) {
    let home_score = simulate_score(rng, home.attack_strength, away.defense_strength);
    let away_score = simulate_score(rng, away.attack_strength, home.defense_strength);
    (home_score, away_score)
}
