use crate::season::{ensure_roster_size, SeasonViolation};

/// A pairing of two roster positions: (home, away).
pub type Fixture = (usize, usize);

/// The three distinct pairings of a four team round robin.
/// Week 1 uses the first entry, week 2 the second, and the cycle repeats every three weeks.
const WEEK_CYCLE: [[Fixture; 2]; 3] = [
    [(0, 1), (2, 3)],
    [(0, 2), (1, 3)],
    [(0, 3), (1, 2)],
];

/// Returns the two fixtures played in `week` by a roster of `roster_size` teams.
///
/// Indices refer to positions in the ordered roster. Weeks 1, 4, 7, ... share a pairing.
pub fn fixtures_for_week(roster_size: usize, week: i32) -> Result<[Fixture; 2], SeasonViolation> {
    ensure_roster_size(roster_size)?;
    let cycle = (week - 1).rem_euclid(WEEK_CYCLE.len() as i32) as usize;
    Ok(WEEK_CYCLE[cycle])
}
