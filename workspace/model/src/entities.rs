//! SeaORM entity modules for the league manager.
//!
//! Teams exist on their own and are attached to leagues through the `league_teams`
//! join table. Matches and standings are owned by a league.

pub mod league;
pub mod league_match;
pub mod league_team;
pub mod standing;
pub mod team;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::league::Entity as League;
    pub use super::league_match::Entity as LeagueMatch;
    pub use super::league_team::Entity as LeagueTeam;
    pub use super::standing::Entity as Standing;
    pub use super::team::Entity as Team;
}
