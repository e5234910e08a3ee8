use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

/// A league running a 38 week season between four teams.
///
/// `current_week` is 0 before the season starts, 1..=38 while it is running and
/// anything above 38 once the last week has been played.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leagues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(default_value = "0")]
    pub current_week: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Relation for the many-to-many relationship with teams.
    #[sea_orm(has_many = "super::league_team::Entity")]
    LeagueTeam,
    /// Matches played in this league. Deleted together with the league.
    #[sea_orm(has_many = "super::league_match::Entity")]
    LeagueMatch,
    /// Standings rows of this league. Deleted together with the league.
    #[sea_orm(has_many = "super::standing::Entity")]
    Standing,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        super::league_team::Relation::Team.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::league_team::Relation::League.def().rev())
    }
}

impl Related<super::league_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeagueMatch.def()
    }
}

impl Related<super::standing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Standing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
