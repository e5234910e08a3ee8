use sea_orm::entity::prelude::*;

/// A football team. Teams live independently of leagues and may take part in several.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Goal-scoring strength, usually in 0..=100.
    pub attack_strength: i32,
    /// Goal-preventing strength, usually in 0..=100.
    pub defense_strength: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Relation for the many-to-many relationship with leagues.
    #[sea_orm(has_many = "super::league_team::Entity")]
    LeagueTeam,
    #[sea_orm(has_many = "super::standing::Entity")]
    Standing,
}

impl Related<super::league::Entity> for Entity {
    fn to() -> RelationDef {
        super::league_team::Relation::League.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::league_team::Relation::Team.def().rev())
    }
}

impl Related<super::standing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Standing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
