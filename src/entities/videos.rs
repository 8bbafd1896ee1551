use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    /// One of the known subject vocabulary; validated before insert.
    pub subject: String,

    pub starred: bool,

    /// Reference into the external metadata source.
    #[sea_orm(unique)]
    pub external_id: String,

    pub duration_seconds: Option<i32>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::translations::Entity")]
    Translations,
}

impl Related<super::translations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Translations.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        super::translations::Relation::Users.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::translations::Relation::Videos.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
