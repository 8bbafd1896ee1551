use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// May be a synthesized `change@me-...` placeholder until the owner
    /// verifies a real address.
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Stored title-cased.
    pub first_name: String,

    /// Stored title-cased.
    pub last_name: String,

    pub city: Option<String>,

    pub country: Option<String>,

    /// One of `superadmin`, `admin`, `volunteer`. Assigned at creation.
    pub role: String,

    /// Externally-authenticated accounts are created pre-confirmed.
    pub confirmed: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::translations::Entity")]
    Translations,
    #[sea_orm(has_many = "super::identities::Entity")]
    Identities,
}

impl Related<super::translations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Translations.def()
    }
}

impl Related<super::identities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Identities.def()
    }
}

impl Related<super::videos::Entity> for Entity {
    fn to() -> RelationDef {
        super::translations::Relation::Videos.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::translations::Relation::Users.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
