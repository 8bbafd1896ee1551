use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;

use crate::entities::{identities, prelude::*};

/// Link between one external (provider, uid) pair and at most one local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i32,
    pub provider: String,
    pub uid: String,
    pub user_id: Option<i32>,
}

impl From<identities::Model> for Identity {
    fn from(model: identities::Model) -> Self {
        Self {
            id: model.id,
            provider: model.provider,
            uid: model.uid,
            user_id: model.user_id,
        }
    }
}

pub struct IdentityRepository {
    conn: DatabaseConnection,
}

impl IdentityRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&self, provider: &str, uid: &str) -> Result<Option<Identity>> {
        let identity = Identities::find()
            .filter(identities::Column::Provider.eq(provider))
            .filter(identities::Column::Uid.eq(uid))
            .one(&self.conn)
            .await
            .context("Failed to query identity")?;
        Ok(identity.map(Identity::from))
    }

    /// First sighting of an external login: record it without an owner. The
    /// unique (provider, uid) index makes a racing duplicate insert fail
    /// rather than fork the identity.
    pub async fn create_unowned(&self, provider: &str, uid: &str) -> Result<Identity> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = identities::ActiveModel {
            provider: Set(provider.to_string()),
            uid: Set(uid.to_string()),
            user_id: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        info!("Recorded identity {}/{}", provider, uid);
        Ok(model.into())
    }

    /// Points the identity at its canonical user.
    pub async fn set_user(&self, id: i32, user_id: i32) -> Result<()> {
        let model = Identities::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Identity not found: {id}"))?;

        let mut active: identities::ActiveModel = model.into();
        active.user_id = Set(Some(user_id));
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }
}
