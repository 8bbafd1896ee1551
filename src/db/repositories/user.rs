use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;
use tracing::info;

use crate::entities::{prelude::*, users};
use crate::models::user::title_case;
use crate::models::{NewUser, User};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Creates an account. The role defaults to volunteer and is written in
    /// the same insert as the rest of the row; names and places are stored in
    /// their title-cased canonical form; the password is Argon2id-hashed off
    /// the async runtime.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let password = new_user.password.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            email: Set(new_user.email.clone()),
            password_hash: Set(password_hash),
            first_name: Set(title_case(&new_user.first_name)),
            last_name: Set(title_case(&new_user.last_name)),
            city: Set(new_user.city.as_deref().map(title_case)),
            country: Set(new_user.country.as_deref().map(title_case)),
            role: Set(new_user.role.unwrap_or_default().as_str().to_string()),
            confirmed: Set(new_user.confirmed),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        info!("Created user {} ({})", model.id, model.email);
        Ok(model.into())
    }

    pub async fn get(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;
        Ok(user.map(User::from))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;
        Ok(user.map(User::from))
    }
}

/// Hash a password using Argon2id with default params.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Random opaque password (20-char hex) for accounts minted by an external
/// login. Never surfaced; the account cannot use password login until the
/// owner sets a real one.
#[must_use]
pub fn generate_opaque_password() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 10] = rng.random();

    bytes.iter().fold(String::with_capacity(20), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
