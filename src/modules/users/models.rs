use chrono::{DateTime, Utc};
use sqlx::FromRow;

use libris_db::Db;

/// A registered library user. Only the password hash is stored.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Validated registration data, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

pub struct UserRepo<'a> {
    db: &'a Db,
}

impl<'a> UserRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Case-insensitive email lookup.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE email = ? COLLATE NOCASE")
            .bind(email)
            .fetch_optional(self.db)
            .await
    }

    pub async fn insert(&self, user: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO users (id, name, email, password_hash, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(libris_db::new_id())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .fetch_one(self.db)
        .await
    }
}
