// ============================
// openestate-backend-lib/src/storage.rs
// ============================
//! Storage abstraction with a SQLite implementation.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openestate_common::{NewUser, User};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

/// Trait for user store backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Look up a user by its pending confirmation/reset token
    async fn find_by_token(&self, token: &str) -> Result<Option<User>, AppError>;

    /// Insert a new user row
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Persist changes to an existing user
    async fn save(&self, user: &User) -> Result<(), AppError>;
}

/// SQLite implementation of the `UserStore` trait
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at the given URL and apply the schema.
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        sqlx::query(include_str!("../migrations/001_create_users_table.sql"))
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    /// Count registered users
    pub async fn user_count(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, confirmed, token, created_at";

fn user_from_row(row: &SqliteRow) -> Result<User, AppError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        confirmed: row.try_get("confirmed")?,
        token: row.try_get("token")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl UserStore for SqliteStore {
    /// Look up a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| user_from_row(&r)).transpose()
    }

    /// Look up a user by its pending confirmation/reset token
    async fn find_by_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE token = ?"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| user_from_row(&r)).transpose()
    }

    /// Insert a new user row
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            confirmed: false,
            token: Some(new_user.token),
            created_at: Utc::now(),
        };

        let result = sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, confirmed, token, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.confirmed)
        .bind(&user.token)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!(user = %user.id, "user row created");
                Ok(user)
            },
            // Lost a race against a concurrent registration; surfaced to the
            // caller as the same recoverable error the pre-check produces.
            Err(err) if err.to_string().contains("UNIQUE constraint failed: users.email") => {
                Err(AppError::EmailTaken)
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Persist changes to an existing user
    async fn save(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET name = ?, email = ?, password_hash = ?, confirmed = ?, token = ?
             WHERE id = ?",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.confirmed)
        .bind(&user.token)
        .bind(&user.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
