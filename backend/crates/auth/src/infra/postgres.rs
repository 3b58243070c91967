//! PostgreSQL User Directory
//!
//! The `users` table carries a unique constraint on `email`; that
//! constraint, not a check-then-insert, arbitrates the signup race.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::User;
use crate::domain::repository::UserDirectory;
use crate::domain::value_object::{Email, UserId};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed user directory
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserDirectory for PgUserDirectory {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                password,
                first_name,
                last_name,
                verified,
                google_sign_on,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password.as_deref())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.verified)
        .bind(user.google_sign_on)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AuthError::EmailAlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password,
                first_name,
                last_name,
                verified,
                google_sign_on,
                created_at,
                updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                email,
                password,
                first_name,
                last_name,
                verified,
                google_sign_on,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn set_verified(&self, user_id: &UserId, verified: bool) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET verified = $2, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(verified)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_password(&self, user_id: &UserId, password_hash: &str) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password = $2, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn upsert_oauth_user(
        &self,
        email: &Email,
        first_name: &str,
        last_name: &str,
    ) -> AuthResult<User> {
        // An existing password account keeps its password and flags; only
        // the provider-asserted names are refreshed.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (
                user_id,
                email,
                password,
                first_name,
                last_name,
                verified,
                google_sign_on,
                created_at,
                updated_at
            ) VALUES ($1, $2, NULL, $3, $4, TRUE, TRUE, NOW(), NOW())
            ON CONFLICT (email) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                updated_at = NOW()
            RETURNING
                user_id,
                email,
                password,
                first_name,
                last_name,
                verified,
                google_sign_on,
                created_at,
                updated_at
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(email.as_str())
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_user())
    }
}

// ============================================================================
// Row Mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password: Option<String>,
    first_name: String,
    last_name: String,
    verified: bool,
    google_sign_on: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            verified: self.verified,
            google_sign_on: self.google_sign_on,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
