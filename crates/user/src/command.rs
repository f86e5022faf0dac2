use serde::{Deserialize, Serialize};
use sqlx::{SqlitePool, prelude::FromRow};
use ulid::Ulid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::password::{hash_password, verify_password};

/// Public projection of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: Option<String>,
    password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "Password must be between 6 and 128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Emails are compared case-insensitively and without surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct Command {
    pool: SqlitePool,
}

impl Command {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new account and return its public projection
    pub async fn register(&self, input: RegisterInput) -> UserResult<User> {
        let input = RegisterInput {
            email: normalize_email(&input.email),
            name: input
                .name
                .map(|name| name.trim().to_owned())
                .filter(|name| !name.is_empty()),
            ..input
        };
        input.validate()?;

        if self.find_row_by_email(&input.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&input.password)?;
        let id = Ulid::new().to_string();
        let created_at = time::OffsetDateTime::now_utc().unix_timestamp();

        let result = sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&input.email)
        .bind(&input.name)
        .bind(&password_hash)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        // A concurrent registration can win between the lookup and the insert
        if let Err(e) = result {
            if e
                .as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation())
            {
                return Err(UserError::EmailAlreadyExists);
            }
            return Err(UserError::DatabaseError(e));
        }

        tracing::info!(user_id = %id, "user registered");

        Ok(User {
            id,
            email: input.email,
            name: input.name,
        })
    }

    /// Check credentials. Unknown email and wrong password are indistinguishable.
    pub async fn login(&self, input: LoginInput) -> UserResult<User> {
        let input = LoginInput {
            email: normalize_email(&input.email),
            ..input
        };
        input.validate()?;

        let Some(row) = self.find_row_by_email(&input.email).await? else {
            tracing::warn!(email = %input.email, "login for unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !verify_password(&input.password, &row.password_hash)? {
            tracing::warn!(user_id = %row.id, "login with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        Ok(row.into())
    }

    pub async fn find_by_id(&self, id: &str) -> UserResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, password_hash FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    pub async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let row = self.find_row_by_email(&normalize_email(email)).await?;

        Ok(row.map(User::from))
    }

    async fn find_row_by_email(&self, email: &str) -> UserResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, name, password_hash FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
