//! User store: registration and credential checks backed by SQLite

mod command;
mod error;
pub mod password;

pub use command::{Command, LoginInput, RegisterInput, User, normalize_email};
pub use error::{UserError, UserResult};

/// Apply the embedded schema migrations
pub async fn migrate(pool: &sqlx::SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
