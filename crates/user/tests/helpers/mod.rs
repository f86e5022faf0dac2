use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

pub async fn setup_test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sesame_user::migrate(&pool).await?;

    Ok(pool)
}

#[allow(dead_code)]
pub async fn create_user(
    cmd: &sesame_user::Command,
    name: impl Into<String>,
) -> anyhow::Result<sesame_user::User> {
    let name = name.into();
    let user = cmd
        .register(sesame_user::RegisterInput {
            email: format!("{name}@sesame.localhost"),
            password: "my_password".to_owned(),
            name: Some(name),
        })
        .await?;

    Ok(user)
}
