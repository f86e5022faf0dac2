use anyhow::Result;

#[tracing::instrument(skip(config))]
pub async fn migrate(config: sesame::Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    let pool = sesame::create_pool(&config.database.url, 1).await?;
    sesame_user::migrate(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}
