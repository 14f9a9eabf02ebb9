use anyhow::Context;

use crate::config::AppConfig;
use crate::database::PgItemStore;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    let url = config
        .database
        .url
        .as_deref()
        .context("DATABASE_URL is required for migrate")?;

    PgItemStore::open(
        url,
        config.database.max_connections,
        config.database.store_timeout(),
    )
    .await?;

    Ok(())
}
