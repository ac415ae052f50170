use anyhow::{Context, Result};
use semsearch_core::Config;
use semsearch_store::{Connector, QdrantSettings};

pub async fn run_ensure_collection(config: &Config) -> Result<()> {
    let connector = Connector::qdrant(QdrantSettings::from(config));

    connector
        .get_client()
        .await
        .context("Failed to create Qdrant client")?;

    let outcome = connector
        .ensure_collection()
        .await
        .context("Failed to ensure Qdrant collection")?;

    println!(
        "✓ Collection '{}' {} ({} dimensions, cosine)",
        connector.settings().collection,
        outcome,
        connector.settings().vector_size
    );

    Ok(())
}
