//! The `lbase search` command.

use anyhow::{Context, Result};

use localbase_core::client::LocalClient;
use localbase_core::search::SearchParams;
use localbase_infra::sqlite::SqliteDocumentStore;

/// Parse the `--embedding` argument.
pub fn parse_embedding(raw: &str) -> Result<Vec<f64>> {
    serde_json::from_str(raw).context("--embedding must be a JSON array of numbers")
}

/// Open the store, run the RPC, and print the result to stdout.
///
/// Soft failures (unknown RPC name, write errors absorbed by the store)
/// print a JSON object with an `error` field; only raised errors exit
/// non-zero.
pub async fn run(
    database_url: &str,
    func: &str,
    embedding: &str,
    threshold: f64,
    limit: usize,
) -> Result<()> {
    let query_embedding = parse_embedding(embedding)?;

    let store = SqliteDocumentStore::connect(database_url).await?;
    let client = LocalClient::new(store);

    let params = SearchParams::new(query_embedding)
        .with_threshold(threshold)
        .with_limit(limit);
    let result = client.rpc(func, params).execute().await;

    if let Some(error) = &result.error {
        println!("{}", serde_json::json!({ "error": error }));
        return Ok(());
    }

    let data = result.data.unwrap_or_default();
    println!("{}", serde_json::to_string(&data)?);
    Ok(())
}
