use super::capabilities::SchemaCapabilities;
use super::types::{Customer, SalesOrder, Subscription};
use super::Dataset;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct RawExport {
    #[serde(default)]
    customers: Vec<Customer>,
    #[serde(default)]
    orders: Vec<SalesOrder>,
    #[serde(default)]
    subscriptions: Vec<Subscription>,
}

/// Load the record export from a JSON file
///
/// # Errors
///
/// Returns an error if:
/// - The export file does not exist or cannot be read
/// - The content is not valid JSON or rows do not match the expected shape
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        anyhow::bail!("Dataset export not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset export at {}", path.display()))?;

    parse_dataset(&content)
        .with_context(|| format!("Failed to parse dataset export in {}", path.display()))
}

/// Parse an export held in memory. Column capabilities are detected here, once.
pub fn parse_dataset(content: &str) -> Result<Dataset> {
    let raw: serde_json::Value = serde_json::from_str(content).context("Invalid JSON")?;
    let capabilities = SchemaCapabilities::detect(&raw);
    let export: RawExport =
        serde_json::from_value(raw).context("Export rows do not match the expected shape")?;

    tracing::debug!(
        customers = export.customers.len(),
        orders = export.orders.len(),
        subscriptions = export.subscriptions.len(),
        ?capabilities,
        "loaded dataset export"
    );

    Ok(Dataset {
        customers: export.customers,
        orders: export.orders,
        subscriptions: export.subscriptions,
        capabilities,
    })
}
