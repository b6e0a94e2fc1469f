use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::InventoryArgs;
use crate::document::StandardDocument;
use crate::model::{TableInventory, TableSummary};
use crate::table::TableCatalog;
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let inventory = build_inventory(&args.standard, &args.chapter)?;

    match &args.output {
        Some(path) => {
            write_json_pretty(path, &inventory)?;
            info!(path = %path.display(), "wrote table inventory");
        }
        None => {
            let rendered = serde_json::to_string_pretty(&inventory)
                .context("failed to serialize table inventory")?;
            println!("{rendered}");
        }
    }
    info!(
        chapter_id = %inventory.chapter_id,
        table_count = inventory.table_count,
        "inventory completed"
    );

    Ok(())
}

pub fn build_inventory(standard: &Path, chapter_id: &str) -> Result<TableInventory> {
    let document = StandardDocument::load(standard)?;
    let table_ids = document.chapter_table_ids(chapter_id)?;
    let catalog = TableCatalog::new(document.tables());

    let tables = table_ids
        .iter()
        .filter_map(|id| catalog.find(id))
        .map(|table| TableSummary {
            id: table.id.clone(),
            name: table.name.clone(),
            row_count: table.rows.len(),
        })
        .collect::<Vec<_>>();

    Ok(TableInventory {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_path: standard.display().to_string(),
        source_sha256: sha256_file(standard)?,
        chapter_id: chapter_id.to_string(),
        table_count: tables.len(),
        tables,
    })
}
