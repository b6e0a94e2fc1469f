use std::path::Path;

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::cli::ExtractArgs;
use crate::document::StandardDocument;
use crate::model::{RunReport, SkippedTable};
use crate::table::{
    NormalizedRow, RowClassifier, TableCatalog, TableProfile, TableResolver, normalize_rows,
};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

/// One matched table after include resolution and column normalization.
#[derive(Debug, Clone)]
pub struct ExtractedTable {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub rows: Vec<NormalizedRow>,
}

pub struct Extraction {
    pub tables: Vec<ExtractedTable>,
    pub report: RunReport,
}

/// Loads the standard, resolves every table of the profile's chapter whose
/// title matches the profile, and normalizes its rows. Malformed tables are
/// recorded in the report and left out.
pub fn extract_tables(
    args: &ExtractArgs,
    profile: &TableProfile,
    command: &str,
) -> Result<Extraction> {
    let document = StandardDocument::load(&args.standard)?;
    let chapter_id = args.chapter.as_deref().unwrap_or(profile.chapter_id);
    let chapter_tables = document.chapter_table_ids(chapter_id)?;

    let catalog = TableCatalog::new(document.tables());
    if catalog.is_empty() {
        bail!("no tables found in {}", args.standard.display());
    }
    let name_pattern = Regex::new(profile.name_pattern)
        .with_context(|| format!("failed to compile table name regex {}", profile.name_pattern))?;
    let classifier = RowClassifier::new()?;
    let resolver = TableResolver::new(
        &catalog,
        &classifier,
        args.cycle_guard.into(),
        profile.width(),
    );
    debug!(tables = catalog.len(), chapter_id, "indexed document tables");

    let mut report = RunReport {
        manifest_version: 1,
        generated_at: now_utc_string(),
        command: command.to_string(),
        source_path: args.standard.display().to_string(),
        source_sha256: sha256_file(&args.standard)?,
        chapter_id: chapter_id.to_string(),
        cycle_guard: args.cycle_guard.as_str().to_string(),
        tables_in_chapter: chapter_tables.len(),
        tables_matched: 0,
        records_written: 0,
        skipped_tables: Vec::new(),
        skipped_includes: Vec::new(),
        hierarchy_clamps: Vec::new(),
    };

    let mut tables = Vec::new();
    for table_id in &chapter_tables {
        let Some(table) = catalog.find(table_id) else {
            continue;
        };
        if !name_pattern.is_match(&table.name) {
            continue;
        }
        report.tables_matched += 1;

        let resolved = match resolver.resolve(table) {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(
                    table_id = %table.id,
                    malformed_table_id = %err.table_id(),
                    error = %err,
                    "skipping malformed table"
                );
                report.skipped_tables.push(SkippedTable {
                    table_id: table.id.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        debug!(
            table_id = %table.id,
            rows = resolved.rows.len(),
            skipped_includes = resolved.skipped.len(),
            "resolved table"
        );
        report.skipped_includes.extend(resolved.skipped);
        tables.push(ExtractedTable {
            id: table.id.clone(),
            name: table.name.clone(),
            description: table.description.clone(),
            rows: normalize_rows(&resolved.rows, profile, &args.base_url),
        });
    }

    Ok(Extraction { tables, report })
}

pub fn finish(report: &RunReport, report_path: Option<&Path>) -> Result<()> {
    if let Some(path) = report_path {
        write_json_pretty(path, report)?;
        info!(path = %path.display(), "wrote run report");
    }

    info!(
        command = %report.command,
        tables_matched = report.tables_matched,
        records_written = report.records_written,
        skipped_tables = report.skipped_tables.len(),
        skipped_includes = report.skipped_includes.len(),
        hierarchy_clamps = report.hierarchy_clamps.len(),
        "extraction completed"
    );

    Ok(())
}
