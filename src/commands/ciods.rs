use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::commands::extract::{ExtractedTable, extract_tables, finish};
use crate::markup::clean_description_html;
use crate::model::{CiodModuleEntry, CiodRecord, SkippedTable};
use crate::table::CIOD_PROFILE;
use crate::util::{
    clean_table_name, condense_whitespace, create_slug, href_fragment, standard_link,
    write_json_pretty,
};

const INFORMATION_ENTITY: usize = 0;
const MODULE: usize = 1;
const REFERENCE: usize = 2;
const USAGE: usize = 3;

pub fn run(args: ExtractArgs) -> Result<()> {
    let mut extraction = extract_tables(&args, &CIOD_PROFILE, "ciods")?;

    let mut ciods = Vec::with_capacity(extraction.tables.len());
    for table in &extraction.tables {
        match build_ciod(table, ciods.len(), &args.base_url, &args.part_page) {
            Ok(ciod) => ciods.push(ciod),
            Err(err) => {
                warn!(table_id = %table.id, error = %err, "skipping CIOD table");
                extraction.report.skipped_tables.push(SkippedTable {
                    table_id: table.id.clone(),
                    reason: format!("{err:#}"),
                });
            }
        }
    }

    extraction.report.records_written = ciods.len();
    write_json_pretty(&args.output, &ciods)?;
    info!(path = %args.output.display(), ciods = ciods.len(), "wrote CIOD tables");

    finish(&extraction.report, args.report_path.as_deref())
}

pub fn build_ciod(
    table: &ExtractedTable,
    order: usize,
    base_url: &str,
    part_page: &str,
) -> Result<CiodRecord> {
    let name = clean_table_name(&table.name);

    let modules = table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let (usage, conditional_statement) =
                expand_conditional_statement(row.value(USAGE).unwrap_or_default())
                    .with_context(|| format!("row {index} of {}", table.id))?;

            Ok(CiodModuleEntry {
                information_entity: row
                    .value(INFORMATION_ENTITY)
                    .unwrap_or_default()
                    .to_string(),
                module: row.value(MODULE).unwrap_or_default().to_string(),
                usage,
                conditional_statement,
                link_to_standard: row
                    .value(REFERENCE)
                    .map(|href| standard_link(base_url, part_page, href_fragment(href))),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CiodRecord {
        id: create_slug(&name),
        name,
        description: table
            .description
            .as_deref()
            .map(|html| clean_description_html(html, base_url)),
        link_to_standard: standard_link(base_url, part_page, &table.id),
        order,
        modules,
    })
}

/// Splits a usage cell into its code and, for conditional modules, the
/// condition text: `C - Required if ...` yields `("C", Some("Required if ..."))`.
pub fn expand_conditional_statement(usage: &str) -> Result<(String, Option<String>)> {
    let usage = condense_whitespace(usage);
    let mut chars = usage.chars();
    let Some(code) = chars.next() else {
        bail!("usage field is empty");
    };

    let rest = chars.as_str().trim_start();
    let rest = rest.strip_prefix('-').unwrap_or(rest).trim();
    let conditional = (code == 'C' && !rest.is_empty()).then(|| rest.to_string());

    Ok((code.to_string(), conditional))
}
