use anyhow::Result;
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::commands::extract::{ExtractedTable, extract_tables, finish};
use crate::markup::clean_description_html;
use crate::model::{AttributeEntry, ClampedRow, ModuleRecord};
use crate::table::{MODULE_PROFILE, build_hierarchy, path_ids};
use crate::util::{clean_table_name, create_slug, standard_link, write_json_pretty};

const NAME: usize = 0;
const TAG: usize = 1;
const TYPE: usize = 2;
const DESCRIPTION: usize = 3;

pub fn run(args: ExtractArgs) -> Result<()> {
    let mut extraction = extract_tables(&args, &MODULE_PROFILE, "modules")?;

    let mut modules = Vec::with_capacity(extraction.tables.len());
    for table in &extraction.tables {
        let (module, clamps) = build_module(table, &args.base_url, &args.part_page);
        for clamp in &clamps {
            warn!(
                table_id = %table.id,
                row = clamp.row,
                depth = clamp.depth,
                missing_levels = clamp.missing_levels,
                "attribute nested deeper than its ancestors; parent cleared"
            );
        }
        extraction.report.hierarchy_clamps.extend(clamps);
        modules.push(module);
    }

    extraction.report.records_written = modules.len();
    write_json_pretty(&args.output, &modules)?;
    info!(path = %args.output.display(), modules = modules.len(), "wrote module tables");

    finish(&extraction.report, args.report_path.as_deref())
}

/// Turns a resolved attribute table into a module record whose attributes
/// carry `parent:child` ids derived from their tags.
pub fn build_module(
    table: &ExtractedTable,
    base_url: &str,
    part_page: &str,
) -> (ModuleRecord, Vec<ClampedRow>) {
    let name = clean_table_name(&table.name);
    let depths = table.rows.iter().map(|row| row.depth).collect::<Vec<_>>();
    let outcome = build_hierarchy(&depths);

    let keys = table
        .rows
        .iter()
        .map(|row| create_slug(row.value(TAG).unwrap_or_default()))
        .collect::<Vec<_>>();
    let ids = path_ids(&keys, &outcome.nodes);

    let attributes = table
        .rows
        .iter()
        .zip(&outcome.nodes)
        .zip(&ids)
        .map(|((row, node), id)| AttributeEntry {
            name: row.value(NAME).unwrap_or_default().to_string(),
            tag: row.value(TAG).unwrap_or_default().to_uppercase(),
            attribute_type: row.value(TYPE).map(str::to_owned),
            description: row.value(DESCRIPTION).map(str::to_owned),
            id: id.clone(),
            parent_id: node.parent.and_then(|parent| ids.get(parent)).cloned(),
            depth: node.depth,
            link_to_standard: row
                .macro_table_id
                .as_deref()
                .map(|macro_id| standard_link(base_url, part_page, macro_id)),
        })
        .collect();

    let clamps = outcome
        .clamps
        .iter()
        .map(|clamp| ClampedRow {
            table_id: table.id.clone(),
            row: clamp.row,
            depth: clamp.depth,
            missing_levels: clamp.missing_levels,
        })
        .collect();

    let module = ModuleRecord {
        id: create_slug(&name),
        name,
        description: table
            .description
            .as_deref()
            .map(|html| clean_description_html(html, base_url)),
        link_to_standard: standard_link(base_url, part_page, &table.id),
        attributes,
    };

    (module, clamps)
}
