use serde::{Deserialize, Serialize};

use crate::table::SkippedInclude;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiodRecord {
    pub name: String,
    pub id: String,
    pub description: Option<String>,
    pub link_to_standard: String,
    pub order: usize,
    pub modules: Vec<CiodModuleEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiodModuleEntry {
    pub information_entity: String,
    pub module: String,
    pub usage: String,
    pub conditional_statement: Option<String>,
    pub link_to_standard: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    pub name: String,
    pub id: String,
    pub description: Option<String>,
    pub link_to_standard: String,
    pub attributes: Vec<AttributeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeEntry {
    pub name: String,
    pub tag: String,
    #[serde(rename = "type")]
    pub attribute_type: Option<String>,
    pub description: Option<String>,
    pub id: String,
    pub parent_id: Option<String>,
    pub depth: usize,
    /// Macro table the attribute was spliced from.
    pub link_to_standard: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CiodSummary {
    pub name: String,
    pub description: Option<String>,
    pub link_to_standard: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CiodModuleRelation {
    pub ciod: String,
    pub module: String,
    pub usage: String,
    pub conditional_statement: Option<String>,
    pub order: usize,
    pub information_entity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAttributeRelation {
    pub module: String,
    pub path: String,
    pub tag: String,
    pub order: usize,
    pub depth: usize,
    #[serde(rename = "type")]
    pub attribute_type: Option<String>,
    pub link_to_standard: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub id: String,
    pub name: String,
    pub row_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableInventory {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_path: String,
    pub source_sha256: String,
    pub chapter_id: String,
    pub table_count: usize,
    pub tables: Vec<TableSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedTable {
    pub table_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClampedRow {
    pub table_id: String,
    pub row: usize,
    pub depth: usize,
    pub missing_levels: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub manifest_version: u32,
    pub generated_at: String,
    pub command: String,
    pub source_path: String,
    pub source_sha256: String,
    pub chapter_id: String,
    pub cycle_guard: String,
    pub tables_in_chapter: usize,
    pub tables_matched: usize,
    pub records_written: usize,
    pub skipped_tables: Vec<SkippedTable>,
    pub skipped_includes: Vec<SkippedInclude>,
    pub hierarchy_clamps: Vec<ClampedRow>,
}
