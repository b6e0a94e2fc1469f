use serde::Serialize;
use thiserror::Error;

/// A span that cannot be unpacked without pushing real content out of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanOverflow {
    #[error(
        "cell at row {row}, column {column} spans {row_span} rows but only {available} rows remain"
    )]
    PastLastRow {
        row: usize,
        column: usize,
        row_span: usize,
        available: usize,
    },
    #[error("cell at row {row}, column {column} pushes content past the end of row {target_row}")]
    PastRowEnd {
        row: usize,
        column: usize,
        target_row: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("malformed table {table_id}: {source}")]
    MalformedTable {
        table_id: String,
        source: SpanOverflow,
    },
}

impl TableError {
    pub fn table_id(&self) -> &str {
        match self {
            Self::MalformedTable { table_id, .. } => table_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Unresolved,
    SelfReference,
    Cycle,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::SelfReference => "self_reference",
            Self::Cycle => "cycle",
        }
    }
}

/// An include row that was dropped instead of spliced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedInclude {
    pub table_id: String,
    pub referenced_id: String,
    pub marker: String,
    pub reason: SkipReason,
}

/// A row whose depth asked for more ancestor levels than the chain had; its
/// parent was clamped to none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HierarchyClamp {
    pub row: usize,
    pub depth: usize,
    pub missing_levels: usize,
}
