use tracing::{debug, warn};

use super::error::{SkipReason, SkippedInclude, TableError};
use super::grid::expand_spans;
use super::locator::TableCatalog;
use super::rows::{IncludeRow, RowClassifier, RowKind};
use super::{Cell, CellContent, SourceTable};

/// Nesting limit for the caller-only guard, which cannot see longer cycles.
const MAX_INCLUDE_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleGuard {
    /// Refuse any table already being expanded further up the include chain.
    #[default]
    Ancestors,
    /// Refuse only a table including itself directly.
    Caller,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRow {
    pub cells: Vec<Option<CellContent>>,
    pub depth: usize,
    /// Innermost included table this row was spliced from.
    pub macro_table_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTable {
    pub id: String,
    pub rows: Vec<ResolvedRow>,
    pub skipped: Vec<SkippedInclude>,
}

#[derive(Debug)]
struct FlatRow {
    cells: Vec<Option<Cell>>,
    depth: usize,
    macro_table_id: Option<String>,
}

pub struct TableResolver<'a> {
    catalog: &'a TableCatalog,
    classifier: &'a RowClassifier,
    guard: CycleGuard,
    width: usize,
}

impl<'a> TableResolver<'a> {
    pub fn new(
        catalog: &'a TableCatalog,
        classifier: &'a RowClassifier,
        guard: CycleGuard,
        width: usize,
    ) -> Self {
        Self {
            catalog,
            classifier,
            guard,
            width,
        }
    }

    /// Runs classification, include splicing and span expansion over `table`,
    /// recursing into every included table with the same pipeline.
    pub fn resolve(&self, table: &SourceTable) -> Result<ResolvedTable, TableError> {
        let mut expanding = Vec::<String>::new();
        let mut skipped = Vec::<SkippedInclude>::new();
        let rows = self.expand_table(table, None, &mut expanding, &mut skipped)?;

        Ok(ResolvedTable {
            id: table.id.clone(),
            rows,
            skipped,
        })
    }

    fn expand_table(
        &self,
        table: &SourceTable,
        origin: Option<&str>,
        expanding: &mut Vec<String>,
        skipped: &mut Vec<SkippedInclude>,
    ) -> Result<Vec<ResolvedRow>, TableError> {
        expanding.push(table.id.clone());
        let flattened = self.flatten_rows(table, origin, expanding, skipped);
        expanding.pop();

        let (cells, metadata): (Vec<_>, Vec<_>) = flattened?
            .into_iter()
            .map(|row| (row.cells, (row.depth, row.macro_table_id)))
            .unzip();

        let grid = expand_spans(&cells, self.width).map_err(|source| {
            TableError::MalformedTable {
                table_id: table.id.clone(),
                source,
            }
        })?;

        Ok(grid
            .into_iter()
            .zip(metadata)
            .map(|(cells, (depth, macro_table_id))| ResolvedRow {
                cells,
                depth,
                macro_table_id,
            })
            .collect())
    }

    fn flatten_rows(
        &self,
        table: &SourceTable,
        origin: Option<&str>,
        expanding: &mut Vec<String>,
        skipped: &mut Vec<SkippedInclude>,
    ) -> Result<Vec<FlatRow>, TableError> {
        let mut flattened = Vec::with_capacity(table.rows.len());

        for row in &table.rows {
            match self.classifier.classify(row) {
                RowKind::Data(data) => flattened.push(FlatRow {
                    cells: data.cells.into_iter().map(Some).collect(),
                    depth: data.depth,
                    macro_table_id: origin.map(str::to_owned),
                }),
                RowKind::Include(include) => {
                    let spliced = self.splice_include(table, &include, expanding, skipped)?;
                    flattened.extend(spliced);
                }
                RowKind::DiscardedHeader { text } => {
                    debug!(table_id = %table.id, text = %text, "discarded header row");
                }
            }
        }

        Ok(flattened)
    }

    fn splice_include(
        &self,
        caller: &SourceTable,
        include: &IncludeRow,
        expanding: &mut Vec<String>,
        skipped: &mut Vec<SkippedInclude>,
    ) -> Result<Vec<FlatRow>, TableError> {
        let lookup = match self.guard_violation(&caller.id, &include.referenced_id, expanding) {
            Some(reason) => Err(reason),
            None => self
                .catalog
                .find(&include.referenced_id)
                .ok_or(SkipReason::Unresolved),
        };
        let referenced = match lookup {
            Ok(referenced) => referenced,
            Err(reason) => {
                warn!(
                    table_id = %caller.id,
                    referenced_id = %include.referenced_id,
                    reason = reason.as_str(),
                    "include not expanded"
                );
                skipped.push(SkippedInclude {
                    table_id: caller.id.clone(),
                    referenced_id: include.referenced_id.clone(),
                    marker: include.marker.clone(),
                    reason,
                });
                return Ok(Vec::new());
            }
        };

        let rows = self.expand_table(referenced, Some(referenced.id.as_str()), expanding, skipped)?;
        debug!(
            table_id = %caller.id,
            referenced_id = %referenced.id,
            rows = rows.len(),
            depth = include.depth,
            "spliced include"
        );

        Ok(rows
            .into_iter()
            .map(|row| FlatRow {
                cells: row
                    .cells
                    .into_iter()
                    .map(|slot| slot.map(Cell::single))
                    .collect(),
                depth: include.depth,
                macro_table_id: row.macro_table_id,
            })
            .collect())
    }

    fn guard_violation(
        &self,
        caller_id: &str,
        referenced_id: &str,
        expanding: &[String],
    ) -> Option<SkipReason> {
        if referenced_id == caller_id {
            return Some(SkipReason::SelfReference);
        }

        match self.guard {
            CycleGuard::Ancestors if expanding.iter().any(|id| id == referenced_id) => {
                Some(SkipReason::Cycle)
            }
            CycleGuard::Caller if expanding.len() >= MAX_INCLUDE_DEPTH => Some(SkipReason::Cycle),
            _ => None,
        }
    }
}
