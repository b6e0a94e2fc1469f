//! Table reconstruction: span expansion, include resolution, and row hierarchy.
//!
//! Tables arrive as an owned, already tokenized view (`SourceTable`). Every stage
//! consumes its input by reference and produces a new structure; nothing here
//! touches the parsed HTML document.

mod error;
mod grid;
mod hierarchy;
mod locator;
mod normalize;
mod resolve;
mod rows;

pub use error::SkippedInclude;
pub use hierarchy::{build_hierarchy, path_ids};
pub use locator::TableCatalog;
pub use normalize::{CIOD_PROFILE, MODULE_PROFILE, NormalizedRow, TableProfile, normalize_rows};
pub use resolve::{CycleGuard, TableResolver};
pub use rows::RowClassifier;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellContent {
    pub html: String,
    pub text: String,
    pub links: Vec<String>,
}

#[cfg(test)]
impl CellContent {
    pub fn from_text(text: &str) -> Self {
        Self {
            html: html_escape::encode_text(text).into_owned(),
            text: text.to_string(),
            links: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row_span: usize,
    pub col_span: usize,
    pub content: CellContent,
}

impl Cell {
    pub fn new(row_span: usize, col_span: usize, content: CellContent) -> Self {
        Self {
            row_span: row_span.max(1),
            col_span: col_span.max(1),
            content,
        }
    }

    pub fn single(content: CellContent) -> Self {
        Self::new(1, 1, content)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub rows: Vec<SourceRow>,
}
