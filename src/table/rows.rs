use anyhow::{Context, Result};
use regex::Regex;

use super::{Cell, SourceRow};
use crate::util::{condense_whitespace, href_fragment};

const DEPTH_MARKER: char = '>';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Data(DataRow),
    Include(IncludeRow),
    DiscardedHeader { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRow {
    pub cells: Vec<Cell>,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeRow {
    pub referenced_id: String,
    pub depth: usize,
    pub marker: String,
}

/// Decides once per source row whether it is data, an include marker, or page
/// furniture. Depth markers on the first cell are converted to an integer here
/// and removed from the cell text.
#[derive(Debug, Clone)]
pub struct RowClassifier {
    include_regex: Regex,
    furniture_regex: Regex,
}

impl RowClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            include_regex: Regex::new(r"Include").context("failed to compile include regex")?,
            furniture_regex: Regex::new(r"(?s)COD|Include|Any Attribute")
                .context("failed to compile header row regex")?,
        })
    }

    pub fn classify(&self, row: &SourceRow) -> RowKind {
        let Some(first_cell) = row.cells.first() else {
            return RowKind::DiscardedHeader {
                text: String::new(),
            };
        };
        let text = first_cell.content.text.as_str();

        if self.include_regex.is_match(text)
            && let Some(href) = first_cell.content.links.first()
        {
            return RowKind::Include(IncludeRow {
                referenced_id: href_fragment(href).to_string(),
                depth: depth_marker_count(text),
                marker: condense_whitespace(text),
            });
        }

        if self.furniture_regex.is_match(text) {
            return RowKind::DiscardedHeader {
                text: condense_whitespace(text),
            };
        }

        let depth = depth_marker_count(text);
        let mut cells = row.cells.clone();
        cells[0].content.text = strip_depth_markers(text).to_string();

        RowKind::Data(DataRow { cells, depth })
    }
}

pub(crate) fn depth_marker_count(text: &str) -> usize {
    text.trim_start()
        .chars()
        .take_while(|ch| *ch == DEPTH_MARKER)
        .count()
}

pub(crate) fn strip_depth_markers(text: &str) -> &str {
    text.trim_start().trim_start_matches(DEPTH_MARKER).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CellContent;

    fn row(first: CellContent) -> SourceRow {
        SourceRow {
            cells: vec![
                Cell::single(first),
                Cell::single(CellContent::from_text("(0008,0100)")),
            ],
        }
    }

    fn linked(text: &str, href: &str) -> CellContent {
        CellContent {
            html: String::new(),
            text: text.to_string(),
            links: vec![href.to_string()],
        }
    }

    #[test]
    fn depth_markers_are_counted_after_leading_whitespace() {
        assert_eq!(depth_marker_count("Code Value"), 0);
        assert_eq!(depth_marker_count("\n>>Code Meaning"), 2);
        assert_eq!(depth_marker_count(">Value > 3"), 1);
        assert_eq!(strip_depth_markers("\n>>Code Meaning\n"), "Code Meaning");
    }

    #[test]
    fn include_row_with_link_becomes_include_marker() {
        let classifier = RowClassifier::new().expect("classifier builds");
        let include = row(linked(
            ">>Include Table 8.8-1 'Code Sequence Macro Attributes'",
            "part03.html#table_8.8-1",
        ));

        let kind = classifier.classify(&include);

        assert_eq!(
            kind,
            RowKind::Include(IncludeRow {
                referenced_id: "table_8.8-1".to_string(),
                depth: 2,
                marker: ">>Include Table 8.8-1 'Code Sequence Macro Attributes'".to_string(),
            })
        );
    }

    #[test]
    fn include_text_without_link_is_discarded() {
        let classifier = RowClassifier::new().expect("classifier builds");

        let kind = classifier.classify(&row(CellContent::from_text(
            "Include any Attributes of the Macro",
        )));

        assert!(matches!(kind, RowKind::DiscardedHeader { .. }));
    }

    #[test]
    fn page_furniture_rows_are_discarded() {
        let classifier = RowClassifier::new().expect("classifier builds");

        for text in ["Any Attribute from the Module", "COD Attributes", ""] {
            let kind = if text.is_empty() {
                classifier.classify(&SourceRow::default())
            } else {
                classifier.classify(&row(CellContent::from_text(text)))
            };
            assert!(matches!(kind, RowKind::DiscardedHeader { .. }), "{text}");
        }
    }

    #[test]
    fn data_row_records_depth_and_strips_markers_from_first_cell() {
        let classifier = RowClassifier::new().expect("classifier builds");
        let source = row(CellContent::from_text(">Code Value"));

        let RowKind::Data(data) = classifier.classify(&source) else {
            panic!("expected data row");
        };

        assert_eq!(data.depth, 1);
        assert_eq!(data.cells[0].content.text, "Code Value");
        assert_eq!(source.cells[0].content.text, ">Code Value");
    }
}
