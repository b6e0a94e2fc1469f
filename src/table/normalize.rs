use super::CellContent;
use super::resolve::ResolvedRow;
use crate::markup::clean_description_html;
use crate::util::condense_whitespace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    /// Text up to the word `Module`, e.g. `Patient Module` becomes `Patient`.
    ModuleName,
    Href,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub title: &'static str,
    pub kind: ColumnKind,
}

/// Attribute tables sometimes omit the type column entirely; the description
/// then sits in the type position and the description position is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCorrection {
    pub type_column: usize,
    pub description_column: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct TableProfile {
    pub chapter_id: &'static str,
    pub name_pattern: &'static str,
    pub columns: &'static [ColumnSpec],
    pub correction: Option<ColumnCorrection>,
}

impl TableProfile {
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

pub const CIOD_PROFILE: TableProfile = TableProfile {
    chapter_id: "chapter_A",
    name_pattern: r".*IOD Modules$",
    columns: &[
        ColumnSpec {
            title: "informationEntity",
            kind: ColumnKind::Text,
        },
        ColumnSpec {
            title: "module",
            kind: ColumnKind::ModuleName,
        },
        ColumnSpec {
            title: "reference",
            kind: ColumnKind::Href,
        },
        ColumnSpec {
            title: "usage",
            kind: ColumnKind::Text,
        },
    ],
    correction: None,
};

pub const MODULE_PROFILE: TableProfile = TableProfile {
    chapter_id: "chapter_C",
    name_pattern: r".*Module Attributes$",
    columns: &[
        ColumnSpec {
            title: "name",
            kind: ColumnKind::Text,
        },
        ColumnSpec {
            title: "tag",
            kind: ColumnKind::Text,
        },
        ColumnSpec {
            title: "type",
            kind: ColumnKind::Text,
        },
        ColumnSpec {
            title: "description",
            kind: ColumnKind::Html,
        },
    ],
    correction: Some(ColumnCorrection {
        type_column: 2,
        description_column: 3,
    }),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub values: Vec<Option<String>>,
    pub depth: usize,
    pub macro_table_id: Option<String>,
}

impl NormalizedRow {
    pub fn value(&self, column: usize) -> Option<&str> {
        self.values.get(column).and_then(|value| value.as_deref())
    }
}

pub fn normalize_rows(
    rows: &[ResolvedRow],
    profile: &TableProfile,
    base_url: &str,
) -> Vec<NormalizedRow> {
    rows.iter()
        .map(|row| {
            let cells = match profile.correction {
                Some(correction) => correct_missing_type_column(&row.cells, correction),
                None => row.cells.clone(),
            };
            let values = profile
                .columns
                .iter()
                .enumerate()
                .map(|(index, column)| {
                    cells
                        .get(index)
                        .and_then(Option::as_ref)
                        .and_then(|content| column_value(content, column.kind, base_url))
                })
                .collect();

            NormalizedRow {
                values,
                depth: row.depth,
                macro_table_id: row.macro_table_id.clone(),
            }
        })
        .collect()
}

fn correct_missing_type_column(
    cells: &[Option<CellContent>],
    correction: ColumnCorrection,
) -> Vec<Option<CellContent>> {
    let mut corrected = cells.to_vec();
    let description_missing = corrected
        .get(correction.description_column)
        .map(Option::is_none)
        .unwrap_or(false);
    if description_missing && correction.type_column < corrected.len() {
        corrected.swap(correction.type_column, correction.description_column);
    }

    corrected
}

fn column_value(content: &CellContent, kind: ColumnKind, base_url: &str) -> Option<String> {
    match kind {
        ColumnKind::Text => Some(condense_whitespace(&content.text)),
        ColumnKind::ModuleName => {
            let text = condense_whitespace(&content.text);
            let name = text.split("Module").next().unwrap_or_default().trim();
            Some(name.to_string())
        }
        ColumnKind::Href => content.links.first().cloned(),
        ColumnKind::Html => Some(clean_description_html(&content.html, base_url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(cells: Vec<Option<CellContent>>) -> ResolvedRow {
        ResolvedRow {
            cells,
            depth: 0,
            macro_table_id: None,
        }
    }

    fn linked(text: &str, links: &[&str]) -> CellContent {
        CellContent {
            html: String::new(),
            text: text.to_string(),
            links: links.iter().map(|link| link.to_string()).collect(),
        }
    }

    fn paragraph(text: &str) -> CellContent {
        CellContent {
            html: format!("<p>{text}</p>"),
            text: text.to_string(),
            links: Vec::new(),
        }
    }

    #[test]
    fn ciod_columns_extract_text_module_name_and_reference() {
        let row = resolved(vec![
            Some(CellContent::from_text("\n  Patient\n")),
            Some(CellContent::from_text("Patient Module")),
            Some(linked("C.7.1.1", &["#sect_C.7.1.1"])),
            Some(CellContent::from_text("M")),
        ]);

        let rows = normalize_rows(&[row], &CIOD_PROFILE, "http://example.org/");

        assert_eq!(
            rows[0].values,
            vec![
                Some("Patient".to_string()),
                Some("Patient".to_string()),
                Some("#sect_C.7.1.1".to_string()),
                Some("M".to_string()),
            ]
        );
    }

    #[test]
    fn missing_type_column_moves_description_into_place() {
        let row = resolved(vec![
            Some(CellContent::from_text("Patient's Name")),
            Some(CellContent::from_text("(0010,0010)")),
            Some(paragraph("Patient's full name.")),
            None,
        ]);

        let rows = normalize_rows(&[row], &MODULE_PROFILE, "http://example.org/");

        assert_eq!(rows[0].value(0), Some("Patient's Name"));
        assert_eq!(rows[0].value(2), None);
        assert_eq!(rows[0].value(3), Some("<p>Patient's full name.</p>"));
    }

    #[test]
    fn complete_attribute_row_keeps_type_column() {
        let row = resolved(vec![
            Some(CellContent::from_text("Patient ID")),
            Some(CellContent::from_text("(0010,0020)")),
            Some(CellContent::from_text("2")),
            Some(paragraph("Primary identifier.")),
        ]);

        let rows = normalize_rows(&[row], &MODULE_PROFILE, "http://example.org/");

        assert_eq!(rows[0].value(2), Some("2"));
        assert_eq!(rows[0].value(3), Some("<p>Primary identifier.</p>"));
    }

    #[test]
    fn profiles_declare_four_columns() {
        assert_eq!(CIOD_PROFILE.width(), 4);
        assert_eq!(MODULE_PROFILE.width(), 4);
        assert_eq!(CIOD_PROFILE.columns[3].title, "usage");
        assert_eq!(MODULE_PROFILE.columns[1].title, "tag");
    }
}
