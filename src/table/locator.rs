use std::collections::HashMap;

use super::SourceTable;

/// Every table of a document, addressable by its declared identifier.
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    tables: Vec<SourceTable>,
    index: HashMap<String, usize>,
}

impl TableCatalog {
    pub fn new(tables: Vec<SourceTable>) -> Self {
        let mut index = HashMap::with_capacity(tables.len());
        for (position, table) in tables.iter().enumerate() {
            // first declaration wins, matching a document-order scan
            index.entry(table.id.clone()).or_insert(position);
        }

        Self { tables, index }
    }

    /// Exact, case-sensitive lookup. Absence is not an error.
    pub fn find(&self, id: &str) -> Option<&SourceTable> {
        self.index.get(id).map(|position| &self.tables[*position])
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(id: &str, name: &str) -> SourceTable {
        SourceTable {
            id: id.to_string(),
            name: name.to_string(),
            ..SourceTable::default()
        }
    }

    #[test]
    fn find_matches_identifier_exactly() {
        let catalog = TableCatalog::new(vec![table("tbl1", "First"), table("tbl2", "Second")]);

        assert_eq!(catalog.find("tbl2").map(|t| t.name.as_str()), Some("Second"));
        assert!(catalog.find("TBL2").is_none());
        assert!(catalog.find("tbl").is_none());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn duplicate_identifiers_resolve_to_first_table() {
        let catalog = TableCatalog::new(vec![table("dup", "Earlier"), table("dup", "Later")]);

        assert_eq!(catalog.find("dup").map(|t| t.name.as_str()), Some("Earlier"));
    }

    #[test]
    fn empty_catalog_finds_nothing() {
        let catalog = TableCatalog::default();

        assert!(catalog.is_empty());
        assert!(catalog.find("table_A.2-1").is_none());
    }
}
