use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::table::{Cell, CellContent, SourceRow, SourceTable};

struct DocumentSelectors {
    chapter: Selector,
    chapter_anchor: Selector,
    table: Selector,
    anchor_id: Selector,
    title: Selector,
    tbody: Selector,
    link: Selector,
    paragraph: Selector,
    subsection_title: Selector,
}

impl DocumentSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            chapter: compile_selector("div.chapter")?,
            chapter_anchor: compile_selector("h1 a[id]")?,
            table: compile_selector("div.table")?,
            anchor_id: compile_selector("a[id]")?,
            title: compile_selector("p strong")?,
            tbody: compile_selector("tbody")?,
            link: compile_selector("a[href]")?,
            paragraph: compile_selector("p")?,
            subsection_title: compile_selector("h3.title")?,
        })
    }
}

fn compile_selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow!("failed to compile selector {css}: {err:?}"))
}

/// The parsed HTML rendering of the standard. Tables leave this type as owned
/// `SourceTable` values so the reconstruction engine never sees the DOM.
pub struct StandardDocument {
    html: Html,
    selectors: DocumentSelectors,
}

impl StandardDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            html: Html::parse_document(raw),
            selectors: DocumentSelectors::new()?,
        })
    }

    pub fn chapter_ids(&self) -> Vec<String> {
        self.html
            .select(&self.selectors.chapter)
            .filter_map(|chapter| self.chapter_id(chapter))
            .map(str::to_owned)
            .collect()
    }

    pub fn chapter_table_ids(&self, chapter_id: &str) -> Result<Vec<String>> {
        let Some(chapter) = self
            .html
            .select(&self.selectors.chapter)
            .find(|chapter| self.chapter_id(*chapter) == Some(chapter_id))
        else {
            bail!(
                "chapter {chapter_id} not found in document (chapters: {})",
                self.chapter_ids().join(", ")
            );
        };

        Ok(chapter
            .select(&self.selectors.table)
            .filter_map(|table| self.table_id(table))
            .map(str::to_owned)
            .collect())
    }

    pub fn tables(&self) -> Vec<SourceTable> {
        self.html
            .select(&self.selectors.table)
            .filter_map(|table| self.source_table(table))
            .collect()
    }

    fn chapter_id<'a>(&self, chapter: ElementRef<'a>) -> Option<&'a str> {
        chapter
            .select(&self.selectors.chapter_anchor)
            .next()
            .and_then(|anchor| anchor.value().attr("id"))
    }

    fn table_id<'a>(&self, table: ElementRef<'a>) -> Option<&'a str> {
        table
            .select(&self.selectors.anchor_id)
            .next()
            .and_then(|anchor| anchor.value().attr("id"))
    }

    fn source_table(&self, table: ElementRef<'_>) -> Option<SourceTable> {
        let Some(id) = self.table_id(table) else {
            debug!("skipping table without anchor id");
            return None;
        };

        let name = table
            .select(&self.selectors.title)
            .next()
            .map(|title| title.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let rows = table
            .select(&self.selectors.tbody)
            .next()
            .map(|tbody| {
                child_elements(tbody, "tr")
                    .map(|row| self.source_row(row))
                    .collect()
            })
            .unwrap_or_default();

        Some(SourceTable {
            id: id.to_string(),
            name,
            description: self.section_description(table),
            rows,
        })
    }

    fn source_row(&self, row: ElementRef<'_>) -> SourceRow {
        SourceRow {
            cells: child_elements(row, "td")
                .map(|cell| self.source_cell(cell))
                .collect(),
        }
    }

    fn source_cell(&self, cell: ElementRef<'_>) -> Cell {
        let content = CellContent {
            html: cell.inner_html(),
            text: cell.text().collect(),
            links: cell
                .select(&self.selectors.link)
                .filter_map(|anchor| anchor.value().attr("href"))
                .map(str::to_owned)
                .collect(),
        };

        Cell::new(
            span_attribute(cell, "rowspan"),
            span_attribute(cell, "colspan"),
            content,
        )
    }

    /// The table sits in a subsection of its IOD or module section; the
    /// description is the first paragraph of that section's first titled
    /// subsection, e.g. `A.2.1 CR Image IOD Description`.
    fn section_description(&self, table: ElementRef<'_>) -> Option<String> {
        let scope = table.ancestors().filter_map(ElementRef::wrap).nth(1)?;
        if !has_class(scope, "section") {
            return None;
        }

        let heading = scope.select(&self.selectors.subsection_title).next()?;
        let subsection = heading
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|element| has_class(*element, "section"))?;

        subsection
            .select(&self.selectors.paragraph)
            .next()
            .map(|paragraph| paragraph.html())
    }
}

fn child_elements<'a>(parent: ElementRef<'a>, name: &'a str) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

fn span_attribute(cell: ElementRef<'_>, name: &str) -> usize {
    cell.value()
        .attr(name)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(1)
}

fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|candidate| candidate == class)
}
