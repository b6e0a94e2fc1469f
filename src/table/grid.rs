use super::error::SpanOverflow;
use super::{Cell, CellContent};

/// Dense table: every row has the same length. `None` marks a position the
/// source never populated.
pub type Grid = Vec<Vec<Option<CellContent>>>;

/// Unpacks row and column spans so that a cell declared at `(i, j)` with
/// `row_span = r, col_span = c` appears at every position of `(i..i+r, j..j+c)`.
///
/// Rows are padded with `None` to `max(width, longest row)` first. Shifting
/// content to make room for a span may only drop padding; dropping a real cell
/// is a `SpanOverflow`.
pub fn expand_spans(rows: &[Vec<Option<Cell>>], width: usize) -> Result<Grid, SpanOverflow> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(width);
    let mut slots = rows
        .iter()
        .map(|row| {
            let mut padded = row.clone();
            padded.resize(width, None);
            padded
        })
        .collect::<Vec<Vec<Option<Cell>>>>();

    for row in 0..slots.len() {
        for column in 0..width {
            let Some((row_span, col_span)) = slots[row][column]
                .as_ref()
                .map(|cell| (cell.row_span, cell.col_span))
            else {
                continue;
            };

            // Row spans first so the copies carry the column span down with them.
            if row_span > 1 {
                expand_row_span(&mut slots, row, column)?;
            }
            if col_span > 1 {
                expand_col_span(&mut slots, row, column)?;
            }
        }
    }

    Ok(slots
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|slot| slot.map(|cell| cell.content))
                .collect()
        })
        .collect())
}

fn expand_row_span(
    slots: &mut [Vec<Option<Cell>>],
    row: usize,
    column: usize,
) -> Result<(), SpanOverflow> {
    let Some(cell) = slots[row][column].as_mut() else {
        return Ok(());
    };
    let row_span = cell.row_span;
    cell.row_span = 1;
    let copy = cell.clone();

    let available = slots.len() - row;
    if row_span > available {
        return Err(SpanOverflow::PastLastRow {
            row,
            column,
            row_span,
            available,
        });
    }

    for target_row in row + 1..row + row_span {
        let target = &mut slots[target_row];
        if !shift_right(target, column, 1) {
            return Err(SpanOverflow::PastRowEnd {
                row,
                column,
                target_row,
            });
        }
        target[column] = Some(copy.clone());
    }

    Ok(())
}

fn expand_col_span(
    slots: &mut [Vec<Option<Cell>>],
    row: usize,
    column: usize,
) -> Result<(), SpanOverflow> {
    let target = &mut slots[row];
    let Some(cell) = target[column].as_mut() else {
        return Ok(());
    };
    let extra_columns = cell.col_span - 1;
    cell.col_span = 1;
    let copy = cell.clone();

    if !shift_right(target, column + 1, extra_columns) {
        return Err(SpanOverflow::PastRowEnd {
            row,
            column,
            target_row: row,
        });
    }
    for slot in &mut target[column + 1..=column + extra_columns] {
        *slot = Some(copy.clone());
    }

    Ok(())
}

/// Moves entries at `at..` right by `count`, keeping the row length. Returns
/// false, leaving the row untouched, when a populated entry would fall off.
fn shift_right(row: &mut Vec<Option<Cell>>, at: usize, count: usize) -> bool {
    let len = row.len();
    if at + count > len {
        return false;
    }
    if row[len - count..].iter().any(Option::is_some) {
        return false;
    }

    row.truncate(len - count);
    row.splice(at..at, std::iter::repeat_n(None, count));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row_span: usize, col_span: usize, text: &str) -> Option<Cell> {
        Some(Cell::new(row_span, col_span, CellContent::from_text(text)))
    }

    fn texts(grid: &Grid) -> Vec<Vec<Option<&str>>> {
        grid.iter()
            .map(|row| {
                row.iter()
                    .map(|slot| slot.as_ref().map(|content| content.text.as_str()))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn row_span_duplicates_cell_into_following_row() {
        let rows = vec![vec![cell(2, 1, "A"), cell(1, 1, "B")], vec![cell(1, 1, "C")]];

        let grid = expand_spans(&rows, 0).expect("span fits");

        assert_eq!(
            texts(&grid),
            vec![vec![Some("A"), Some("B")], vec![Some("A"), Some("C")]]
        );
    }

    #[test]
    fn col_span_duplicates_cell_across_columns() {
        let rows = vec![
            vec![cell(1, 3, "Header")],
            vec![cell(1, 1, "a"), cell(1, 1, "b"), cell(1, 1, "c")],
        ];

        let grid = expand_spans(&rows, 0).expect("span fits");

        assert_eq!(texts(&grid)[0], vec![Some("Header"); 3]);
        assert_eq!(texts(&grid)[1], vec![Some("a"), Some("b"), Some("c")]);
    }

    #[test]
    fn combined_span_fills_whole_rectangle() {
        let rows = vec![
            vec![cell(2, 2, "X"), cell(1, 1, "r0")],
            vec![cell(1, 1, "r1")],
            vec![cell(1, 1, "p"), cell(1, 1, "q"), cell(1, 1, "s")],
        ];

        let grid = expand_spans(&rows, 0).expect("span fits");

        assert_eq!(
            texts(&grid),
            vec![
                vec![Some("X"), Some("X"), Some("r0")],
                vec![Some("X"), Some("X"), Some("r1")],
                vec![Some("p"), Some("q"), Some("s")],
            ]
        );
    }

    #[test]
    fn rows_are_padded_to_requested_width() {
        let rows = vec![vec![cell(1, 1, "name"), cell(1, 1, "tag")]];

        let grid = expand_spans(&rows, 4).expect("no spans");

        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].len(), 4);
        assert!(grid[0][2].is_none());
        assert!(grid[0][3].is_none());
    }

    #[test]
    fn every_row_has_equal_length_after_expansion() {
        let rows = vec![
            vec![cell(3, 1, "IE"), cell(1, 1, "m1"), cell(1, 1, "ref1"), cell(1, 1, "M")],
            vec![cell(1, 1, "m2"), cell(1, 2, "ref2")],
            vec![cell(1, 1, "m3"), cell(1, 1, "ref3")],
        ];

        let grid = expand_spans(&rows, 4).expect("spans fit");

        assert!(grid.iter().all(|row| row.len() == 4));
        assert_eq!(texts(&grid)[1], vec![Some("IE"), Some("m2"), Some("ref2"), Some("ref2")]);
        assert_eq!(texts(&grid)[2], vec![Some("IE"), Some("m3"), Some("ref3"), None]);
    }

    #[test]
    fn row_span_past_last_row_is_malformed() {
        let rows = vec![vec![cell(3, 1, "A")], vec![cell(1, 1, "B")]];

        let err = expand_spans(&rows, 2).expect_err("span exceeds table");

        assert_eq!(
            err,
            SpanOverflow::PastLastRow {
                row: 0,
                column: 0,
                row_span: 3,
                available: 2,
            }
        );
    }

    #[test]
    fn row_span_that_pushes_content_off_a_full_row_is_malformed() {
        let rows = vec![
            vec![cell(2, 1, "A"), cell(1, 1, "B")],
            vec![cell(1, 1, "C"), cell(1, 1, "D")],
        ];

        let err = expand_spans(&rows, 2).expect_err("row already full");

        assert_eq!(
            err,
            SpanOverflow::PastRowEnd {
                row: 0,
                column: 0,
                target_row: 1,
            }
        );
    }

    #[test]
    fn col_span_wider_than_row_is_malformed() {
        let rows = vec![vec![cell(1, 1, "a"), cell(1, 3, "b")]];

        let err = expand_spans(&rows, 3).expect_err("span exceeds width");

        assert!(matches!(err, SpanOverflow::PastRowEnd { column: 1, .. }));
    }

    #[test]
    fn source_rows_are_not_mutated() {
        let rows = vec![vec![cell(2, 1, "A")], vec![]];
        let before = rows.clone();

        let _ = expand_spans(&rows, 1).expect("span fits");

        assert_eq!(rows, before);
    }
}
