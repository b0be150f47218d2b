//! Text-table accumulation and rendering.
//!
//! Rows are gathered across all batches of all endpoints and written out
//! exactly once, left-aligned with ` | ` separators and a dash rule under
//! the header. A footer repeating the header is added only when the table
//! would scroll past the terminal.

use std::io::Write;

use arrow::array::RecordBatch;

use crate::error::{ClientError, Result};
use crate::render;

/// Cells longer than this wrap onto continuation lines.
const MAX_COLUMN_WIDTH: usize = 64;

/// Fixed rendering overhead (header, rules, trailing blank line) counted
/// when deciding whether the output scrolls past the terminal.
const RENDER_OVERHEAD: usize = 4;

/// An append-only table of rendered rows.
#[derive(Debug, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Table {
        Table::default()
    }

    /// Render and append every row of a record batch.
    ///
    /// The first batch with columns fixes the header; later batches are
    /// expected to share its schema.
    pub fn push_batch(&mut self, batch: &RecordBatch) -> Result<()> {
        if self.header.is_empty() {
            self.header = batch
                .schema()
                .fields()
                .iter()
                .map(|field| field.name().clone())
                .collect();
        }

        for row in 0..batch.num_rows() {
            let mut cells = Vec::with_capacity(batch.num_columns());
            for column in batch.columns() {
                cells.push(render::render_value(column.as_ref(), row)?);
            }
            self.rows.push(cells);
        }

        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Write the table, deciding the footer from the detected terminal
    /// height.
    pub fn render<W: Write>(&self, w: &mut W) -> Result<()> {
        self.render_at_height(w, term_size::dimensions().map(|(_, height)| height))
    }

    /// Write the table for a terminal of the given height. An unknown height
    /// (piped or redirected output) never shows the footer.
    pub fn render_at_height<W: Write>(
        &self,
        w: &mut W,
        terminal_height: Option<usize>,
    ) -> Result<()> {
        if self.header.is_empty() {
            return Ok(());
        }

        let widths = self.column_widths();
        let rule = widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-");

        write_cells(w, &self.header, &widths)?;
        write_line(w, &rule)?;
        for row in &self.rows {
            write_cells(w, row, &widths)?;
        }
        if self.show_footer(terminal_height) {
            write_line(w, &rule)?;
            write_cells(w, &self.header, &widths)?;
        }

        Ok(())
    }

    fn show_footer(&self, terminal_height: Option<usize>) -> bool {
        match terminal_height {
            Some(height) => self.rows.len() + RENDER_OVERHEAD >= height,
            None => false,
        }
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .header
            .iter()
            .map(|name| name.chars().count())
            .collect();

        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.chars().count().min(MAX_COLUMN_WIDTH));
            }
        }

        widths
    }
}

/// Write one logical row, wrapping oversized cells onto continuation lines.
fn write_cells<W: Write>(w: &mut W, cells: &[String], widths: &[usize]) -> Result<()> {
    let wrapped: Vec<Vec<String>> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| wrap(cell, *width))
        .collect();
    let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

    for line_idx in 0..height {
        let mut line = String::new();
        for (i, chunk) in wrapped.iter().enumerate() {
            if i > 0 {
                line.push_str(" | ");
            }
            let cell = chunk.get(line_idx).map(String::as_str).unwrap_or("");
            line.push_str(&format!("{:<width$}", cell, width = widths[i]));
        }
        write_line(w, line.trim_end())?;
    }

    Ok(())
}

/// Split a cell into chunks of at most `width` characters.
fn wrap(cell: &str, width: usize) -> Vec<String> {
    if width == 0 || cell.chars().count() <= width {
        return vec![cell.to_string()];
    }

    let chars: Vec<char> = cell.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn write_line<W: Write>(w: &mut W, line: &str) -> Result<()> {
    writeln!(w, "{line}").map_err(|e| ClientError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Int32Array, StringArray};
    use arrow_schema::{DataType, Field, Schema};
    use pretty_assertions::assert_eq;

    use super::*;

    fn batch(names: &[&str], values: &[i32]) -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8, true),
            Field::new("value", DataType::Int32, true),
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(names.to_vec())),
                Arc::new(Int32Array::from(values.to_vec())),
            ],
        )
        .unwrap()
    }

    fn rendered(table: &Table, height: Option<usize>) -> String {
        let mut out = Vec::new();
        table.render_at_height(&mut out, height).unwrap();

        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        assert_eq!(rendered(&Table::new(), Some(10)), "");
    }

    #[test]
    fn test_header_and_rows_in_stream_order() {
        let mut table = Table::new();
        table.push_batch(&batch(&["a"], &[1])).unwrap();
        table.push_batch(&batch(&["b"], &[2])).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(
            rendered(&table, None),
            "name | value\n\
             -----+------\n\
             a    | 1\n\
             b    | 2\n"
        );
    }

    #[test]
    fn test_null_cells_use_marker() {
        let schema = Schema::new(vec![Field::new("name", DataType::Utf8, true)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(StringArray::from(vec![None::<&str>]))],
        )
        .unwrap();

        let mut table = Table::new();
        table.push_batch(&batch).unwrap();

        assert_eq!(rendered(&table, None), "name\n----\nNULL\n");
    }

    #[test]
    fn test_footer_shown_at_height_boundary() {
        let mut table = Table::new();
        table
            .push_batch(&batch(&["a", "b", "c", "d", "e", "f"], &[1, 2, 3, 4, 5, 6]))
            .unwrap();

        // 6 rows + 4 lines of overhead meet a 10-line terminal exactly
        let text = rendered(&table, Some(10));
        assert!(text.ends_with("-----+------\nname | value\n"));
        assert_eq!(text.lines().count(), 10);
    }

    #[test]
    fn test_footer_absent_below_height_boundary() {
        let mut table = Table::new();
        table
            .push_batch(&batch(&["a", "b", "c", "d", "e", "f"], &[1, 2, 3, 4, 5, 6]))
            .unwrap();

        let text = rendered(&table, Some(11));
        assert!(text.ends_with("f    | 6\n"));
        assert_eq!(text.lines().count(), 8);
    }

    #[test]
    fn test_footer_absent_when_height_unknown() {
        let mut table = Table::new();
        table
            .push_batch(&batch(&["a", "b", "c", "d", "e", "f"], &[1, 2, 3, 4, 5, 6]))
            .unwrap();

        assert!(rendered(&table, None).ends_with("f    | 6\n"));
    }

    #[test]
    fn test_long_cells_wrap() {
        let long = "x".repeat(70);
        let mut table = Table::new();
        table.push_batch(&batch(&[&long], &[1])).unwrap();

        let text = rendered(&table, None);
        // one logical row over two physical lines
        assert_eq!(table.row_count(), 1);
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains(&format!("{} | 1", "x".repeat(64))));
        assert!(text.contains(&"x".repeat(6)));
        assert!(!text.contains(&"x".repeat(65)));
    }

    #[test]
    fn test_unsupported_column_aborts() {
        use arrow::array::LargeStringArray;

        let schema = Schema::new(vec![Field::new("name", DataType::LargeUtf8, true)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(LargeStringArray::from(vec!["x"]))],
        )
        .unwrap();

        let mut table = Table::new();
        assert!(table.push_batch(&batch).is_err());
    }
}
