use colored::Colorize;
use spendwise_domain::{Transaction, TransactionKind};

use super::format_amount;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Specifies the configuration for a single column in the rendered table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub max_width: Option<usize>,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn new(header: &str, alignment: Alignment) -> Self {
        Self {
            header: header.to_string(),
            max_width: None,
            alignment,
        }
    }

    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }
}

/// Represents a table with column metadata and rows of data to render.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Computes the content widths for each column based on headers, rows, and
    /// column constraints.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = visible_width(&column.header);
                for row in &self.rows {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(visible_width(cell));
                    }
                }
                if let Some(max_width) = column.max_width {
                    width = width.min(max_width);
                }
                width
            })
            .collect()
    }

    /// Renders a single row using the provided column widths.
    pub fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let rendered_cells: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let cell_text = row.get(idx).map(|s| s.as_str()).unwrap_or("");
                render_cell(cell_text, widths[idx], column.alignment)
            })
            .collect();

        rendered_cells.join("  ").trim_end().to_string()
    }

    /// Renders the header, a rule, and every row.
    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();

        let mut lines = vec![self.render_row(&header, &widths)];
        lines.push(
            widths
                .iter()
                .map(|width| "-".repeat(*width))
                .collect::<Vec<_>>()
                .join("  "),
        );
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}

/// Builds the transaction table: one row per entry, numbered from 1.
pub fn transactions_table(transactions: &[Transaction], currency: &str) -> Table {
    let columns = vec![
        TableColumn::new("#", Alignment::Right),
        TableColumn::new("Date", Alignment::Left),
        TableColumn::new("Title", Alignment::Left).with_max_width(32),
        TableColumn::new("Category", Alignment::Left).with_max_width(20),
        TableColumn::new("Amount", Alignment::Right),
        TableColumn::new("Type", Alignment::Left),
    ];

    let rows = transactions
        .iter()
        .enumerate()
        .map(|(idx, txn)| {
            let amount = format_amount(currency, txn.amount);
            let amount = match txn.kind {
                TransactionKind::Expense => amount.red().to_string(),
                TransactionKind::Income => amount.green().to_string(),
            };
            vec![
                (idx + 1).to_string(),
                txn.date.format("%Y-%m-%d").to_string(),
                txn.title.clone(),
                txn.category.clone(),
                amount,
                txn.kind.to_string(),
            ]
        })
        .collect();

    Table { columns, rows }
}

fn visible_width(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut idx = 0;
    let mut width = 0;

    while idx < bytes.len() {
        if bytes[idx] == 0x1b {
            idx += 1;
            if idx < bytes.len() && bytes[idx] == b'[' {
                idx += 1;
                while idx < bytes.len() {
                    let byte = bytes[idx];
                    idx += 1;
                    if (0x40..=0x7E).contains(&byte) {
                        break;
                    }
                }
                continue;
            }
        }

        if let Some(ch) = text[idx..].chars().next() {
            width += 1;
            idx += ch.len_utf8();
        } else {
            break;
        }
    }

    width
}

/// Shortens plain text to `width` characters, ending with an ellipsis.
fn truncate_text(text: &str, width: usize) -> String {
    if visible_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut result: String = text.chars().take(width - 1).collect();
    result.push('…');
    result
}

/// Renders a single cell with alignment applied.
pub fn render_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let fitted = truncate_text(text, width);
    let remaining = width.saturating_sub(visible_width(&fitted));

    match alignment {
        Alignment::Left => format!("{}{}", fitted, " ".repeat(remaining)),
        Alignment::Right => format!("{}{}", " ".repeat(remaining), fitted),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn visible_width_ignores_ansi_sequences() {
        assert_eq!(visible_width("\u{1b}[31m₹250.00\u{1b}[0m"), 7);
        assert_eq!(visible_width("plain"), 5);
    }

    #[test]
    fn cells_are_padded_and_truncated() {
        assert_eq!(render_cell("ab", 4, Alignment::Left), "ab  ");
        assert_eq!(render_cell("ab", 4, Alignment::Right), "  ab");
        assert_eq!(render_cell("abcdef", 4, Alignment::Left), "abc…");
    }

    #[test]
    fn transaction_table_numbers_rows_from_one() {
        crate::cli::output::set_color_enabled(false);
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let transactions = vec![
            Transaction::new(TransactionKind::Expense, "Lunch", "food", dec!(250), date),
            Transaction::new(TransactionKind::Income, "Salary", "salary", dec!(50000), date),
        ];

        let rendered = transactions_table(&transactions, "₹").render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("#  Date"));
        assert_eq!(
            lines[2],
            "1  2024-03-15  Lunch   food        ₹250.00  Expense"
        );
        assert!(lines[3].ends_with("₹50000.00  Income"));
    }
}
