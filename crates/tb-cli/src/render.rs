//! Table and CSV rendering for command output.

use std::io::Write;

use anyhow::Result;
use unicode_width::UnicodeWidthStr;

/// Gap between table columns.
const COLUMN_GAP: &str = "  ";

/// A left-aligned text table sized to its widest cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    footer: Option<Vec<String>>,
}

impl Table {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
            footer: None,
        }
    }

    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) {
        self.rows.push(row.iter().map(|c| c.as_ref().to_string()).collect());
    }

    /// Sets a final row that is separated from the body by a rule.
    pub fn set_footer<S: AsRef<str>>(&mut self, row: &[S]) {
        self.footer = Some(row.iter().map(|c| c.as_ref().to_string()).collect());
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.width()).collect();
        for row in self.rows.iter().chain(self.footer.iter()) {
            for (i, cell) in row.iter().enumerate() {
                if i >= widths.len() {
                    widths.push(0);
                }
                widths[i] = widths[i].max(cell.width());
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        push_line(&mut out, &self.header, &widths);
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        if let Some(footer) = &self.footer {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            push_line(&mut out, &rule, &widths);
            push_line(&mut out, footer, &widths);
        }

        out
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        let cell = cells.get(i).map_or("", String::as_str);
        line.push_str(cell);
        // Pad by display width so wide characters keep columns aligned.
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Writes `header` and `records` as CSV.
pub fn write_csv<W: Write>(writer: W, header: &[&str], records: &[[String; 4]]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header)?;
    for record in records {
        wtr.write_record(record)?;
    }
    wtr.flush()?;
    Ok(())
}
