use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::Ranked;

/// A delimited-text table: one header row plus at least one data row, every
/// row holding the same number of cells. Cells are kept as raw strings so the
/// identifier column and the original criteria values pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Parse strict comma-separated text. Blank lines are skipped; a data row
    /// whose cell count differs from the header is rejected.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let header = match lines.next() {
            Some(line) => split_row(line),
            None => return Err(Error::Shape),
        };
        let rows: Vec<Vec<String>> = lines.map(split_row).collect();
        if rows.is_empty() {
            return Err(Error::Shape);
        }
        for (index, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(Error::format(format!(
                    "data row {} has {} cells, expected {} as in the header",
                    index + 1,
                    row.len(),
                    header.len(),
                )));
            }
        }
        Ok(Self { header, rows })
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::FileAccess {
            path: path.display().to_string(),
            reason: source.to_string(),
        })?;
        Self::parse(&text)
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',').map(|cell| cell.trim().to_string()).collect()
}

/// The original table with `Topsis Score` and `Rank` columns appended, rows
/// in the original input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub(crate) fn new(table: &RawTable, ranked: &[Ranked]) -> Self {
        let mut header = table.header.clone();
        header.push("Topsis Score".to_string());
        header.push("Rank".to_string());
        let rows = table
            .rows
            .iter()
            .zip(ranked)
            .map(|(row, entry)| {
                let mut row = row.clone();
                row.push(entry.score.to_string());
                row.push(entry.rank.to_string());
                row
            })
            .collect();
        Self { header, rows }
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.header.join(","));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }

    pub fn write(&self, path: &Path) -> Result<(), Error> {
        fs::write(path, self.to_csv()).map_err(|source| Error::FileAccess {
            path: path.display().to_string(),
            reason: source.to_string(),
        })
    }
}
