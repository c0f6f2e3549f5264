use crate::error::Error;
use crate::table::RawTable;

/// A validated criteria matrix: per row an opaque identifier (the first
/// column, never used in computation) and a fixed-width block of finite
/// numeric criteria values.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionMatrix {
    ids: Vec<String>,
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl DecisionMatrix {
    /// Validate a raw table: at least one data row and three columns overall
    /// (identifier + two or more criteria), every criteria cell a finite real.
    pub fn from_table(table: &RawTable) -> Result<Self, Error> {
        if table.header.len() < 3 || table.rows.is_empty() {
            return Err(Error::Shape);
        }
        let columns: Vec<String> = table.header[1..].to_vec();
        let mut ids = Vec::with_capacity(table.rows.len());
        let mut values = Vec::with_capacity(table.rows.len());
        for (index, row) in table.rows.iter().enumerate() {
            if row.len() != table.header.len() {
                return Err(Error::format(format!(
                    "data row {} has {} cells, expected {} as in the header",
                    index + 1,
                    row.len(),
                    table.header.len(),
                )));
            }
            ids.push(row[0].clone());
            let mut parsed = Vec::with_capacity(columns.len());
            for (cell, column) in row[1..].iter().zip(&columns) {
                let value: f64 = cell.parse().map_err(|_| Error::NonNumeric {
                    column: column.clone(),
                    row: index + 1,
                    value: cell.clone(),
                })?;
                if !value.is_finite() {
                    return Err(Error::NonNumeric {
                        column: column.clone(),
                        row: index + 1,
                        value: cell.clone(),
                    });
                }
                parsed.push(value);
            }
            values.push(parsed);
        }
        Ok(Self {
            ids,
            columns,
            values,
        })
    }

    pub fn criteria_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn column_name(&self, column: usize) -> &str {
        &self.columns[column]
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }
}

/// Per-criterion weight multipliers. Weights are applied as-is and need not
/// sum to 1; they only have to be positive finite numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights(Vec<f64>);

impl Weights {
    /// Parse a strictly comma-separated list of positive numeric weights.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let tokens = split_list(s, "weights")?;
        let mut weights = Vec::with_capacity(tokens.len());
        for token in tokens {
            let weight: f64 = token.parse().map_err(|_| Error::Parse {
                token: token.to_string(),
            })?;
            if !weight.is_finite() || weight <= 0.0 {
                return Err(Error::format(format!(
                    "weight {token:?} must be a positive number"
                )));
            }
            weights.push(weight);
        }
        Ok(Self(weights))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Direction in which a criterion contributes to the ideal alternative:
/// `Benefit` (`+`) prefers larger values, `Cost` (`-`) prefers smaller ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Benefit,
    Cost,
}

impl Impact {
    /// Parse a strictly comma-separated list of `+`/`-` tokens.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, Error> {
        split_list(s, "impacts")?
            .into_iter()
            .map(|token| match token {
                "+" => Ok(Impact::Benefit),
                "-" => Ok(Impact::Cost),
                other => Err(Error::format(format!(
                    "impact {other:?} must be either '+' or '-'"
                ))),
            })
            .collect()
    }
}

fn split_list<'s>(s: &'s str, what: &str) -> Result<Vec<&'s str>, Error> {
    if !s.contains(',') {
        return Err(Error::format(format!(
            "{what} must be separated by ',' (comma)"
        )));
    }
    let tokens: Vec<&str> = s.split(',').map(str::trim).collect();
    if tokens.iter().any(|token| token.is_empty()) {
        return Err(Error::format(format!("{what} contain an empty entry")));
    }
    Ok(tokens)
}
