//! The assembled wide table and its CSV form.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use almanac_core::{AlmanacError, DateAxis, parse_date};
use chrono::NaiveDate;

const DATE_HEADER: &str = "Date";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar-indexed table: one row per axis date, every cell populated.
///
/// Rows are ascending by date; columns keep the order in which they were
/// added. Serialization is deterministic: dates as `YYYY-MM-DD` and numbers
/// in Rust's shortest round-trip `f64` form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WideTable {
    dates: Vec<NaiveDate>,
    columns: Vec<(String, Vec<f64>)>,
}

impl WideTable {
    /// An empty table over `axis`.
    #[must_use]
    pub fn new(axis: DateAxis) -> Self {
        Self {
            dates: axis.dates().to_vec(),
            columns: Vec::new(),
        }
    }

    /// Append a column.
    ///
    /// # Errors
    /// - `DuplicateColumn` if a column with this name already exists.
    /// - `Data` if `values` does not have one entry per row.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), AlmanacError> {
        let name = name.into();
        if self.columns.iter().any(|(n, _)| *n == name) {
            return Err(AlmanacError::DuplicateColumn { column: name });
        }
        if values.len() != self.dates.len() {
            return Err(AlmanacError::Data(format!(
                "column {name} has {} values, table has {} rows",
                values.len(),
                self.dates.len()
            )));
        }
        self.columns.push((name, values));
        Ok(())
    }

    /// Row dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.dates.len()
    }

    /// True if the table has no row.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Column names in table order, excluding the date column.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Values of one column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Keep only the listed columns, in keep-list order.
    ///
    /// Returns the projected table and the requested names that were absent.
    #[must_use]
    pub fn select_columns(&self, keep: &[&str]) -> (Self, Vec<String>) {
        let mut out = Self {
            dates: self.dates.clone(),
            columns: Vec::with_capacity(keep.len()),
        };
        let mut missing = Vec::new();
        for name in keep {
            match self.columns.iter().find(|(n, _)| n == name) {
                Some(col) if !out.columns.iter().any(|(n, _)| n == name) => {
                    out.columns.push(col.clone());
                }
                Some(_) => {}
                None => missing.push((*name).to_string()),
            }
        }
        (out, missing)
    }

    /// Remove a `<prefix> ` namespace from column names (`AVG Close` -> `Close`).
    ///
    /// A renamed column that collides with an existing name is dropped and
    /// reported as `DuplicateColumn`; the earlier column wins.
    #[must_use]
    pub fn strip_prefix(self, prefix: &str) -> (Self, Vec<AlmanacError>) {
        let lead = format!("{prefix} ");
        let mut seen: HashSet<String> = HashSet::new();
        let mut columns = Vec::with_capacity(self.columns.len());
        let mut dropped = Vec::new();
        for (name, values) in self.columns {
            let name = name
                .strip_prefix(lead.as_str())
                .map_or(name.clone(), str::to_string);
            if seen.insert(name.clone()) {
                columns.push((name, values));
            } else {
                dropped.push(AlmanacError::DuplicateColumn { column: name });
            }
        }
        (
            Self {
                dates: self.dates,
                columns,
            },
            dropped,
        )
    }

    /// Serialize as CSV with header `Date,<columns...>`.
    ///
    /// # Errors
    /// Returns `Data` if the CSV writer fails.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, AlmanacError> {
        let mut w = csv::Writer::from_writer(Vec::new());
        let csv_err = |e: csv::Error| AlmanacError::Data(format!("csv write failed: {e}"));

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(DATE_HEADER.to_string());
        header.extend(self.columns.iter().map(|(n, _)| n.clone()));
        w.write_record(&header).map_err(csv_err)?;

        let mut row: Vec<String> = Vec::with_capacity(header.len());
        for (i, date) in self.dates.iter().enumerate() {
            row.clear();
            row.push(date.format(DATE_FORMAT).to_string());
            row.extend(self.columns.iter().map(|(_, v)| v[i].to_string()));
            w.write_record(&row).map_err(csv_err)?;
        }

        w.into_inner()
            .map_err(|e| AlmanacError::Data(format!("csv flush failed: {}", e.error())))
    }

    /// Read a table previously written by [`to_csv_bytes`](Self::to_csv_bytes).
    ///
    /// # Errors
    /// - `InvalidArg` if the first column is not `Date`.
    /// - `Parse` for an unreadable date or number, with its line.
    /// - `Data` if dates are not strictly ascending.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AlmanacError> {
        let mut rdr = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(|e| AlmanacError::InvalidArg(format!("unreadable header: {e}")))?
            .clone();
        if !headers
            .get(0)
            .is_some_and(|h| h.eq_ignore_ascii_case(DATE_HEADER))
        {
            return Err(AlmanacError::InvalidArg(
                "first column of a wide table must be 'Date'".into(),
            ));
        }

        let mut table = Self::default();
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len() - 1];
        for record in rdr.records() {
            let record = record.map_err(|e| {
                let line = e.position().map_or(0, |p| usize::try_from(p.line()).unwrap_or(0));
                AlmanacError::parse("wide table", line, e.to_string())
            })?;
            let line = record
                .position()
                .map_or(0, |p| usize::try_from(p.line()).unwrap_or(0));
            let date = parse_date(record.get(0).unwrap_or_default())
                .map_err(|msg| AlmanacError::parse("wide table", line, msg))?;
            if table.dates.last().is_some_and(|last| *last >= date) {
                return Err(AlmanacError::Data(format!(
                    "dates not strictly ascending at line {line}"
                )));
            }
            table.dates.push(date);
            for (col, raw) in values.iter_mut().zip(record.iter().skip(1)) {
                let v = raw.parse::<f64>().map_err(|_| {
                    AlmanacError::parse("wide table", line, format!("not a number: '{raw}'"))
                })?;
                col.push(v);
            }
        }

        for (name, col) in headers.iter().skip(1).zip(values) {
            table.push_column(name, col)?;
        }
        Ok(table)
    }

    /// Read a wide table from a CSV file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be opened; otherwise see [`from_reader`](Self::from_reader).
    pub fn from_path(path: &Path) -> Result<Self, AlmanacError> {
        let file = std::fs::File::open(path).map_err(|e| AlmanacError::io(path, e))?;
        Self::from_reader(file)
    }

    /// Convert into a `polars` `DataFrame` with a string `Date` column.
    ///
    /// # Errors
    /// Propagates any `polars` construction error.
    #[cfg(feature = "dataframe")]
    pub fn to_dataframe(&self) -> polars::prelude::PolarsResult<polars::prelude::DataFrame> {
        use polars::prelude::{Column, DataFrame};

        let mut cols: Vec<Column> = Vec::with_capacity(self.columns.len() + 1);
        let dates: Vec<String> = self
            .dates
            .iter()
            .map(|d| d.format(DATE_FORMAT).to_string())
            .collect();
        cols.push(Column::new(DATE_HEADER.into(), dates));
        for (name, values) in &self.columns {
            cols.push(Column::new(name.as_str().into(), values.as_slice()));
        }
        DataFrame::new(cols)
    }
}
