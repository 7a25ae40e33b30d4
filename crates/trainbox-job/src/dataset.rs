use crate::error::{JobError, JobResult};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options for reading a delimited dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetOptions {
    pub delimiter: u8,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Tabular dataset: a header plus rows that all have one cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    #[serde(skip)]
    source: PathBuf,
}

/// Borrowed view of one row, keyed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    cells: &'a [String],
}

impl<'a> Record<'a> {
    #[must_use]
    pub fn get(self, column: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.cells[idx].as_str())
    }

    pub fn iter(self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.columns.iter().map(String::as_str).zip(self.cells.iter().map(String::as_str))
    }
}

impl Dataset {
    /// Build a dataset in memory, enforcing the same invariants as the loader.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, String> {
        validate_columns(&columns)?;
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(format!(
                    "row {} has {} fields, expected {}",
                    idx + 1,
                    row.len(),
                    columns.len()
                ));
            }
        }
        if rows.is_empty() {
            return Err("dataset has no rows".to_string());
        }
        Ok(Self { columns, rows, source: PathBuf::new() })
    }

    /// Read a delimited table with a header row. `source` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, options: &DatasetOptions, source: &Path) -> JobResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers = reader.headers().map_err(|e| JobError::data(source, e.to_string()))?;
        if headers.is_empty() {
            return Err(JobError::data(source, "dataset is empty"));
        }
        let columns: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        validate_columns(&columns).map_err(|msg| JobError::data(source, msg))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| JobError::data(source, e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        if rows.is_empty() {
            return Err(JobError::data(source, "dataset has no rows"));
        }

        Ok(Self { columns, rows, source: source.to_path_buf() })
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// `(rows, columns)`
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn record(&self, idx: usize) -> Option<Record<'_>> {
        self.rows.get(idx).map(|cells| Record { columns: &self.columns, cells })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|cells| Record { columns: &self.columns, cells })
    }

    /// Cells of one column in row order.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Parse every cell of `name` as a float.
    pub fn numeric_column(&self, name: &str) -> JobResult<Vec<f64>> {
        let cells = self
            .column(name)
            .ok_or_else(|| JobError::data(&self.source, format!("unknown column `{name}`")))?;
        cells
            .enumerate()
            .map(|(idx, cell)| {
                cell.trim().parse::<f64>().map_err(|_| {
                    JobError::data(
                        &self.source,
                        format!("column `{name}` row {}: `{cell}` is not a number", idx + 1),
                    )
                })
            })
            .collect()
    }
}

fn validate_columns(columns: &[String]) -> Result<(), String> {
    if columns.is_empty() {
        return Err("dataset is empty".to_string());
    }
    let mut seen = HashSet::new();
    for (idx, name) in columns.iter().enumerate() {
        if name.is_empty() {
            return Err(format!("column {} has an empty name", idx + 1));
        }
        if !seen.insert(name.as_str()) {
            return Err(format!("duplicate column `{name}`"));
        }
    }
    Ok(())
}

/// Load the dataset at `path` with default options.
pub fn load_dataset(path: &Path) -> JobResult<Dataset> {
    load_dataset_with(path, &DatasetOptions::default())
}

pub fn load_dataset_with(path: &Path, options: &DatasetOptions) -> JobResult<Dataset> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => JobError::data(path, "file not found"),
        _ => JobError::data(path, format!("failed to open: {e}")),
    })?;

    let dataset = Dataset::from_reader(file, options, path)?;
    let (rows, cols) = dataset.shape();
    debug!(path = %path.display(), rows, cols, "loaded dataset");
    Ok(dataset)
}
