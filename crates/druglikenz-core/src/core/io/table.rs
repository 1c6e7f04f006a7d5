use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to open input table '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed input table: {0}")]
    Csv(#[from] csv::Error),
    #[error("Column '{column}' not found. Available columns: {}", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
    #[error("Input table contains no rows")]
    Empty,
}

/// One row of the input table: the deduplication key and the structure string.
///
/// When no separate key column is configured the key is the structure string itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    pub key: String,
    pub structure: String,
}

impl InputRow {
    pub fn new(key: impl Into<String>, structure: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            structure: structure.into(),
        }
    }

    /// A row keyed by its own structure string.
    pub fn from_structure(structure: impl Into<String>) -> Self {
        let structure = structure.into();
        Self {
            key: structure.clone(),
            structure,
        }
    }
}

/// Field delimiter inferred from the file extension: `.csv` is comma separated,
/// anything else is read as tab separated.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    }
}

/// Reads the structure (and optional key) column of a delimited file.
///
/// The column check happens before any row is read, so a misconfigured column name
/// fails fast. Short records are tolerated; a missing cell reads as an empty string.
pub fn read_table<P: AsRef<Path>>(
    path: P,
    structure_column: &str,
    key_column: Option<&str>,
) -> Result<Vec<InputRow>, TableError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table_from_reader(file, delimiter_for(path), structure_column, key_column)
}

/// Same as [`read_table`] over any reader with an explicit delimiter.
pub fn read_table_from_reader<R: Read>(
    reader: R,
    delimiter: u8,
    structure_column: &str,
    key_column: Option<&str>,
) -> Result<Vec<InputRow>, TableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| TableError::MissingColumn {
                column: name.to_string(),
                available: headers.iter().map(str::to_string).collect(),
            })
    };
    let structure_idx = column_index(structure_column)?;
    let key_idx = key_column.map(column_index).transpose()?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let structure = record.get(structure_idx).unwrap_or("").to_string();
        let row = match key_idx {
            Some(idx) => InputRow::new(record.get(idx).unwrap_or(""), structure),
            None => InputRow::from_structure(structure),
        };
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(TableError::Empty);
    }
    Ok(rows)
}
