use std::fs;
use std::io::Read;
use std::path::Path;

use crate::model::{FieldValue, TaskRecord};

use super::data_store::DataError;

/// Header written when a missing task file is initialized
pub const DEFAULT_HEADER: &str = "id,status,description,tags\n";

/// What reading a flat task file found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvLoad {
    Loaded(Vec<TaskRecord>),
    /// The file did not exist and was created with only a header
    InitializedEmpty,
}

/// Read tasks from a CSV file with a header row, creating the file if missing.
///
/// Columns named in `list_fields` are split on whitespace; empty cells are absent.
pub fn load_csv(path: &Path, list_fields: &[String]) -> Result<CsvLoad, DataError> {
    if !path.exists() {
        fs::write(path, DEFAULT_HEADER).map_err(|e| DataError::CannotInitialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        return Ok(CsvLoad::InitializedEmpty);
    }
    let file = fs::File::open(path).map_err(|e| DataError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let tasks = read_tasks(file, list_fields).map_err(|e| DataError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(CsvLoad::Loaded(tasks))
}

pub fn read_tasks<R: Read>(reader: R, list_fields: &[String]) -> Result<Vec<TaskRecord>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut tasks = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let task: TaskRecord = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(name, cell)| {
                let value = if list_fields.iter().any(|f| f == name) {
                    FieldValue::List(cell.split_whitespace().map(str::to_string).collect())
                } else {
                    FieldValue::Scalar(cell.to_string())
                };
                (name.to_string(), value)
            })
            .collect();
        tasks.push(task);
    }
    Ok(tasks)
}
