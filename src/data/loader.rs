use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use serde::de::DeserializeOwned;

use super::error::DataError;
use super::model::{FrontRecord, FrontTable, GanttRecord};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load `all_checkpoint_fronts.csv`.
///
/// Columns `Crossover_P` and `Mutation_P` may be absent; every other column
/// of [`FrontRecord`] is required.
pub fn load_fronts(path: &Path) -> Result<FrontTable, DataError> {
    let records = read_records::<FrontRecord>(path, &FrontRecord::REQUIRED_COLUMNS)?;
    Ok(FrontTable::from_records(records))
}

/// Load one schedule file (`seed_<n>_solution_1.txt`).
///
/// A header without rows is valid and yields an empty schedule.
pub fn load_gantt(path: &Path) -> Result<Vec<GanttRecord>, DataError> {
    let records = read_records::<GanttRecord>(path, &GanttRecord::REQUIRED_COLUMNS)?;

    for (i, op) in records.iter().enumerate() {
        if op.end < op.start {
            return Err(DataError::InvalidInterval {
                path: path.to_path_buf(),
                row: i + 1,
                start: op.start,
                end: op.end,
            });
        }
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// CSV plumbing
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<File, DataError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataError::NotFound(path.to_path_buf()),
        _ => DataError::Io(e),
    })?;

    if file.metadata()?.len() == 0 {
        return Err(DataError::Empty(path.to_path_buf()));
    }
    Ok(file)
}

/// Read every row of `path` as `T` after checking the header carries `required`.
fn read_records<T: DeserializeOwned>(
    path: &Path,
    required: &[&'static str],
) -> Result<Vec<T>, DataError> {
    let file = open(path)?;
    read_records_from(file, path, required)
}

fn read_records_from<T: DeserializeOwned, R: Read>(
    source: R,
    path: &Path,
    required: &[&'static str],
) -> Result<Vec<T>, DataError> {
    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers().map_err(csv_err)?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(DataError::Empty(path.to_path_buf()));
    }

    if let Some(&column) = required
        .iter()
        .find(|&&column| !headers.iter().any(|h| h == column))
    {
        return Err(DataError::MissingColumn {
            path: path.to_path_buf(),
            column,
        });
    }

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|source| DataError::Row {
                path: path.to_path_buf(),
                row: i + 1,
                source,
            })
        })
        .collect()
}
