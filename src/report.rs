//! CSV output for a [`PluginCatalog`].
//!
//! Two tables are produced: `VST3_List.csv` with one column per manufacturer,
//! and `VST3_2Check.csv` with the `_Unknown` and `_Not recognized` columns for
//! manual review.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, WriterBuilder};
use tracing::debug;

use crate::error::AppError;
use crate::model::{NOT_RECOGNIZED_LABEL, PluginCatalog, UNKNOWN_LABEL};

pub const LIST_FILE_NAME: &str = "VST3_List.csv";
pub const CHECK_FILE_NAME: &str = "VST3_2Check.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub list: PathBuf,
    pub check: PathBuf,
}

impl ReportPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self { list: dir.join(LIST_FILE_NAME), check: dir.join(CHECK_FILE_NAME) }
    }
}

/// Write both tables into `dir`.
///
/// Each table is attempted even if the other one fails; the returned error
/// names every file that could not be written.
pub fn write_reports(catalog: &PluginCatalog, dir: &Path) -> Result<ReportPaths, AppError> {
    let paths = ReportPaths::in_dir(dir);

    let manufacturers: Vec<(&str, &[String])> = catalog.manufacturers().collect();
    let review = [(UNKNOWN_LABEL, catalog.unknown()), (NOT_RECOGNIZED_LABEL, catalog.not_recognized())];

    let mut failures = Vec::new();
    if let Err(err) = write_table(&paths.list, &manufacturers) {
        failures.push(err);
    }
    if let Err(err) = write_table(&paths.check, &review) {
        failures.push(err);
    }

    match failures.len() {
        0 => Ok(paths),
        1 => Err(failures.remove(0)),
        _ => Err(AppError::Reports(failures)),
    }
}

/// Serialize `columns` side by side: the header row holds the column names and
/// shorter columns are padded with empty cells.
pub fn write_table(path: &Path, columns: &[(&str, &[String])]) -> Result<(), AppError> {
    let staging = staging_path(path);
    let result = write_staged(&staging, columns)
        .and_then(|()| fs::rename(&staging, path).map_err(csv::Error::from));

    match result {
        Ok(()) => {
            debug!("Wrote {}", path.display());
            Ok(())
        }
        Err(err) => {
            let _ = fs::remove_file(&staging);
            Err(AppError::report_write(path, err))
        }
    }
}

fn write_staged(staging: &Path, columns: &[(&str, &[String])]) -> Result<(), csv::Error> {
    let file = File::create(staging)?;
    let mut writer = WriterBuilder::new().quote_style(QuoteStyle::Necessary).from_writer(file);

    if !columns.is_empty() {
        writer.write_record(columns.iter().map(|(name, _)| *name))?;

        let rows = columns.iter().map(|(_, names)| names.len()).max().unwrap_or(0);
        for row in 0..rows {
            writer.write_record(
                columns.iter().map(|(_, names)| names.get(row).map(String::as_str).unwrap_or("")),
            )?;
        }
    }

    let mut file = writer.into_inner().map_err(|err| csv::Error::from(err.into_error()))?;
    file.flush()?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
