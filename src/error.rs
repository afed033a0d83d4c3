use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Application-wide error type for the vst3-list CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Plugin folder does not exist: {}", .0.display())]
    MissingPluginDir(PathBuf),

    #[error("Report folder does not exist: {}", .0.display())]
    MissingReportDir(PathBuf),

    #[error("Plugin folder is not readable: {}: {source}", path.display())]
    PluginDirUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Report folder is not writable: {}: {source}", path.display())]
    ReportDirNotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to write {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write reports: {}", join_messages(.0))]
    Reports(Vec<AppError>),

    #[error("Failed to launch editor: {0}")]
    Editor(String),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Failed to serialize catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid exclude pattern: {0}")]
    Glob(#[from] globset::Error),
}

impl AppError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AppError::Config(msg.into())
    }

    pub fn report_write(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        AppError::ReportWrite { path: path.into(), source: source.into() }
    }
}

fn join_messages(errors: &[AppError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
