use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

/// Column for plugin bundles found directly in the scanned folder.
pub const UNKNOWN_LABEL: &str = "_Unknown";
/// Column for every retained file that is not a plugin bundle.
pub const NOT_RECOGNIZED_LABEL: &str = "_Not recognized";

/// Marker returned by relative-path arithmetic when an entry sits directly in
/// the scanned folder.
pub const CURRENT_DIR_MARKER: &str = ".";

pub fn is_reserved(key: &str) -> bool {
    key == UNKNOWN_LABEL || key == NOT_RECOGNIZED_LABEL
}

/// Result of classifying one retained path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Plugin base name, empty when the entry is not a plugin bundle.
    pub vst_name: String,
    /// Base name prefixed with its folder relative to the scan root.
    pub generic_name: String,
    pub manufacturer: String,
}

impl Classification {
    pub fn is_recognized(&self) -> bool {
        !self.vst_name.is_empty()
    }

    pub fn display_name(&self) -> &str {
        if self.is_recognized() { &self.vst_name } else { &self.generic_name }
    }
}

#[derive(Debug, Clone)]
pub struct WalkWarning {
    pub path: Option<PathBuf>,
    pub message: String,
}

/// Entries collected by a single walk of the scan root.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Plugin bundles and loose files, in traversal order.
    pub retained: Vec<PathBuf>,
    pub subdirectories: Vec<PathBuf>,
    pub warnings: Vec<WalkWarning>,
}

impl WalkOutcome {
    /// Record an entry the walk had to leave out.
    pub fn warn(&mut self, path: Option<&Path>, message: String) {
        warn!("Skipping {:?}: {}", path, message);
        self.warnings.push(WalkWarning { path: path.map(Path::to_path_buf), message });
    }
}

/// Plugin names grouped by manufacturer, in first-seen order.
///
/// The reserved `_Unknown` and `_Not recognized` columns exist from
/// construction on, even when nothing is ever filed under them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PluginCatalog {
    columns: IndexMap<String, Vec<String>>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        let mut columns = IndexMap::new();
        columns.insert(UNKNOWN_LABEL.to_string(), Vec::new());
        columns.insert(NOT_RECOGNIZED_LABEL.to_string(), Vec::new());
        Self { columns }
    }

    pub fn push(&mut self, manufacturer: &str, name: impl Into<String>) {
        self.columns.entry(manufacturer.to_string()).or_default().push(name.into());
    }

    pub fn add(&mut self, classification: &Classification) {
        self.push(&classification.manufacturer, classification.display_name());
    }

    pub fn get(&self, manufacturer: &str) -> Option<&[String]> {
        self.columns.get(manufacturer).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.columns.iter().map(|(key, names)| (key.as_str(), names.as_slice()))
    }

    /// Manufacturers other than the two reserved columns.
    pub fn manufacturers(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.iter().filter(|(key, _)| !is_reserved(key))
    }

    pub fn unknown(&self) -> &[String] {
        self.get(UNKNOWN_LABEL).unwrap_or_default()
    }

    pub fn not_recognized(&self) -> &[String] {
        self.get(NOT_RECOGNIZED_LABEL).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.values().all(Vec::is_empty)
    }

    pub fn plugin_count(&self) -> usize {
        self.manufacturers().map(|(_, names)| names.len()).sum::<usize>() + self.unknown().len()
    }
}

impl Default for PluginCatalog {
    fn default() -> Self {
        PluginCatalog::new()
    }
}
