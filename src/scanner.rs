use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::AppError;
use crate::model::{
    Classification, NOT_RECOGNIZED_LABEL, PluginCatalog, UNKNOWN_LABEL, WalkOutcome,
};
use crate::path::{PathInfo, has_extension, is_excluded};

pub struct Scanner {
    plugin_extensions: Vec<String>,
    excluded_extensions: Vec<String>,
    exclude: Option<globset::GlobSet>,
    follow_links: bool,
}

impl Scanner {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let config = config.clone().normalized();
        config.validate()?;
        let exclude = config.compile_excludes()?;
        Ok(Self {
            plugin_extensions: config.plugin_extensions,
            excluded_extensions: config.excluded_extensions,
            exclude,
            follow_links: config.follow_links,
        })
    }

    /// Walk `root`, keeping plugin bundles as atomic entries and every other
    /// file that is not excluded.
    pub fn walk(&self, root: &Path) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();
        let mut bundles: Vec<PathBuf> = Vec::new();

        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter();
        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    outcome.warn(err.path(), err.to_string());
                    continue;
                }
            };

            let path = entry.path();
            if is_excluded(path, self.exclude.as_ref()) {
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }

            // Unfollowed links are typed by their target; walkdir will not
            // descend into them either way.
            let linked = entry.file_type().is_symlink();
            let (is_dir, is_file) = if linked {
                match fs::metadata(path) {
                    Ok(target) => (target.is_dir(), target.is_file()),
                    Err(err) => {
                        outcome.warn(Some(path), format!("broken symbolic link: {err}"));
                        continue;
                    }
                }
            } else {
                (entry.file_type().is_dir(), entry.file_type().is_file())
            };

            if is_dir {
                if has_extension(path, &self.plugin_extensions) {
                    bundles.push(path.to_path_buf());
                    outcome.retained.push(path.to_path_buf());
                    if !linked {
                        walker.skip_current_dir();
                    }
                } else {
                    outcome.subdirectories.push(path.to_path_buf());
                    if linked {
                        outcome.warn(Some(path), "symbolic link to a folder not followed".into());
                    }
                }
            } else if is_file {
                if has_extension(path, &self.excluded_extensions) {
                    continue;
                }
                if bundles.iter().any(|bundle| path.starts_with(bundle)) {
                    continue;
                }
                outcome.retained.push(path.to_path_buf());
            }
        }

        outcome
    }

    pub fn classify(&self, entry: &Path, root: &Path) -> Result<Classification, AppError> {
        let info = PathInfo::new(entry, root)?;

        let manufacturer =
            if info.at_root() { UNKNOWN_LABEL.to_string() } else { info.suffix.clone() };
        let generic_name = if info.at_root() {
            info.base_name.clone()
        } else {
            format!("{}{}{}", info.suffix, std::path::MAIN_SEPARATOR, info.base_name)
        };

        let classification = if self.plugin_extensions.contains(&info.extension) {
            Classification { vst_name: info.base_name, generic_name, manufacturer }
        } else {
            Classification {
                vst_name: String::new(),
                generic_name,
                manufacturer: NOT_RECOGNIZED_LABEL.to_string(),
            }
        };
        debug!(
            "{} -> {} ({})",
            entry.display(),
            classification.manufacturer,
            classification.display_name()
        );
        Ok(classification)
    }

    pub fn aggregate(&self, retained: &[PathBuf], root: &Path) -> Result<PluginCatalog, AppError> {
        let mut catalog = PluginCatalog::new();
        for entry in retained {
            let classification = self.classify(entry, root)?;
            catalog.add(&classification);
        }
        Ok(catalog)
    }

    /// Walk and classify in one go.
    pub fn scan(&self, root: &Path) -> Result<(PluginCatalog, WalkOutcome), AppError> {
        let outcome = self.walk(root);
        let catalog = self.aggregate(&outcome.retained, root)?;
        Ok((catalog, outcome))
    }
}

/// Fail before any traversal when the plugin folder is unusable.
pub fn ensure_plugin_dir(path: &Path) -> Result<(), AppError> {
    if !path.exists() {
        return Err(AppError::MissingPluginDir(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(AppError::NotADirectory(path.to_path_buf()));
    }
    fs::read_dir(path)
        .map_err(|source| AppError::PluginDirUnreadable { path: path.to_path_buf(), source })?;
    Ok(())
}

/// Fail before any traversal when the reports could not be written.
///
/// Writability is checked by creating (and dropping) a scratch file, which
/// also covers ACLs and read-only mounts that permission bits do not show.
pub fn ensure_report_dir(path: &Path) -> Result<(), AppError> {
    if !path.exists() {
        return Err(AppError::MissingReportDir(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(AppError::NotADirectory(path.to_path_buf()));
    }
    tempfile::Builder::new()
        .prefix(".vst3-list-")
        .tempfile_in(path)
        .map_err(|source| AppError::ReportDirNotWritable { path: path.to_path_buf(), source })?;
    Ok(())
}
