use std::ffi::OsStr;
use std::io;
use std::path::{self, Path, PathBuf};

use dirs_next as dirs;

use crate::model::CURRENT_DIR_MARKER;

/// Name, extension and location of an entry relative to the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    pub base_name: String,
    /// Lowercased, with its leading dot (`.vst3`); empty when there is none.
    pub extension: String,
    pub common_prefix: PathBuf,
    /// Parent folder relative to `common_prefix`, or `.` when they are equal.
    pub suffix: String,
}

impl PathInfo {
    pub fn new(entry: &Path, root: &Path) -> io::Result<Self> {
        let entry = path::absolute(entry)?;
        let root = path::absolute(root)?;
        let prefix = common_prefix(&entry, &root);

        let suffix = entry
            .parent()
            .and_then(|parent| parent.strip_prefix(&prefix).ok())
            .filter(|relative| !relative.as_os_str().is_empty())
            .map(|relative| relative.to_string_lossy().into_owned())
            .unwrap_or_else(|| CURRENT_DIR_MARKER.to_string());

        Ok(PathInfo {
            base_name: base_name(&entry),
            extension: extension_of(&entry),
            common_prefix: prefix,
            suffix,
        })
    }

    pub fn at_root(&self) -> bool {
        self.suffix == CURRENT_DIR_MARKER
    }
}

/// Longest shared leading run of path components.
pub fn common_prefix(left: &Path, right: &Path) -> PathBuf {
    left.components()
        .zip(right.components())
        .take_while(|(a, b)| a == b)
        .map(|(component, _)| component)
        .collect()
}

pub fn base_name(path: &Path) -> String {
    path.file_name().map(OsStr::to_string_lossy).map(|name| name.into_owned()).unwrap_or_default()
}

/// Lowercased final extension with a leading dot, matching the form used in
/// the configured extension lists.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Normalize a configured extension (`VST3`, `.Vst3`) to `.vst3`.
pub fn normalize_extension(value: &str) -> String {
    let trimmed = value.trim().trim_start_matches('.');
    format!(".{}", trimmed.to_lowercase())
}

pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let extension = extension_of(path);
    !extension.is_empty() && extensions.iter().any(|candidate| candidate == &extension)
}

/// Replace the home directory prefix with `~` to make output easier to read.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        let mut display = PathBuf::from("~");
        display.push(stripped);
        return display.display().to_string();
    }

    path.display().to_string()
}

pub fn is_excluded(path: &Path, exclude: Option<&globset::GlobSet>) -> bool {
    if let Some(set) = exclude {
        let candidate = if path.is_absolute() {
            path.to_string_lossy().to_string()
        } else {
            match std::env::current_dir() {
                Ok(cwd) => {
                    let joined = cwd.join(path);
                    joined.to_string_lossy().to_string()
                }
                Err(_) => path.to_string_lossy().to_string(),
            }
        };
        set.is_match(&candidate)
    } else {
        false
    }
}

/// Standard system-wide VST3 folder for the current platform.
pub fn default_plugin_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        PathBuf::from(r"C:\Program Files\Common Files\VST3")
    } else if cfg!(target_os = "macos") {
        PathBuf::from("/Library/Audio/Plug-Ins/VST3")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".vst3")
    } else {
        PathBuf::from("/usr/lib/vst3")
    }
}

pub fn default_report_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// First of: explicit argument, configured value, fallback.
pub fn resolve_dir(
    explicit: Option<PathBuf>,
    configured: Option<&PathBuf>,
    fallback: impl FnOnce() -> PathBuf,
) -> PathBuf {
    explicit.or_else(|| configured.cloned()).unwrap_or_else(fallback)
}
