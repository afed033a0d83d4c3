use std::fs;
use std::io::Write;
use std::path::PathBuf;

use dirs_next as dirs;
use globset::{Glob, GlobSet};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::path::normalize_extension;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Folder scanned when no plugin folder is passed on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_dir: Option<PathBuf>,

    /// Folder the CSV reports are written to when `--output` is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,

    #[serde(default = "default_plugin_extensions")]
    pub plugin_extensions: Vec<String>,

    #[serde(default = "default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default = "default_follow_links")]
    pub follow_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            plugin_dir: None,
            report_dir: None,
            plugin_extensions: default_plugin_extensions(),
            excluded_extensions: default_excluded_extensions(),
            exclude: Vec::new(),
            follow_links: default_follow_links(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let path = config_file_path()?;
        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            let config = config.normalized();
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        let path = config_file_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = fs::File::create(path)?;
        let contents = toml::to_string_pretty(self)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    /// Extensions lowercased with a single leading dot, blanks and repeats
    /// dropped, so `VST3` and `.Vst3` both become `.vst3`.
    pub fn normalized(mut self) -> Self {
        self.plugin_extensions = normalize_extensions(&self.plugin_extensions);
        self.excluded_extensions = normalize_extensions(&self.excluded_extensions);
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.plugin_extensions.is_empty() {
            return Err(AppError::config("plugin_extensions must name at least one extension"));
        }
        if let Some(both) =
            self.plugin_extensions.iter().find(|ext| self.excluded_extensions.contains(ext))
        {
            return Err(AppError::config(format!(
                "'{both}' is listed in both plugin_extensions and excluded_extensions"
            )));
        }
        Ok(())
    }

    pub fn append_exclude(&mut self, value: String) {
        if !self.exclude.iter().any(|existing| existing == &value) {
            self.exclude.push(value);
        }
    }

    pub fn compile_excludes(&self) -> Result<Option<GlobSet>, AppError> {
        if self.exclude.is_empty() {
            return Ok(None);
        }

        let mut builder = globset::GlobSetBuilder::new();
        for pattern in &self.exclude {
            let expanded = expand_home(pattern)?;
            builder.add(Glob::new(&expanded)?);
        }

        Ok(Some(builder.build()?))
    }
}

fn normalize_extensions(values: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for value in values {
        if value.trim().trim_start_matches('.').is_empty() {
            continue;
        }
        let extension = normalize_extension(value);
        if !normalized.contains(&extension) {
            normalized.push(extension);
        }
    }
    normalized
}

fn default_plugin_extensions() -> Vec<String> {
    vec![".vst3".to_string(), ".dll".to_string()]
}

fn default_excluded_extensions() -> Vec<String> {
    vec![".ini".to_string()]
}

fn default_follow_links() -> bool {
    true
}

pub fn config_file_path() -> Result<PathBuf, AppError> {
    let config_root = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .ok_or_else(|| {
            AppError::config("Unable to determine configuration directory for this platform")
        })?;
    Ok(config_root.join("vst3-list").join("config.toml"))
}

pub fn ensure_config_file() -> Result<PathBuf, AppError> {
    let path = config_file_path()?;
    if !path.exists() {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let default = Config::default();
        let contents = toml::to_string_pretty(&default)?;
        fs::write(&path, contents)?;
    }
    Ok(path)
}

fn expand_home(value: &str) -> Result<String, AppError> {
    if !value.starts_with('~') {
        return Ok(value.to_string());
    }
    let home_dir = dirs::home_dir().ok_or_else(|| {
        AppError::config("Unable to expand '~' because the home directory is unknown")
    })?;
    if value == "~" {
        Ok(home_dir.display().to_string())
    } else if let Some(stripped) = value.strip_prefix("~/") {
        Ok(home_dir.join(stripped).display().to_string())
    } else {
        Ok(value.to_string())
    }
}
