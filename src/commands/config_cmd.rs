use std::path::Path;
use std::process::Command;

use crate::config::{Config, config_file_path, ensure_config_file};
use crate::error::AppError;
use crate::path::{default_plugin_dir, default_report_dir, display_path, resolve_dir};

pub struct ConfigOptions {
    pub show_path: bool,
    pub show: bool,
    pub edit: bool,
    pub add_exclude: Option<String>,
    pub set_plugin_dir: Option<std::path::PathBuf>,
    pub set_report_dir: Option<std::path::PathBuf>,
}

impl ConfigOptions {
    fn modifies(&self) -> bool {
        self.add_exclude.is_some() || self.set_plugin_dir.is_some() || self.set_report_dir.is_some()
    }
}

pub fn execute_config(options: ConfigOptions) -> Result<(), AppError> {
    let path = config_file_path()?;
    if options.show_path || !(options.show || options.edit || options.modifies()) {
        println!("Configuration file: {}", display_path(&path));
    }

    if options.modifies() {
        let mut config = Config::load()?;
        if let Some(pattern) = &options.add_exclude {
            config.append_exclude(pattern.clone());
            // Reject bad globs before they reach the file.
            config.compile_excludes()?;
            println!("Added exclude pattern '{pattern}'.");
        }
        if let Some(dir) = &options.set_plugin_dir {
            config.plugin_dir = Some(dir.clone());
            println!("Default VST3 folder set to {}.", display_path(dir));
        }
        if let Some(dir) = &options.set_report_dir {
            config.report_dir = Some(dir.clone());
            println!("Default report folder set to {}.", display_path(dir));
        }
        config.save()?;
    }

    if options.show {
        print_effective(&Config::load()?)?;
    }

    if options.edit {
        let path = ensure_config_file()?;
        open_editor(&path)?;
    }

    Ok(())
}

fn print_effective(config: &Config) -> Result<(), AppError> {
    let plugin_dir = resolve_dir(None, config.plugin_dir.as_ref(), default_plugin_dir);
    let report_dir = resolve_dir(None, config.report_dir.as_ref(), default_report_dir);
    println!("VST3 folder:   {}", display_path(&plugin_dir));
    println!("Report folder: {}", display_path(&report_dir));
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn open_editor(path: &Path) -> Result<(), AppError> {
    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "nano".to_string());

    let status = Command::new(&editor)
        .arg(path)
        .status()
        .map_err(|err| AppError::Editor(err.to_string()))?;

    if status.success() {
        Ok(())
    } else {
        Err(AppError::Editor(format!("Editor exited with status {}", status)))
    }
}
