use std::path::PathBuf;

use crate::commands::print_warnings;
use crate::config::Config;
use crate::error::AppError;
use crate::model::{NOT_RECOGNIZED_LABEL, PluginCatalog, UNKNOWN_LABEL};
use crate::path::{default_plugin_dir, display_path, resolve_dir};
use crate::scanner::{Scanner, ensure_plugin_dir};

pub struct ScanOptions {
    pub plugin_dir: Option<PathBuf>,
    pub verbose: bool,
    pub json: bool,
}

pub fn execute_scan(options: ScanOptions) -> Result<PluginCatalog, AppError> {
    let config = Config::load()?;
    let root = resolve_dir(options.plugin_dir.clone(), config.plugin_dir.as_ref(), default_plugin_dir);
    ensure_plugin_dir(&root)?;

    let scanner = Scanner::new(&config)?;
    let (catalog, outcome) = scanner.scan(&root)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
    } else {
        print_catalog(&catalog, &root, options.verbose);
    }
    print_warnings(&outcome);
    Ok(catalog)
}

fn print_catalog(catalog: &PluginCatalog, root: &std::path::Path, verbose: bool) {
    println!("Scan results for {}:", display_path(root));
    for (manufacturer, names) in catalog.manufacturers() {
        print_column(manufacturer, names, verbose);
    }
    print_column(UNKNOWN_LABEL, catalog.unknown(), verbose);
    print_column(NOT_RECOGNIZED_LABEL, catalog.not_recognized(), verbose);
    println!(
        "Total: {} plugin(s) from {} manufacturer(s), {} file(s) to check",
        catalog.plugin_count(),
        catalog.manufacturers().count(),
        catalog.unknown().len() + catalog.not_recognized().len()
    );
}

fn print_column(name: &str, entries: &[String], verbose: bool) {
    println!("- {:<32} {:>5} item(s)", name, entries.len());
    if verbose {
        for entry in entries {
            println!("    • {entry}");
        }
    }
}
