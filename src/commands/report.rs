use std::path::PathBuf;

use dialoguer::Input;

use crate::commands::print_warnings;
use crate::config::Config;
use crate::error::AppError;
use crate::path::{default_plugin_dir, default_report_dir, display_path, resolve_dir};
use crate::report::{ReportPaths, write_reports};
use crate::scanner::{Scanner, ensure_plugin_dir, ensure_report_dir};

pub struct ReportOptions {
    pub plugin_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub interactive: bool,
    pub verbose: bool,
}

pub fn execute_report(options: ReportOptions) -> Result<ReportPaths, AppError> {
    let config = Config::load()?;
    let mut root = resolve_dir(options.plugin_dir, config.plugin_dir.as_ref(), default_plugin_dir);
    let mut output = resolve_dir(options.output, config.report_dir.as_ref(), default_report_dir);

    if options.interactive {
        root = prompt_for_dir("VST3 folder", &root)?;
        output = prompt_for_dir("Report folder", &output)?;
    }

    ensure_plugin_dir(&root)?;
    ensure_report_dir(&output)?;

    let scanner = Scanner::new(&config)?;
    let (catalog, outcome) = scanner.scan(&root)?;
    let paths = write_reports(&catalog, &output)?;

    if options.verbose {
        for (manufacturer, names) in catalog.iter() {
            println!("- {:<32} {:>5} item(s)", manufacturer, names.len());
        }
    }
    println!(
        "Listed {} plugin(s) from {} manufacturer(s).",
        catalog.plugin_count(),
        catalog.manufacturers().count()
    );
    println!("Wrote {}", display_path(&paths.list));
    println!("Wrote {}", display_path(&paths.check));
    print_warnings(&outcome);

    Ok(paths)
}

fn prompt_for_dir(prompt: &str, default: &std::path::Path) -> Result<PathBuf, AppError> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .default(default.display().to_string())
        .interact_text()?;
    Ok(PathBuf::from(answer.trim()))
}
