use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vst3_list::commands::{config_cmd::ConfigOptions, report::ReportOptions, scan::ScanOptions};
use vst3_list::commands::{execute_config, execute_report, execute_scan};
use vst3_list::error::AppError;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.command.verbose());

    match cli.command {
        Commands::Scan(args) => {
            let options =
                ScanOptions { plugin_dir: args.plugin_dir, verbose: args.verbose, json: args.json };
            execute_scan(options)?;
        }
        Commands::Report(args) => {
            let options = ReportOptions {
                plugin_dir: args.plugin_dir,
                output: args.output,
                interactive: args.interactive,
                verbose: args.verbose,
            };
            execute_report(options)?;
        }
        Commands::Config(args) => {
            let options = ConfigOptions {
                show_path: args.path,
                show: args.show,
                edit: args.edit,
                add_exclude: args.add_exclude,
                set_plugin_dir: args.set_plugin_dir,
                set_report_dir: args.set_report_dir,
            };
            execute_config(options)?;
        }
    }

    Ok(())
}

/// Warnings only by default; `--verbose` opens up debug output for this crate
/// and `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let default = if verbose { "warn,vst3_list=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "vst3-list",
    version,
    about = "List installed VST3 plugins by manufacturer and export them to CSV."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a plugin folder and print what was found, without writing reports.
    #[command(visible_alias = "sc")]
    Scan(ScanArgs),
    /// Scan a plugin folder and write VST3_List.csv and VST3_2Check.csv.
    #[command(visible_alias = "rp")]
    Report(ReportArgs),
    /// Manage vst3-list configuration (default folders, exclusions, etc.).
    #[command(visible_alias = "cfg")]
    Config(ConfigArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Commands::Scan(args) => args.verbose,
            Commands::Report(args) => args.verbose,
            Commands::Config(_) => false,
        }
    }
}

#[derive(Args)]
struct ScanArgs {
    /// Show every plugin and file under each manufacturer.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Print the catalog as JSON instead of a summary.
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// Plugin folder to scan (defaults to the configured or system VST3 folder).
    #[arg(value_name = "PLUGIN_DIR")]
    plugin_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ReportArgs {
    /// Folder the CSV reports are written to (defaults to the current directory).
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    output: Option<PathBuf>,

    /// Ask for the plugin and report folders before scanning.
    #[arg(short = 'i', long = "interactive", action = ArgAction::SetTrue)]
    interactive: bool,

    /// Show per-manufacturer counts and debug logging.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Plugin folder to scan (defaults to the configured or system VST3 folder).
    #[arg(value_name = "PLUGIN_DIR")]
    plugin_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ConfigArgs {
    /// Show the configuration file path.
    #[arg(long = "path", action = ArgAction::SetTrue)]
    path: bool,

    /// Print the effective configuration.
    #[arg(long = "show", action = ArgAction::SetTrue)]
    show: bool,

    /// Open the configuration file in $EDITOR.
    #[arg(long = "edit", action = ArgAction::SetTrue)]
    edit: bool,

    /// Add a glob pattern for paths the scan should skip.
    #[arg(long = "add-exclude", value_name = "PATTERN")]
    add_exclude: Option<String>,

    /// Remember a default VST3 folder.
    #[arg(long = "set-plugin-dir", value_name = "DIR")]
    set_plugin_dir: Option<PathBuf>,

    /// Remember a default report folder.
    #[arg(long = "set-report-dir", value_name = "DIR")]
    set_report_dir: Option<PathBuf>,
}
