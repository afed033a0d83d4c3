pub mod config_cmd;
pub mod report;
pub mod scan;

pub use config_cmd::execute_config;
pub use report::execute_report;
pub use scan::execute_scan;

use crate::model::WalkOutcome;

pub(crate) fn print_warnings(outcome: &WalkOutcome) {
    if !outcome.warnings.is_empty() {
        eprintln!(
            "Warning: skipped {} unreadable entr{}.",
            outcome.warnings.len(),
            if outcome.warnings.len() == 1 { "y" } else { "ies" }
        );
    }
}
