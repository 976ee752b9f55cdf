//! Run log file naming
//!
//! Every run logs to its own file, named after the endpoint model, the
//! dataset and the minute the run started:
//! `<logs_dir>/<model>_<dataset>_<MM-DD-HH-MM>.log`.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Timestamp format used in log file names
const LOG_STAMP_FORMAT: &str = "%m-%d-%H-%M";

/// Log file name for a run started at `started`
pub fn run_log_file_name(model: &str, dataset: &str, started: DateTime<Local>) -> String {
    format!(
        "{}_{}_{}.log",
        model,
        dataset,
        started.format(LOG_STAMP_FORMAT)
    )
}

/// Full log file path, creating `logs_dir` if needed
pub fn prepare_run_log(
    logs_dir: &Path,
    model: &str,
    dataset: &str,
    started: DateTime<Local>,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(logs_dir)?;
    Ok(logs_dir.join(run_log_file_name(model, dataset, started)))
}
