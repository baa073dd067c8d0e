use std::path::PathBuf;

use super::workers::Workers;

/// Paths given on the command line, in order.
pub fn paths_from_args(args: impl IntoIterator<Item = String>) -> Vec<PathBuf> {
    args.into_iter()
        .filter(|a| !a.trim().is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Add the command-line paths as one upload batch.
pub fn queue_initial_upload(paths: Vec<PathBuf>, workers: &Workers) -> bool {
    if paths.is_empty() {
        return false;
    }
    log::info!("adding {} paths from the command line", paths.len());
    workers.upload(paths);
    true
}
