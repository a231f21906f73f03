use std::path::PathBuf;

/// Split the discovery instruction's stdout into file paths.
///
/// One path per line; lines are trimmed and blank ones dropped.
pub fn parse_output_paths(stdout: &str) -> Vec<PathBuf> {
    stdout
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
