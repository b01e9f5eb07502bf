//! Module discovery: scan search directories for module manifest files.
//!
//! Each base directory is searched together with its immediate
//! subdirectories. Subdirectories of every base come first, then the bases
//! themselves, each sorted by name. Hidden entries are ignored, and a file
//! whose name ends in `{test_marker}.{extension}` is skipped.
//!
//! A directory that is missing or unreadable contributes no files; discovery
//! itself never fails.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hookwire_core::config::modules::ModulesConfig;

/// What counts as a module file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Required file extension, without the dot.
    pub extension: String,
    /// Stem suffix that marks a file as a test fixture (`plain_test.toml`).
    pub test_marker: String,
}

impl DiscoveryOptions {
    /// Returns whether `path` names a loadable module file.
    pub fn is_module_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        if name.starts_with('.') {
            return false;
        }

        if path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str()) {
            return false;
        }

        self.test_marker.is_empty()
            || !name.ends_with(&format!("{}.{}", self.test_marker, self.extension))
    }
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::from(&ModulesConfig::default())
    }
}

impl From<&ModulesConfig> for DiscoveryOptions {
    fn from(config: &ModulesConfig) -> Self {
        Self {
            extension: config.extension.clone(),
            test_marker: config.test_marker.clone(),
        }
    }
}

/// Returns every module file under the given base directories, in load
/// order, with duplicates removed.
pub fn discover_module_files(bases: &[PathBuf], options: &DiscoveryOptions) -> Vec<PathBuf> {
    let mut directories: Vec<PathBuf> = bases
        .iter()
        .flat_map(|base| subdirectories(base))
        .collect();
    directories.extend(bases.iter().cloned());

    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for directory in &directories {
        for file in module_files(directory, options) {
            let key = fs::canonicalize(&file).unwrap_or_else(|_| file.clone());
            if seen.insert(key) {
                files.push(file);
            }
        }
    }

    tracing::debug!(
        directories = directories.len(),
        files = files.len(),
        "Module discovery scan complete"
    );

    files
}

/// Lists the visible immediate subdirectories of `dir`, sorted.
fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = read_dir_paths(dir)
        .into_iter()
        .filter(|p| p.is_dir() && !is_hidden(p))
        .collect();
    dirs.sort();
    dirs
}

/// Lists module files directly inside `dir`, sorted.
fn module_files(dir: &Path, options: &DiscoveryOptions) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = read_dir_paths(dir)
        .into_iter()
        .filter(|p| p.is_file() && options.is_module_file(p))
        .collect();
    files.sort();
    files
}

fn read_dir_paths(dir: &Path) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %dir.display(), "Module directory does not exist");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(
                path = %dir.display(),
                error = %e,
                "Cannot read module directory, treating as empty"
            );
            Vec::new()
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}
