use std::fs;
use std::path::{Path, PathBuf};

/// Input paths as given on the command line, expanded to files on demand.
#[derive(Debug, Clone)]
pub struct InputSet {
    pub paths: Vec<PathBuf>,
    pub recursive: bool,
    pub extensions: Vec<String>,
}

impl InputSet {
    pub fn new(paths: Vec<PathBuf>, recursive: bool, extensions: Vec<String>) -> Self {
        Self {
            paths,
            recursive,
            extensions,
        }
    }

    /// Files of every path, in the order the paths were given.
    pub fn files(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.paths
            .iter()
            .flat_map(|path| get_file_names(path, self.recursive, &self.extensions))
    }
}

/// Expands `path` into sequence files. A file is returned as is; a directory
/// yields files ending in one of `extensions`, grouped by extension and sorted
/// within each group. Missing paths and empty directories log a warning.
pub fn get_file_names(path: &Path, recursive: bool, extensions: &[String]) -> Vec<PathBuf> {
    if !path.exists() {
        log::warn!("Could not find {}", path.display());
        return Vec::new();
    }
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }

    log::debug!("Searching {} for FASTQ files", path.display());
    let mut candidates = Vec::new();
    collect_files(path, recursive, &mut candidates);

    let mut files = Vec::new();
    for extension in extensions {
        let mut matching: Vec<PathBuf> = candidates
            .iter()
            .filter(|file| has_extension(file, extension))
            .cloned()
            .collect();
        matching.sort();
        files.extend(matching);
    }

    if files.is_empty() {
        log::warn!(
            "Could not find {} files in {}",
            extensions.join("/"),
            path.display()
        );
    } else {
        log::debug!("Found {} files", files.len());
    }
    files
}

fn has_extension(file: &Path, extension: &str) -> bool {
    file.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.len() > extension.len() && name.ends_with(extension))
}

fn collect_files(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Could not read {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect_files(&path, recursive, files);
            }
        } else if path.is_file() {
            files.push(path);
        }
    }
}
