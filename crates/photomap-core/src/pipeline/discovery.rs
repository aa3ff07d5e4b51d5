//! Directory scanning for candidate photos.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::error::PhotoMapError;

/// Lists candidate photos in the input directory.
pub struct FileDiscovery {
    config: ScanConfig,
}

/// A file found in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File name as found on disk
    pub file_name: String,
    /// Lowercased extension without the dot (empty when absent)
    pub extension: String,
    /// Whether the extension is on the allow-list
    pub supported: bool,
}

impl DiscoveredFile {
    /// File name with its extension removed; used as the photo id.
    pub fn id(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(idx) if idx > 0 => &self.file_name[..idx],
            _ => &self.file_name,
        }
    }
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// List the regular files directly inside `dir`, sorted by name.
    ///
    /// Hidden entries are dropped. Files with extensions outside the
    /// allow-list are kept with `supported == false` so the caller can report
    /// them. A missing input directory is fatal.
    pub fn discover(&self, dir: &Path) -> Result<Vec<DiscoveredFile>, PhotoMapError> {
        if !dir.is_dir() {
            return Err(PhotoMapError::MissingInputDirectory(dir.to_path_buf()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Broken symlinks and unreadable entries
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                tracing::warn!("Skipping file with non UTF-8 name: {:?}", entry.path());
                continue;
            };
            if is_hidden(file_name) {
                continue;
            }

            let extension = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_lowercase)
                .unwrap_or_default();
            let supported = self.is_supported(&extension);

            files.push(DiscoveredFile {
                path: entry.path().to_path_buf(),
                file_name: file_name.to_string(),
                extension,
                supported,
            });
        }

        // Sort by name for deterministic manifest order
        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(files)
    }

    /// Check if a (lowercased) extension is on the allow-list.
    fn is_supported(&self, extension: &str) -> bool {
        !extension.is_empty()
            && self
                .config
                .supported_formats
                .iter()
                .any(|fmt| fmt.eq_ignore_ascii_case(extension))
    }

    /// Whether files with this (lowercased) extension need transcoding.
    pub fn needs_transcode(&self, extension: &str) -> bool {
        self.config
            .transcode_formats
            .iter()
            .any(|fmt| fmt.eq_ignore_ascii_case(extension))
    }
}

/// Create the output directory (and parents) if absent.
pub fn prepare_output_dir(dir: &Path) -> Result<(), PhotoMapError> {
    std::fs::create_dir_all(dir).map_err(|source| PhotoMapError::OutputDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

fn is_hidden(file_name: &str) -> bool {
    file_name.starts_with('.')
}
