//! Processing files on disk: discovery, decoding, the text processor, write-back.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{should_include_file, ErrorPolicy, ToolConfig};
use crate::encoding::{self, TextEncoding};
use crate::errors::{Result, TooltipError};
use crate::processor::TextProcessor;
use crate::types::CommentKind;

/// Position of the batch, reported before each file is processed.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// One-based index of the file about to be processed.
    pub current: usize,
    pub total: usize,
    pub path: &'a Path,
}

/// A file whose processed text differs from its content on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileModification {
    pub path: PathBuf,
    pub new_content: String,
    /// Encoding the file was read with, and will be written with.
    pub encoding: TextEncoding,
    /// Number of tooltips inserted or replaced.
    pub annotations: usize,
}

/// A file that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Files to rewrite, in processing order.
    pub modified_files: Vec<FileModification>,
    /// Files skipped because of an error.
    pub failures: Vec<FileFailure>,
    /// Number of files handed to the batch.
    pub total_files: usize,
    /// Whether the batch stopped early on request.
    pub canceled: bool,
    /// Time taken in milliseconds.
    pub duration_ms: u64,
}

impl BatchResult {
    /// Writes every modified file back to disk with its original encoding.
    ///
    /// A canceled batch writes nothing. Returns the number of files written.
    pub fn commit(&self) -> Result<usize> {
        if self.canceled {
            return Ok(0);
        }
        for modification in &self.modified_files {
            let bytes = modification
                .encoding
                .encode(&modification.new_content)
                .map_err(|e| TooltipError::File {
                    message: e.to_string(),
                    path: modification.path.display().to_string(),
                })?;
            write_atomically(&modification.path, &bytes)?;
            info!(
                path = %modification.path.display(),
                annotations = modification.annotations,
                "updated tooltips"
            );
        }
        Ok(self.modified_files.len())
    }
}

/// How a batch request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// No file was given, or the folder holds no matching file.
    NoFileToProcess,
    /// The comment kind selection is empty.
    NoCommentKindSelected,
    Completed(BatchResult),
}

/// Runs the text processor over files on disk.
#[derive(Debug)]
pub struct BatchProcessor {
    processor: TextProcessor,
    config: ToolConfig,
}

impl BatchProcessor {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            processor: TextProcessor::with_options(config.processor_options()),
            config,
        }
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Lists the files to process under `root`.
    ///
    /// A file path is returned as is. For a folder, files are filtered by the
    /// configured globs (matched against the root-relative path) and size limit.
    /// A `root` that does not exist is an error.
    pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Err(TooltipError::File {
                message: "no such file or folder".to_string(),
                path: root.display().to_string(),
            });
        }
        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let rel_str = relative.to_string_lossy().replace('\\', "/");
            if !should_include_file(&rel_str, &self.config) {
                continue;
            }
            match entry.metadata() {
                Ok(metadata) if metadata.len() <= self.config.max_file_size => {
                    files.push(path.to_path_buf());
                }
                Ok(metadata) => {
                    debug!(path = %path.display(), size = metadata.len(), "skipping large file");
                }
                Err(_) => continue,
            }
        }
        files.sort();
        Ok(files)
    }

    /// Processes one file without writing it.
    ///
    /// Returns `None` when the file needs no change.
    pub fn process_file(&self, path: &Path, kinds: CommentKind) -> Result<Option<FileModification>> {
        let bytes = fs::read(path).map_err(|e| TooltipError::File {
            message: format!("failed to read file: {}", e),
            path: path.display().to_string(),
        })?;
        let (text, encoding) = encoding::decode(&bytes)?;
        let outcome = self.processor.process(&text, kinds)?;
        if !outcome.modified {
            return Ok(None);
        }
        Ok(Some(FileModification {
            path: path.to_path_buf(),
            new_content: outcome.text,
            encoding,
            annotations: outcome.annotations,
        }))
    }

    /// Processes `paths` with the rules of `kinds`, without writing anything.
    ///
    /// `cancel` is called before each file; returning `true` stops the batch.
    /// Failing files follow the configured [`ErrorPolicy`].
    pub fn process_paths<F>(
        &self,
        paths: &[PathBuf],
        kinds: CommentKind,
        mut cancel: F,
    ) -> Result<BatchOutcome>
    where
        F: FnMut(&Progress<'_>) -> bool,
    {
        let paths: Vec<&PathBuf> = paths
            .iter()
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        if paths.is_empty() {
            return Ok(BatchOutcome::NoFileToProcess);
        }
        if kinds.is_empty() {
            return Ok(BatchOutcome::NoCommentKindSelected);
        }

        let start = Instant::now();
        let mut modified_files = Vec::new();
        let mut failures = Vec::new();
        let mut canceled = false;

        for (index, path) in paths.iter().enumerate() {
            let progress = Progress {
                current: index + 1,
                total: paths.len(),
                path: path.as_path(),
            };
            if cancel(&progress) {
                canceled = true;
                info!(processed = index, total = paths.len(), "batch canceled");
                break;
            }
            debug!(path = %path.display(), current = index + 1, total = paths.len(), "processing");

            match self.process_file(path, kinds) {
                Ok(Some(modification)) => modified_files.push(modification),
                Ok(None) => {}
                Err(e) => match self.config.on_error {
                    ErrorPolicy::SkipFile => {
                        warn!(path = %path.display(), error = %e, "skipping file");
                        failures.push(FileFailure {
                            path: path.to_path_buf(),
                            message: e.to_string(),
                        });
                    }
                    ErrorPolicy::Abort => return Err(e),
                },
            }
        }

        Ok(BatchOutcome::Completed(BatchResult {
            modified_files,
            failures,
            total_files: paths.len(),
            canceled,
            duration_ms: start.elapsed().as_millis() as u64,
        }))
    }
}

/// Writes `bytes` to a sibling temporary file, then renames it over `path`.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, bytes).map_err(|e| TooltipError::File {
        message: format!("failed to write temporary file: {}", e),
        path: tmp_path.display().to_string(),
    })?;
    fs::rename(&tmp_path, path).map_err(|e| TooltipError::File {
        message: format!("failed to replace file: {}", e),
        path: path.display().to_string(),
    })?;
    Ok(())
}
