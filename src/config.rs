use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TooltipError};
use crate::types::{AnnotationStyle, CommentKind, FieldEligibility, LineEnding, ProcessorOptions};

/// Name of the configuration file stored inside the `.doc2tooltip` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory holding a project's doc2tooltip settings.
pub const TOOL_DIR: &str = ".doc2tooltip";

/// What a batch does when a file cannot be processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Record the failure, leave the file untouched and carry on.
    #[default]
    SkipFile,
    /// Stop the batch and report the error.
    Abort,
}

/// Configuration for a doc2tooltip project.
///
/// Controls which comment kinds are parsed, how tooltips are written, and
/// which files a folder run visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Parse `///` documentation comments.
    pub parse_single_line_documentation: bool,
    /// Parse `/** */` documentation comments.
    pub parse_delimited_documentation: bool,
    /// Parse plain `//` comments.
    pub parse_single_line: bool,
    /// Which fields receive a tooltip.
    pub eligibility: FieldEligibility,
    /// `[Tooltip(..)]` or `[UnityEngine.Tooltip(..)]`.
    pub annotation_style: AnnotationStyle,
    /// Line break used in generated text.
    pub line_ending: LineEnding,
    /// What to do with files that fail to process.
    pub on_error: ErrorPolicy,
    /// Glob patterns for files to process in folder runs.
    pub include: Vec<String>,
    /// Glob patterns for files to skip in folder runs.
    pub exclude: Vec<String>,
    /// Maximum file size in bytes; larger files are skipped in folder runs.
    pub max_file_size: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            version: 1,
            parse_single_line_documentation: true,
            parse_delimited_documentation: true,
            parse_single_line: true,
            eligibility: FieldEligibility::default(),
            annotation_style: AnnotationStyle::default(),
            line_ending: LineEnding::default(),
            on_error: ErrorPolicy::default(),
            include: vec!["**/*.cs".to_string()],
            exclude: vec![
                ".git/**".to_string(),
                ".doc2tooltip/**".to_string(),
                "Library/**".to_string(),
                "Temp/**".to_string(),
                "Logs/**".to_string(),
                "obj/**".to_string(),
                "bin/**".to_string(),
                "Build/**".to_string(),
                "Packages/**".to_string(),
            ],
            max_file_size: 4_194_304,
        }
    }
}

impl ToolConfig {
    /// The comment kinds enabled by this configuration.
    pub fn comment_kinds(&self) -> CommentKind {
        let mut kinds = CommentKind::empty();
        kinds.set(
            CommentKind::SINGLE_LINE_DOCUMENTATION,
            self.parse_single_line_documentation,
        );
        kinds.set(
            CommentKind::DELIMITED_DOCUMENTATION,
            self.parse_delimited_documentation,
        );
        kinds.set(CommentKind::SINGLE_LINE, self.parse_single_line);
        kinds
    }

    /// Enables exactly the kinds in `kinds`.
    ///
    /// Returns `true` if the selection changed.
    pub fn set_comment_kinds(&mut self, kinds: CommentKind) -> bool {
        let changed = self.comment_kinds() != kinds;
        self.parse_single_line_documentation = kinds.contains(CommentKind::SINGLE_LINE_DOCUMENTATION);
        self.parse_delimited_documentation = kinds.contains(CommentKind::DELIMITED_DOCUMENTATION);
        self.parse_single_line = kinds.contains(CommentKind::SINGLE_LINE);
        changed
    }

    /// Text processor options derived from this configuration.
    pub fn processor_options(&self) -> ProcessorOptions {
        ProcessorOptions {
            eligibility: self.eligibility,
            style: self.annotation_style,
            line_ending: self.line_ending,
        }
    }
}

/// Returns the path to the `.doc2tooltip` directory within the given project root.
pub fn get_tool_dir(project_root: &Path) -> PathBuf {
    project_root.join(TOOL_DIR)
}

/// Returns the path to the configuration file within the `.doc2tooltip` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_tool_dir(project_root).join(CONFIG_FILENAME)
}

/// Returns the path of the user-wide configuration file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("doc2tooltip").join(CONFIG_FILENAME))
}

/// Loads the configuration for a project.
///
/// The project's own file wins; without one the user-wide file is used, and
/// without either the defaults.
pub fn load_config(project_root: &Path) -> Result<ToolConfig> {
    let project_path = get_config_path(project_root);
    if project_path.exists() {
        return read_config(&project_path);
    }
    match user_config_path() {
        Some(user_path) if user_path.exists() => read_config(&user_path),
        _ => Ok(ToolConfig::default()),
    }
}

/// Reads and parses one configuration file.
pub fn read_config(config_path: &Path) -> Result<ToolConfig> {
    let contents = fs::read_to_string(config_path).map_err(|e| TooltipError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    serde_json::from_str(&contents).map_err(|e| TooltipError::Config {
        message: format!(
            "failed to parse config file '{}': {}",
            config_path.display(),
            e
        ),
    })
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it to the final location,
/// ensuring that a partial write never corrupts the configuration.
pub fn save_config(project_root: &Path, config: &ToolConfig) -> Result<()> {
    let tool_dir = get_tool_dir(project_root);
    fs::create_dir_all(&tool_dir).map_err(|e| TooltipError::Config {
        message: format!(
            "failed to create config directory '{}': {}",
            tool_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| TooltipError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| TooltipError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| TooltipError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Determines whether a file should be processed based on the configuration's
/// include and exclude glob patterns.
///
/// A file is included only if it matches at least one include pattern and
/// does not match any exclude pattern. Exclude patterns take precedence.
pub fn should_include_file(file_path: &str, config: &ToolConfig) -> bool {
    let match_opts = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    let matches = |pattern_str: &String| {
        Pattern::new(pattern_str)
            .map(|pattern| pattern.matches_with(file_path, match_opts))
            .unwrap_or(false)
    };

    !config.exclude.iter().any(matches) && config.include.iter().any(matches)
}
