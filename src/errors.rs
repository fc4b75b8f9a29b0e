use thiserror::Error;

/// Errors that can occur while generating tooltips.
#[derive(Error, Debug)]
pub enum TooltipError {
    /// A documentation comment has no `<summary>` element to take the tooltip from.
    #[error("could not parse the following documentation xml '{documentation}'")]
    MalformedDocumentation { documentation: String },

    #[error("file error: {message} (path: {path})")]
    File { message: String, path: String },

    #[error("encoding error: {message}")]
    Encoding { message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `TooltipError`.
pub type Result<T> = std::result::Result<T, TooltipError>;
