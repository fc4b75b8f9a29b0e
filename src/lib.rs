pub mod batch;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod payload;
pub mod processor;
pub mod rules;
pub mod types;

pub use errors::{Result, TooltipError};
pub use processor::{process, TextProcessor};
pub use types::{CommentKind, ProcessOutcome};
