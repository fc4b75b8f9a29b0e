//! The text processor: generates or refreshes tooltips for one text.

pub mod splice;

use std::sync::OnceLock;

use crate::errors::Result;
use crate::payload;
use crate::rules::{ExtractionRule, FieldMatch, RuleSet};
use crate::types::{CommentKind, ProcessOutcome, ProcessorOptions};
pub use splice::{apply_edits, Edit};

/// Generates tooltips from the comments written above field declarations.
///
/// The rule set is compiled once and shared read-only, so one processor can
/// serve any number of texts, from any number of threads.
#[derive(Debug)]
pub struct TextProcessor {
    rules: RuleSet,
    options: ProcessorOptions,
}

impl TextProcessor {
    /// Creates a processor with default options.
    pub fn new() -> Self {
        Self::with_options(ProcessorOptions::default())
    }

    pub fn with_options(options: ProcessorOptions) -> Self {
        Self {
            rules: RuleSet::new(),
            options,
        }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Processes `text` with the rules of every kind in `kinds`.
    ///
    /// Rules run one after the other, each against the text the previous
    /// ones produced. When `modified` is `false` the returned text equals the
    /// input. A documentation comment without a `<summary>` element fails the
    /// whole call; no partial output is returned.
    pub fn process(&self, text: &str, kinds: CommentKind) -> Result<ProcessOutcome> {
        let line_ending = self.options.line_ending.resolve(text);
        let mut current = text.to_string();
        let mut annotations = 0;

        for rule in self.rules.active(kinds) {
            let (edits, updated) = self.plan_edits(rule, &current, line_ending)?;
            if updated == 0 {
                continue;
            }
            annotations += updated;
            let (edited, _) = apply_edits(&current, &edits);
            current = edited;
        }

        Ok(ProcessOutcome {
            text: current,
            modified: annotations > 0,
            annotations,
        })
    }

    /// Computes the edits one rule makes to `text`, in document order,
    /// along with the number of fields they update.
    fn plan_edits(
        &self,
        rule: &ExtractionRule,
        text: &str,
        line_ending: &str,
    ) -> Result<(Vec<Edit>, usize)> {
        let mut edits = Vec::new();
        let mut updated = 0;
        for field in self.rules.find_fields(rule, text) {
            if !self.options.eligibility.allows(&field) {
                continue;
            }

            let documentation = payload::assemble_documentation(&field.documentation, line_ending);
            let content = payload::escape(&rule.payload(&documentation)?);
            if content == field.tooltip_content {
                continue;
            }

            if let Some(old) = &field.tooltip {
                edits.push(Edit::remove(old.clone()));
            }
            edits.push(Edit::insert(
                field.field.start,
                self.tooltip_line(&field, &content, line_ending),
            ));
            updated += 1;
        }
        Ok((edits, updated))
    }

    fn tooltip_line(&self, field: &FieldMatch<'_>, content: &str, line_ending: &str) -> String {
        let style = self.options.style;
        let mut line = String::with_capacity(
            field.beginning.len() + style.open().len() + content.len() + style.close().len() + 2,
        );
        line.push_str(field.beginning);
        line.push_str(style.open());
        line.push_str(content);
        line.push_str(style.close());
        line.push_str(line_ending);
        line
    }
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Processes `text` with a shared, default-configured [`TextProcessor`].
pub fn process(text: &str, kinds: CommentKind) -> Result<ProcessOutcome> {
    static PROCESSOR: OnceLock<TextProcessor> = OnceLock::new();
    PROCESSOR.get_or_init(TextProcessor::new).process(text, kinds)
}
