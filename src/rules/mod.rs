//! Extraction rules: locating "comment + attributes + field" units in source text.
//!
//! Each [`ExtractionRule`] serves one [`CommentKind`]. A rule finds every
//! field unit in a text in a single forward scan and reports the captured
//! spans as [`FieldMatch`] values, positioned against the scanned text.

pub mod patterns;

use std::ops::Range;

use regex::{Captures, Regex};

use crate::errors::Result;
use crate::payload;
use crate::types::CommentKind;
use patterns::{RuleSource, ATTRIBUTE_BLOCK, RULE_SOURCES, SERIALIZATION_MARKER};

/// A field unit found in a text.
///
/// Spans are byte ranges into the text the rule was run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch<'t> {
    /// Documentation lines, top to bottom, without comment markers.
    pub documentation: Vec<&'t str>,
    /// Attribute blocks other than the tooltip, on either side of it.
    pub attributes: Vec<&'t str>,
    /// The existing tooltip line, including the line break(s) that follow it.
    pub tooltip: Option<Range<usize>>,
    /// The quoted content of the existing tooltip, or `""`.
    pub tooltip_content: &'t str,
    /// The field declaration.
    pub field: Range<usize>,
    /// Indentation of the field declaration line.
    pub beginning: &'t str,
    /// Access modifier of the field, if written.
    pub modifier: Option<&'t str>,
}

impl FieldMatch<'_> {
    pub fn is_public(&self) -> bool {
        self.modifier == Some("public")
    }

    /// Returns `true` if one of the attributes marks the field as serialized.
    pub fn has_serialization_marker(&self) -> bool {
        self.attributes
            .iter()
            .any(|attribute| attribute.contains(SERIALIZATION_MARKER))
    }
}

/// Attribute-level patterns shared by every rule.
#[derive(Debug)]
struct AttributePatterns {
    block: Regex,
    tooltip: Regex,
    tooltip_mention: Regex,
}

impl AttributePatterns {
    fn new() -> Self {
        Self {
            block: compile(&format!("(?m){ATTRIBUTE_BLOCK}")),
            tooltip: compile(patterns::TOOLTIP_ATTRIBUTE),
            tooltip_mention: compile(patterns::TOOLTIP_MENTION),
        }
    }
}

/// How to recognize and read one comment kind.
#[derive(Debug)]
pub struct ExtractionRule {
    kind: CommentKind,
    field_unit: Regex,
    body: Option<Regex>,
    line: Regex,
    payload: Option<Regex>,
}

impl ExtractionRule {
    fn from_source(source: &RuleSource) -> Self {
        Self {
            kind: source.kind,
            field_unit: compile(&patterns::field_unit_pattern(source.comment_block)),
            body: source.body.map(compile),
            line: compile(source.line),
            payload: source.payload.map(compile),
        }
    }

    /// The comment kind this rule serves.
    pub fn kind(&self) -> CommentKind {
        self.kind
    }

    /// The pattern matching a whole field unit.
    pub fn field_unit_pattern(&self) -> &Regex {
        &self.field_unit
    }

    /// The pattern extracting the payload from assembled documentation, if any.
    pub fn payload_pattern(&self) -> Option<&Regex> {
        self.payload.as_ref()
    }

    /// Extracts the tooltip payload from assembled documentation text.
    pub fn payload(&self, documentation: &str) -> Result<String> {
        payload::extract_payload(documentation, self.payload.as_ref())
    }

    /// Splits a matched comment block into its documentation lines.
    fn documentation_lines<'t>(&self, block: &'t str) -> Vec<&'t str> {
        let body = match &self.body {
            Some(body) => match body.captures(block).and_then(|c| c.name("body")) {
                Some(m) => m.as_str(),
                None => return Vec::new(),
            },
            None => block,
        };
        self.line
            .captures_iter(body)
            .filter_map(|c| c.name("line"))
            .map(|m| m.as_str())
            .collect()
    }
}

/// The fixed, ordered set of extraction rules, one per comment kind.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<ExtractionRule>,
    attributes: AttributePatterns,
}

impl RuleSet {
    /// Compiles every rule.
    ///
    /// # Panics
    ///
    /// Panics if a built-in pattern fails to compile.
    pub fn new() -> Self {
        Self {
            rules: RULE_SOURCES.iter().map(ExtractionRule::from_source).collect(),
            attributes: AttributePatterns::new(),
        }
    }

    /// All rules, in the order they run.
    pub fn iter(&self) -> impl Iterator<Item = &ExtractionRule> {
        self.rules.iter()
    }

    /// Rules whose kind intersects `kinds`, in the order they run.
    pub fn active(&self, kinds: CommentKind) -> impl Iterator<Item = &ExtractionRule> {
        self.rules.iter().filter(move |rule| kinds.intersects(rule.kind))
    }

    /// The rule serving exactly `kind`, or `None` for combinations and the empty set.
    pub fn for_kind(&self, kind: CommentKind) -> Option<&ExtractionRule> {
        self.rules.iter().find(|rule| rule.kind == kind)
    }

    /// Finds every field unit `rule` matches in `text`, in document order.
    ///
    /// Units whose attribute lines do not fit the expected layout (more than
    /// one tooltip, or a tooltip in an unrecognized shape) are skipped, and
    /// scanning resumes after their comment block.
    pub fn find_fields<'t>(&self, rule: &ExtractionRule, text: &'t str) -> Vec<FieldMatch<'t>> {
        let mut found = Vec::new();
        let mut position = 0;
        while position < text.len() {
            let Some(captures) = rule.field_unit.captures_at(text, position) else {
                break;
            };
            let (Some(whole), Some(documentation)) = (captures.get(0), captures.name("documentation"))
            else {
                break;
            };
            match self.field_match(rule, &captures) {
                Some(field) => {
                    found.push(field);
                    position = whole.end();
                }
                None => position = documentation.end(),
            }
        }
        found
    }

    fn field_match<'t>(
        &self,
        rule: &ExtractionRule,
        captures: &Captures<'t>,
    ) -> Option<FieldMatch<'t>> {
        let documentation = captures.name("documentation")?;
        let field = captures.name("field")?;
        let beginning = captures.name("beginning")?;

        let mut attributes = Vec::new();
        let mut tooltip = None;
        let mut tooltip_content = "";
        if let Some(section) = captures.name("attributes") {
            let blocks: Vec<_> = self.attributes.block.find_iter(section.as_str()).collect();
            for (index, block) in blocks.iter().enumerate() {
                let block_text = block.as_str();
                if let Some(existing) = self.attributes.tooltip.captures(block_text) {
                    if tooltip.is_some() {
                        return None;
                    }
                    // The tooltip line runs up to the next attribute or the field.
                    let end = blocks
                        .get(index + 1)
                        .map_or(section.end(), |next| section.start() + next.start());
                    tooltip = Some(section.start() + block.start()..end);
                    tooltip_content = existing.name("content")?.as_str();
                } else if self.attributes.tooltip_mention.is_match(block_text) {
                    return None;
                } else {
                    attributes.push(block_text);
                }
            }
        }

        Some(FieldMatch {
            documentation: rule.documentation_lines(documentation.as_str()),
            attributes,
            tooltip,
            tooltip_content,
            field: field.range(),
            beginning: beginning.as_str(),
            modifier: captures.name("modifier").map(|m| m.as_str()),
        })
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}
