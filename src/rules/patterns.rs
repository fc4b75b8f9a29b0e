//! Pattern sources for the extraction rules.
//!
//! Every field-unit pattern is a comment block followed by a common tail:
//! blank lines, attribute lines (at most one of them a tooltip), then the
//! field declaration. Which attribute is the tooltip is decided after
//! matching, see [`TOOLTIP_ATTRIBUTE`].

use crate::types::CommentKind;

/// Pattern sources for one comment kind.
pub struct RuleSource {
    pub kind: CommentKind,
    /// The comment block, captured as `documentation`.
    pub comment_block: &'static str,
    /// Strips the delimiters off a comment block, leaving the `body` capture.
    pub body: Option<&'static str>,
    /// One documentation line of a comment body, captured as `line`.
    pub line: &'static str,
    /// Pulls the `comment` capture out of the assembled documentation.
    pub payload: Option<&'static str>,
}

/// One attribute block starting a line. Quoted strings may contain `]`.
pub const ATTRIBUTE_BLOCK: &str = r#"^[ \t]*\[(?:[^\]"]|"(?:[^"\\]|\\.)*")+\]"#;

/// An existing tooltip, matched against a whole attribute block.
pub const TOOLTIP_ATTRIBUTE: &str =
    r#"\A[ \t]*\[(?:UnityEngine.)?Tooltip\("(?P<content>(?:[^"\\]|\\.)*)"\)\]\z"#;

/// An attribute block that names the tooltip attribute, in any shape.
pub const TOOLTIP_MENTION: &str = r"\A[ \t]*\[[ \t]*(?:UnityEngine.)?Tooltip";

/// Attribute name whose presence makes a non-public field eligible.
pub const SERIALIZATION_MARKER: &str = "SerializeField";

const FIELD_DECLARATION: &str = concat!(
    r"(?P<field>(?P<beginning>^[ \t]*)",
    r"(?:(?P<modifier>public|private|internal|protected)\s+)?",
    r"[^\s;=]+\s+[^\s;=\\(]+\s*(?:=[^>;][^;]*)?;)",
);

const SUMMARY: &str = r"<summary>\s*(?P<comment>(?s:.*?))\s*</summary";

/// One row per comment kind, in the order the rules run.
///
/// Every line of a `/** */` block after the opening one must start with `*`;
/// blocks written without that prefix are not recognized.
pub const RULE_SOURCES: [RuleSource; 3] = [
    RuleSource {
        kind: CommentKind::SINGLE_LINE_DOCUMENTATION,
        comment_block: r"(?:^[ \t]*///[^\r\n]*\r?\n)+",
        body: None,
        line: r"(?m)^[ \t]*///[ \t]?(?P<line>[^\r\n]*)",
        payload: Some(SUMMARY),
    },
    RuleSource {
        kind: CommentKind::DELIMITED_DOCUMENTATION,
        comment_block: r"^[ \t]*/\*(?:[ \t]*\*[ \t]?[^\r\n]*(?:\r?\n)?)+[ \t]*\*/[ \t]*\r?\n",
        body: Some(r"(?s)\A[ \t]*/\*(?P<body>.*)\*/[ \t]*\r?\n\z"),
        line: r"(?m)^[ \t]*\*[ \t]?(?P<line>[^\r\n]*)",
        payload: Some(SUMMARY),
    },
    RuleSource {
        kind: CommentKind::SINGLE_LINE,
        comment_block: r"(?:^[ \t]*//(?:[^/\r\n][^\r\n]*)?\r?\n)+",
        body: None,
        line: r"(?m)^[ \t]*//[ \t]?(?P<line>[^\r\n]*)",
        payload: None,
    },
];

/// Full field-unit pattern for a comment block pattern.
pub fn field_unit_pattern(comment_block: &str) -> String {
    format!(
        r"(?m)(?P<documentation>{comment_block})\s*^(?P<attributes>(?:{ATTRIBUTE_BLOCK}\s*^)*){FIELD_DECLARATION}"
    )
}
