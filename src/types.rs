use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::rules::FieldMatch;

bitflags! {
    /// The comment syntaxes tooltips can be generated from.
    ///
    /// Any combination is a valid selection; the empty set selects nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CommentKind: u8 {
        /// `/// <summary> Comment here </summary>`
        const SINGLE_LINE_DOCUMENTATION = 1 << 0;
        /// `/** <summary> Comment here </summary> */`
        const DELIMITED_DOCUMENTATION = 1 << 1;
        /// `// Comment here`
        const SINGLE_LINE = 1 << 2;
    }
}

const KIND_NAMES: [(CommentKind, &str); 3] = [
    (
        CommentKind::SINGLE_LINE_DOCUMENTATION,
        "single-line-documentation",
    ),
    (CommentKind::DELIMITED_DOCUMENTATION, "delimited-documentation"),
    (CommentKind::SINGLE_LINE, "single-line"),
];

#[allow(clippy::should_implement_trait)]
impl CommentKind {
    /// Returns the name of a single comment kind, or `None` for combinations.
    pub fn as_str(&self) -> Option<&'static str> {
        KIND_NAMES
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, name)| *name)
    }

    /// Parses a single kind name (or `all` / `none`), returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<CommentKind> {
        match s.trim() {
            "all" => Some(CommentKind::all()),
            "none" => Some(CommentKind::empty()),
            name => KIND_NAMES
                .iter()
                .find(|(_, n)| *n == name)
                .map(|(kind, _)| *kind),
        }
    }

    /// Parses a list of kind names into their union.
    ///
    /// Returns the first unrecognized name as the error.
    pub fn from_names<'a, I>(names: I) -> std::result::Result<CommentKind, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut kinds = CommentKind::empty();
        for name in names {
            kinds |= CommentKind::from_str(name).ok_or_else(|| name.trim().to_string())?;
        }
        Ok(kinds)
    }

    /// Names of every single kind contained in this set, in rule order.
    pub fn names(&self) -> Vec<&'static str> {
        KIND_NAMES
            .iter()
            .filter(|(kind, _)| self.contains(*kind))
            .map(|(_, name)| *name)
            .collect()
    }
}

/// Which fields receive a tooltip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldEligibility {
    /// Public fields, and fields marked with a `SerializeField` attribute.
    #[default]
    PublicOrSerialized,
    /// Every commented field, whatever its access or attributes.
    Any,
}

impl FieldEligibility {
    /// Returns the string representation of this eligibility rule.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldEligibility::PublicOrSerialized => "public-or-serialized",
            FieldEligibility::Any => "any",
        }
    }

    /// Returns `true` if the matched field should carry a tooltip.
    pub fn allows(&self, field: &FieldMatch<'_>) -> bool {
        match self {
            FieldEligibility::PublicOrSerialized => {
                field.is_public() || field.has_serialization_marker()
            }
            FieldEligibility::Any => true,
        }
    }
}

/// Spelling of the generated tooltip attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationStyle {
    /// `[Tooltip("...")]`
    #[default]
    Short,
    /// `[UnityEngine.Tooltip("...")]`
    Qualified,
}

impl AnnotationStyle {
    /// Text written before the escaped payload.
    pub fn open(&self) -> &'static str {
        match self {
            AnnotationStyle::Short => "[Tooltip(\"",
            AnnotationStyle::Qualified => "[UnityEngine.Tooltip(\"",
        }
    }

    /// Text written after the escaped payload.
    pub fn close(&self) -> &'static str {
        "\")]"
    }
}

/// Line break used to join documentation lines and to end inserted tooltip lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    /// The platform's line break.
    #[default]
    Native,
    Lf,
    CrLf,
    /// CRLF if the processed text already contains one, LF otherwise.
    Auto,
}

impl LineEnding {
    /// Resolves this setting to the concrete sequence used for `text`.
    pub fn resolve(&self, text: &str) -> &'static str {
        match self {
            LineEnding::Native => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Auto => {
                if text.contains("\r\n") {
                    "\r\n"
                } else {
                    "\n"
                }
            }
        }
    }
}

/// Options that shape the text processor's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorOptions {
    pub eligibility: FieldEligibility,
    pub style: AnnotationStyle,
    pub line_ending: LineEnding,
}

/// Result of processing one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// The processed text; equal to the input when `modified` is `false`.
    pub text: String,
    /// Whether at least one tooltip was inserted or replaced.
    pub modified: bool,
    /// Number of tooltips inserted or replaced.
    pub annotations: usize,
}
