use doc2tooltip::payload::unescape;
use doc2tooltip::processor::TextProcessor;
use doc2tooltip::types::*;
use doc2tooltip::{process, TooltipError};

fn lf_processor() -> TextProcessor {
    TextProcessor::with_options(ProcessorOptions {
        line_ending: LineEnding::Lf,
        ..Default::default()
    })
}

fn run(text: &str, kinds: CommentKind) -> ProcessOutcome {
    lf_processor().process(text, kinds).unwrap()
}

#[test]
fn test_single_line_documentation_inserts_tooltip() {
    let input = "/// <summary> Explanation </summary>\n    public int Value;\n";
    let result = process(input, CommentKind::SINGLE_LINE_DOCUMENTATION).unwrap();
    assert!(result.modified);
    assert_eq!(result.annotations, 1);
    let lines: Vec<&str> = result.text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("[Tooltip(\"Explanation\")]"));
    assert_eq!(lines[2], "    public int Value;");
}

#[test]
fn test_single_line_documentation_exact_output() {
    let input = "/// <summary> Explanation </summary>\n    public int Value;\n";
    let result = run(input, CommentKind::SINGLE_LINE_DOCUMENTATION);
    assert_eq!(
        result.text,
        "/// <summary> Explanation </summary>\n    [Tooltip(\"Explanation\")]\n    public int Value;\n"
    );
}

#[test]
fn test_existing_correct_tooltip_is_unchanged() {
    let input =
        "/// <summary> Explanation </summary>\n    [Tooltip(\"Explanation\")]\n    public int Value;\n";
    let result = run(input, CommentKind::SINGLE_LINE_DOCUMENTATION);
    assert!(!result.modified);
    assert_eq!(result.annotations, 0);
    assert_eq!(result.text, input);
}

#[test]
fn test_qualified_tooltip_is_recognized_as_existing() {
    let input = "/// <summary>Speed</summary>\n[UnityEngine.Tooltip(\"Speed\")]\npublic float speed;\n";
    let result = run(input, CommentKind::all());
    assert!(!result.modified);
    assert_eq!(result.text, input);
}

#[test]
fn test_malformed_documentation_fails() {
    let input = "/// <summary> Explanation\n    public int Value;\n";
    let err = process(input, CommentKind::SINGLE_LINE_DOCUMENTATION).unwrap_err();
    match err {
        TooltipError::MalformedDocumentation { documentation } => {
            assert_eq!(documentation, "<summary> Explanation");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_documentation_is_ignored_when_kind_disabled() {
    let input = "/// no summary here\npublic int Value;\n";
    let result = run(input, CommentKind::SINGLE_LINE);
    assert!(!result.modified);
    assert_eq!(result.text, input);
}

#[test]
fn test_empty_kinds_is_a_no_op() {
    let input = "/// <summary>A</summary>\npublic int a;\n// plain\npublic int b;\n";
    let result = run(input, CommentKind::empty());
    assert!(!result.modified);
    assert_eq!(result.text, input);

    let malformed = "/// broken\npublic int c;\n";
    let result = run(malformed, CommentKind::empty());
    assert_eq!(result.text, malformed);
}

#[test]
fn test_private_field_without_marker_is_skipped() {
    let input = "/// <summary>Hidden</summary>\nprivate int hidden;\n/// <summary>Also hidden</summary>\nint implicitlyPrivate;\n";
    let result = run(input, CommentKind::all());
    assert!(!result.modified);
    assert_eq!(result.text, input);
}

#[test]
fn test_any_eligibility_annotates_private_fields() {
    let processor = TextProcessor::with_options(ProcessorOptions {
        eligibility: FieldEligibility::Any,
        line_ending: LineEnding::Lf,
        ..Default::default()
    });
    let input = "/// <summary>Hidden</summary>\nprivate int hidden;\n";
    let result = processor.process(input, CommentKind::all()).unwrap();
    assert!(result.modified);
    assert_eq!(
        result.text,
        "/// <summary>Hidden</summary>\n[Tooltip(\"Hidden\")]\nprivate int hidden;\n"
    );
}

#[test]
fn test_serialize_field_attribute_makes_private_field_eligible() {
    let input = "    /// <summary>Speed</summary>\n    [SerializeField]\n    private float speed = 2f;\n";
    let result = run(input, CommentKind::all());
    assert!(result.modified);
    assert_eq!(
        result.text,
        "    /// <summary>Speed</summary>\n    [SerializeField]\n    [Tooltip(\"Speed\")]\n    private float speed = 2f;\n"
    );
}

#[test]
fn test_replacement_removes_old_tooltip() {
    let input = "/// <summary>New</summary>\n[Tooltip(\"Old\")]\npublic int a;\n";
    let result = run(input, CommentKind::SINGLE_LINE_DOCUMENTATION);
    assert!(result.modified);
    assert_eq!(
        result.text,
        "/// <summary>New</summary>\n[Tooltip(\"New\")]\npublic int a;\n"
    );
}

#[test]
fn test_replacement_moves_tooltip_directly_above_field() {
    let input = "    /// <summary>New text</summary>\n    [Tooltip(\"Old text\")]\n    [SerializeField]\n    private int count;\n";
    let result = run(input, CommentKind::all());
    assert!(result.modified);
    assert_eq!(
        result.text,
        "    /// <summary>New text</summary>\n    [SerializeField]\n    [Tooltip(\"New text\")]\n    private int count;\n"
    );
    assert!(!result.text.contains("Old text"));
    assert_eq!(result.text.matches("Tooltip(").count(), 1);
}

#[test]
fn test_replacement_of_escaped_content() {
    let input = "/// <summary>say \"bye\"</summary>\n[Tooltip(\"say \\\"hi\\\"\")]\npublic int s;\n";
    let result = run(input, CommentKind::SINGLE_LINE_DOCUMENTATION);
    assert!(result.modified);
    assert_eq!(
        result.text,
        "/// <summary>say \"bye\"</summary>\n[Tooltip(\"say \\\"bye\\\"\")]\npublic int s;\n"
    );
}

#[test]
fn test_running_offset_across_several_fields() {
    let input = "\
/// <summary>A</summary>
[Tooltip(\"old a that is long\")]
public int a;
/// <summary>B</summary>
public int b;
/// <summary>C</summary>
[Tooltip(\"C\")]
public int c;
/// <summary>D</summary>
[Tooltip(\"x\")]
public int d;
";
    let expected = "\
/// <summary>A</summary>
[Tooltip(\"A\")]
public int a;
/// <summary>B</summary>
[Tooltip(\"B\")]
public int b;
/// <summary>C</summary>
[Tooltip(\"C\")]
public int c;
/// <summary>D</summary>
[Tooltip(\"D\")]
public int d;
";
    let result = run(input, CommentKind::SINGLE_LINE_DOCUMENTATION);
    assert_eq!(result.annotations, 3);
    assert_eq!(result.text, expected);
}

#[test]
fn test_multi_line_summary_is_escaped_on_one_line() {
    let input = "\
    /// <summary>
    /// First line
    /// Second \"quoted\" line
    /// </summary>
    public string label;
";
    let result = run(input, CommentKind::SINGLE_LINE_DOCUMENTATION);
    assert!(result.modified);
    assert!(result
        .text
        .contains("    [Tooltip(\"First line\\nSecond \\\"quoted\\\" line\")]\n    public string label;"));

    let again = run(&result.text, CommentKind::SINGLE_LINE_DOCUMENTATION);
    assert!(!again.modified);
    assert_eq!(again.text, result.text);
}

#[test]
fn test_delimited_documentation() {
    let input = "\
    /** <summary>
     * Delimited text
     * </summary>
     */
    public float ratio;
";
    let result = run(input, CommentKind::DELIMITED_DOCUMENTATION);
    assert!(result.modified);
    assert_eq!(
        result.text,
        "\
    /** <summary>
     * Delimited text
     * </summary>
     */
    [Tooltip(\"Delimited text\")]
    public float ratio;
"
    );
}

#[test]
fn test_delimited_documentation_on_one_line() {
    let input = "/** <summary>Inline</summary> */\npublic int x;\n";
    let result = run(input, CommentKind::DELIMITED_DOCUMENTATION);
    assert_eq!(
        result.text,
        "/** <summary>Inline</summary> */\n[Tooltip(\"Inline\")]\npublic int x;\n"
    );
}

#[test]
fn test_plain_single_line_comments() {
    let input = "    // Plain comment\n    public int plain;\n// a\n// b\npublic int c;\n";
    let result = run(input, CommentKind::SINGLE_LINE);
    assert_eq!(result.annotations, 2);
    assert_eq!(
        result.text,
        "    // Plain comment\n    [Tooltip(\"Plain comment\")]\n    public int plain;\n// a\n// b\n[Tooltip(\"a\\nb\")]\npublic int c;\n"
    );
}

#[test]
fn test_kinds_select_rules() {
    let plain = "// Plain comment\npublic int plain;\n";
    assert!(!run(plain, CommentKind::SINGLE_LINE_DOCUMENTATION).modified);
    assert!(!run(plain, CommentKind::DELIMITED_DOCUMENTATION).modified);
    assert!(run(plain, CommentKind::SINGLE_LINE).modified);

    let documented = "/// <summary>Doc</summary>\npublic int documented;\n";
    assert!(!run(documented, CommentKind::SINGLE_LINE).modified);
    assert!(run(documented, CommentKind::SINGLE_LINE_DOCUMENTATION).modified);
}

#[test]
fn test_all_kinds_on_mixed_file_is_idempotent() {
    let input = "\
using UnityEngine;

public class Player : MonoBehaviour
{
    /// <summary>
    /// Maximum health.
    /// </summary>
    public int maxHealth = 100;

    /** <summary>Run speed, in m/s.</summary> */
    [SerializeField]
    private float runSpeed;

    // Shown in the \"Debug\" panel
    [Header(\"Debug [dev]\")]
    public bool verbose;

    // Not serialized
    private int counter;

    /// <summary>Not a field</summary>
    public void Jump() { }
}
";
    let first = run(input, CommentKind::all());
    assert!(first.modified);
    assert_eq!(first.annotations, 3);
    assert!(first.text.contains("    [Tooltip(\"Maximum health.\")]\n    public int maxHealth = 100;"));
    assert!(first
        .text
        .contains("    [SerializeField]\n    [Tooltip(\"Run speed, in m/s.\")]\n    private float runSpeed;"));
    assert!(first
        .text
        .contains("    [Header(\"Debug [dev]\")]\n    [Tooltip(\"Shown in the \\\"Debug\\\" panel\")]\n    public bool verbose;"));
    assert!(!first.text.contains("Not serialized\")]"));
    assert!(!first.text.contains("Not a field\")]"));

    let second = run(&first.text, CommentKind::all());
    assert!(!second.modified);
    assert_eq!(second.text, first.text);
}

#[test]
fn test_escaping_round_trip() {
    let comment = "C:\\path\tend \"q\"";
    let input = format!("// {comment}\npublic int e;\n");
    let result = run(&input, CommentKind::SINGLE_LINE);
    let start = result.text.find("[Tooltip(\"").unwrap() + "[Tooltip(\"".len();
    let end = result.text.find("\")]").unwrap();
    let embedded = &result.text[start..end];
    assert!(!embedded.contains('\t'));
    assert_eq!(unescape(embedded), comment);
}

#[test]
fn test_crlf_text_with_auto_line_ending() {
    let processor = TextProcessor::with_options(ProcessorOptions {
        line_ending: LineEnding::Auto,
        ..Default::default()
    });
    let input = "/// <summary>\r\n/// W\r\n/// </summary>\r\npublic int w;\r\n";
    let result = processor.process(input, CommentKind::all()).unwrap();
    assert_eq!(
        result.text,
        "/// <summary>\r\n/// W\r\n/// </summary>\r\n[Tooltip(\"W\")]\r\npublic int w;\r\n"
    );
}

#[test]
fn test_qualified_style() {
    let processor = TextProcessor::with_options(ProcessorOptions {
        style: AnnotationStyle::Qualified,
        line_ending: LineEnding::Lf,
        ..Default::default()
    });
    let input = "/// <summary>Q</summary>\npublic int q;\n";
    let result = processor.process(input, CommentKind::all()).unwrap();
    assert_eq!(
        result.text,
        "/// <summary>Q</summary>\n[UnityEngine.Tooltip(\"Q\")]\npublic int q;\n"
    );
}

#[test]
fn test_unrecognized_tooltip_shape_is_left_alone() {
    let input = "/// <summary>Z</summary>\n[Tooltip(\"a\", order = 1)]\npublic int z;\n";
    let result = run(input, CommentKind::all());
    assert!(!result.modified);
    assert_eq!(result.text, input);
}

#[test]
fn test_non_fields_are_ignored() {
    let input = "\
/// <summary>M</summary>
public void Run() { }
/// <summary>P</summary>
public int P => 1;
/// <summary>C</summary>
public class Nested
{
}
";
    let result = run(input, CommentKind::all());
    assert!(!result.modified);
    assert_eq!(result.text, input);
}

#[test]
fn test_empty_summary_adds_nothing() {
    let input = "/// <summary></summary>\npublic int blank;\n";
    let result = run(input, CommentKind::all());
    assert!(!result.modified);
}

#[test]
fn test_processor_is_shared_across_threads() {
    let processor = lf_processor();
    let inputs: Vec<String> = (0..8)
        .map(|i| format!("/// <summary>Field {i}</summary>\npublic int f{i};\n"))
        .collect();
    std::thread::scope(|scope| {
        for (i, input) in inputs.iter().enumerate() {
            let processor = &processor;
            scope.spawn(move || {
                let result = processor.process(input, CommentKind::all()).unwrap();
                assert!(result.text.contains(&format!("[Tooltip(\"Field {i}\")]")));
            });
        }
    });
}
