//! Fact-check verdict parsing and revision feedback.

use crate::FactCheckResult;

/// Token the fact-checker replies with when every claim is supported.
pub const PASS_TOKEN: &str = "PASS";

/// Separator spliced between the research and revision feedback.
pub const REVISION_FEEDBACK_MARKER: &str = "\n\nREVISION FEEDBACK: ";

const BULLETS: [char; 3] = ['-', '*', '•'];

/// Parses the fact-checker's free-text reply.
///
/// Any case-insensitive occurrence of `PASS` is a pass. Otherwise each
/// non-blank line that does not mention `PASS` becomes an issue, with one
/// leading bullet and surrounding whitespace removed.
pub fn parse_verdict(response: &str) -> FactCheckResult {
    if mentions_pass(response) {
        return FactCheckResult::pass();
    }

    let issues = response
        .lines()
        .filter(|line| !line.trim().is_empty() && !mentions_pass(line))
        .map(|line| {
            let line = line.trim();
            line.strip_prefix(&BULLETS[..]).unwrap_or(line).trim().to_string()
        })
        .filter(|issue| !issue.is_empty())
        .collect();

    FactCheckResult::fail(issues)
}

fn mentions_pass(text: &str) -> bool {
    text.to_uppercase().contains(PASS_TOKEN)
}

/// Feedback handed to the writer for a revision.
pub fn revision_feedback(issues: &[String]) -> String {
    format!(
        "The fact-checker found these issues: {}. Please revise the draft to address them.",
        issues.join(", ")
    )
}

/// Research text with revision feedback appended, as given to the writer.
pub fn research_with_feedback(research: &str, feedback: &str) -> String {
    format!("{research}{REVISION_FEEDBACK_MARKER}{feedback}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_in_any_case() {
        assert_eq!(parse_verdict("PASS"), FactCheckResult::pass());
        assert_eq!(parse_verdict("pass"), FactCheckResult::pass());
        assert_eq!(
            parse_verdict("Everything checks out.\nResult: Pass."),
            FactCheckResult::pass()
        );
    }

    #[test]
    fn test_bullet_list_becomes_issues() {
        let verdict = parse_verdict("- Claim A is unsupported\n- Claim B needs a source");
        assert_eq!(
            verdict,
            FactCheckResult::fail(vec![
                "Claim A is unsupported".to_string(),
                "Claim B needs a source".to_string(),
            ])
        );
    }

    #[test]
    fn test_mixed_markers_and_blank_lines() {
        let verdict = parse_verdict("\n* first\n\n  • second  \nthird\n-\n");
        assert!(!verdict.passed);
        assert_eq!(verdict.issues, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_only_one_marker_is_stripped() {
        let verdict = parse_verdict("- -5% growth is not cited");
        assert_eq!(verdict.issues, vec!["-5% growth is not cited"]);
    }

    #[test]
    fn test_empty_reply_fails_without_issues() {
        assert_eq!(parse_verdict(""), FactCheckResult::fail(Vec::new()));
    }

    #[test]
    fn test_revision_feedback_joins_issues() {
        let feedback = revision_feedback(&["A".to_string(), "B".to_string()]);
        assert_eq!(
            feedback,
            "The fact-checker found these issues: A, B. Please revise the draft to address them."
        );
        assert_eq!(
            research_with_feedback("R", &feedback),
            format!("R\n\nREVISION FEEDBACK: {feedback}")
        );
    }
}
