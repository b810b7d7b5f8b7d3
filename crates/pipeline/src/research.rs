//! Research rules: topic extraction parsing and research document formatting.

use crate::Topic;

/// Maximum number of topics researched per document.
pub const MAX_TOPICS: usize = 3;

/// Snippets retrieved for one topic, in retrieval order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFindings {
    /// The topic that was searched.
    pub topic: Topic,
    /// Result snippets returned by the search.
    pub snippets: Vec<String>,
}

/// Parses the model's comma-separated topic list.
///
/// Entries are trimmed, empty entries dropped, and the list truncated to
/// [`MAX_TOPICS`]. An empty return means no usable topic was found.
pub fn parse_topics(response: &str) -> Vec<Topic> {
    response
        .split(',')
        .filter_map(|t| Topic::new(t.trim()))
        .take(MAX_TOPICS)
        .collect()
}

/// Renders the research document handed to the writer and fact-checker.
///
/// Topic and snippet order is preserved exactly; facts are numbered from 1
/// within each topic.
pub fn format_research(findings: &[TopicFindings]) -> String {
    let mut out = String::from("Research findings:\n\n");
    for TopicFindings { topic, snippets } in findings {
        out.push_str(&format!("Topic: {topic}\n"));
        for (index, snippet) in snippets.iter().enumerate() {
            out.push_str(&format!(
                "\n[Fact {}]\n{snippet}\nSource: Web search result for \"{topic}\"\n",
                index + 1
            ));
        }
        out.push_str("\n---\n\n");
    }
    out
}
