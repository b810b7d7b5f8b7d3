//! Prompt templates for the four agents.

/// Asks for 2–3 research topics as a bare comma-separated list.
pub fn topic_extraction(document: &str) -> String {
    format!(
        "You are a research assistant. Analyze this PRD and extract 2-3 key topics or requirements that need research.\n\
         Return ONLY the topics as a comma-separated list, nothing else.\n\
         \n\
         PRD: {document}"
    )
}

/// Asks for an 800–1000 word blog post grounded in `research`.
pub fn writer(document: &str, research: &str) -> String {
    format!(
        "You are a blog writer. Based on this PRD: {document}\n\
         \n\
         And these research findings: {research}\n\
         \n\
         Write a comprehensive blog post (800-1000 words) that covers the key points. \
         Include facts from the research with inline references. \
         Make it engaging and well-structured with clear sections."
    )
}

/// Asks for the draft's unsupported claims, or `PASS`.
pub fn fact_check(draft: &str, research: &str) -> String {
    format!(
        "You are a fact-checker. Compare this draft: {draft}\n\
         \n\
         Against these sources: {research}\n\
         \n\
         List any claims in the draft that are NOT supported by the sources. \
         If everything checks out, respond with 'PASS'. \
         Otherwise, list the unsupported claims as bullet points."
    )
}

/// Asks for a style polish that leaves facts untouched.
pub fn polish(draft: &str) -> String {
    format!(
        "You are a style editor. Polish this blog post for clarity, engagement, and professional tone. \
         Fix any grammar issues. Do NOT change factual content:\n\
         \n\
         {draft}"
    )
}
