//! Selection prompt rendering

use crate::types::Passage;

/// Label the oracle scores when no remaining candidate qualifies
pub const NONE_TOKEN: &str = "none";

/// Label for the candidate at 0-based `index`
pub fn candidate_token(index: usize) -> String {
    (index + 1).to_string()
}

/// Map a top-K token back to a 0-based candidate index
pub fn parse_candidate_token(token: &str, num_candidates: usize) -> Option<usize> {
    let label: usize = token.trim().parse().ok()?;
    (1..=num_candidates).contains(&label).then(|| label - 1)
}

/// Render the question, accepted context and enumerated candidates.
///
/// The prompt ends with the none label, so its echoed logprob is the
/// baseline and the alternatives at that position score each candidate.
pub fn build_selection_prompt(
    question: &str,
    existing: &[Passage],
    candidates: &[Passage],
) -> String {
    let mut prompt = String::new();

    prompt.push_str("We are selecting passages from a document that help answer a question.\n\n");
    prompt.push_str(&format!("Question: {}\n\n", question.trim()));

    prompt.push_str("Passages already selected:\n");
    if existing.is_empty() {
        prompt.push_str("(none yet)\n");
    } else {
        for passage in existing {
            prompt.push_str(&format!("---\n{}\n", passage.trim()));
        }
        prompt.push_str("---\n");
    }

    prompt.push_str("\nCandidate passages:\n");
    for (idx, passage) in candidates.iter().enumerate() {
        prompt.push_str(&format!("Passage {}: {}\n", candidate_token(idx), passage.trim()));
    }

    prompt.push_str(&format!(
        "\nAnswer with the number of the next passage to select, \
         or \"{}\" if none of the candidates help answer the question.\n",
        NONE_TOKEN
    ));
    prompt.push_str(&format!("Next passage: {}", NONE_TOKEN));
    prompt
}
