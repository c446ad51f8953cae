//! Turning oracle logprobs into accept/reject decisions

use crate::error::OracleError;
use crate::prompt::parse_candidate_token;
use crate::types::ScoreResponse;
use std::collections::HashMap;

/// Logprob of each candidate whose label made it into the final top-K.
///
/// Candidates outside the top-K are absent. If several surface forms of the
/// same label appear (e.g. "1" and " 1"), the most likely one wins.
pub fn extract_candidate_logprobs(
    response: &ScoreResponse,
    num_candidates: usize,
) -> Result<HashMap<usize, f64>, OracleError> {
    let last = response
        .top_logprobs
        .last()
        .ok_or_else(|| OracleError::MalformedResponse("no top logprobs returned".to_string()))?;

    let mut selections: HashMap<usize, f64> = HashMap::new();
    for (token, &logprob) in last.iter().flatten() {
        if let Some(idx) = parse_candidate_token(token, num_candidates) {
            selections
                .entry(idx)
                .and_modify(|best| *best = best.max(logprob))
                .or_insert(logprob);
        }
    }
    Ok(selections)
}

/// Logprob of the token actually present at the final position
pub fn baseline_logprob(response: &ScoreResponse) -> Result<f64, OracleError> {
    response
        .token_logprobs
        .last()
        .copied()
        .flatten()
        .ok_or_else(|| OracleError::MalformedResponse("no logprob for final token".to_string()))
}

/// Candidates whose logprob strictly beats the baseline, in original order
pub fn decide<T: Clone>(
    candidate_logprobs: &HashMap<usize, f64>,
    baseline: f64,
    candidates: &[T],
) -> Vec<T> {
    candidates
        .iter()
        .enumerate()
        .filter(|(idx, _)| candidate_logprobs.get(idx).is_some_and(|&lp| lp > baseline))
        .map(|(_, c)| c.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(baseline: f64, alternatives: &[(&str, f64)]) -> ScoreResponse {
        ScoreResponse::final_position(
            " none",
            baseline,
            alternatives.iter().map(|(t, lp)| (t.to_string(), *lp)).collect(),
        )
    }

    #[test]
    fn test_decision_threshold() {
        let candidates = vec!["first".to_string(), "second".to_string()];
        let logprobs = HashMap::from([(0, -1.0), (1, -3.0)]);

        assert_eq!(decide(&logprobs, -2.0, &candidates), vec!["first".to_string()]);
    }

    #[test]
    fn test_ties_rejected() {
        let logprobs = HashMap::from([(0, -2.0)]);
        assert!(decide(&logprobs, -2.0, &["a"]).is_empty());
    }

    #[test]
    fn test_absent_candidates_rejected() {
        let logprobs = HashMap::from([(2, -0.1)]);
        assert_eq!(decide(&logprobs, -5.0, &["a", "b", "c"]), vec!["c"]);
    }

    #[test]
    fn test_decide_preserves_order() {
        let logprobs = HashMap::from([(2, -0.5), (0, -0.9), (1, -0.7)]);
        assert_eq!(decide(&logprobs, -1.0, &["a", "b", "c"]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extract_maps_labels_to_indices() {
        let resp = response(-0.3, &[(" none", -0.3), (" 1", -1.2), (" 3", -2.5), (" 7", -4.0)]);
        let logprobs = extract_candidate_logprobs(&resp, 3).unwrap();

        assert_eq!(logprobs.len(), 2);
        assert_eq!(logprobs[&0], -1.2);
        assert_eq!(logprobs[&2], -2.5);
        assert_eq!(baseline_logprob(&resp).unwrap(), -0.3);
    }

    #[test]
    fn test_extract_keeps_most_likely_surface_form() {
        let resp = response(-0.3, &[(" 2", -1.5), ("2", -0.9)]);
        let logprobs = extract_candidate_logprobs(&resp, 2).unwrap();
        assert_eq!(logprobs[&1], -0.9);
    }

    #[test]
    fn test_missing_final_position_is_malformed() {
        let empty = ScoreResponse::default();
        assert!(matches!(
            extract_candidate_logprobs(&empty, 2),
            Err(OracleError::MalformedResponse(_))
        ));
        assert!(matches!(baseline_logprob(&empty), Err(OracleError::MalformedResponse(_))));
    }

    #[test]
    fn test_null_final_alternatives_select_nothing() {
        let resp = ScoreResponse {
            tokens: vec!["x".to_string()],
            token_logprobs: vec![Some(-1.0)],
            top_logprobs: vec![None],
        };
        assert!(extract_candidate_logprobs(&resp, 2).unwrap().is_empty());
    }
}
