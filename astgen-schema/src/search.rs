//! Fuzzy name suggestions for schema diagnostics

use strsim::levenshtein;

/// A fuzzy match suggestion with candidate name and edit distance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub candidate: String,
    pub distance: usize,
}

/// Suggest similar names from a list of candidates.
///
/// Case-insensitive matches rank first (distance 0), substring matches next
/// (distance 1), then Levenshtein matches up to `max_distance`. Exact
/// matches are excluded — the caller already knows the name failed to
/// resolve for a different reason.
pub fn suggest_similar(name: &str, candidates: &[&str], max_distance: usize) -> Vec<Suggestion> {
    let name_lower = name.to_lowercase();

    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .filter(|&&candidate| candidate != name)
        .filter_map(|&candidate| {
            let candidate_lower = candidate.to_lowercase();
            let distance = if candidate_lower == name_lower {
                0
            } else if candidate_lower.contains(&name_lower) || name_lower.contains(&candidate_lower)
            {
                1
            } else {
                let dist = levenshtein(name, candidate);
                if dist > max_distance {
                    return None;
                }
                dist
            };
            Some(Suggestion {
                candidate: candidate.to_string(),
                distance,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| a.distance.cmp(&b.distance).then(a.candidate.cmp(&b.candidate)));
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions_ranked_by_distance() {
        let candidates = ["statements", "parameters", "body"];
        let suggestions = suggest_similar("statement", &candidates, 2);

        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0].candidate, "statements");
    }

    #[test]
    fn test_case_insensitive_match_ranks_first() {
        let candidates = ["Statements", "statement"];
        let suggestions = suggest_similar("statements", &candidates, 2);
        assert_eq!(suggestions[0].candidate, "Statements");
        assert_eq!(suggestions[0].distance, 0);
    }

    #[test]
    fn test_distant_names_are_dropped() {
        let suggestions = suggest_similar("lhs", &["parameters"], 2);
        assert!(suggestions.is_empty());
    }
}
