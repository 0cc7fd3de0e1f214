//! "Did you mean" matching for mistyped command names.

/// Largest edit distance accepted for any token.
const MAX_DISTANCE: usize = 3;

/// Candidates close to `token`, closest first.
///
/// A candidate is close when its Levenshtein distance to `token` is at most
/// half the token length (at least 1, at most `MAX_DISTANCE`). Equal
/// distances keep the order of `candidates`.
pub fn suggest<S: AsRef<str>>(token: &str, candidates: &[S]) -> Vec<String> {
    if token.is_empty() {
        return Vec::new();
    }

    let threshold = (token.chars().count() / 2).clamp(1, MAX_DISTANCE);
    let mut matches: Vec<(usize, &str)> = candidates
        .iter()
        .map(|candidate| candidate.as_ref())
        .map(|candidate| (edit_distance(token, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .collect();

    // stable: ties stay in candidate order
    matches.sort_by_key(|(distance, _)| *distance);
    matches.into_iter().map(|(_, c)| c.to_string()).collect()
}

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILTINS: [&str; 4] = ["help", "clear", "exit", "usage"];

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("cler", "clear"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("héllo", "hello"), 1);
    }

    #[test]
    fn test_suggests_missing_letter() {
        assert_eq!(suggest("cler", &BUILTINS), vec!["clear"]);
    }

    #[test]
    fn test_suggests_transposition() {
        assert_eq!(suggest("ehlp", &BUILTINS), vec!["help"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(suggest("deploy", &BUILTINS).is_empty());
        assert!(suggest("", &BUILTINS).is_empty());
        assert!(suggest("say", &[] as &[&str]).is_empty());
    }

    #[test]
    fn test_closest_first_then_input_order() {
        let candidates = ["sat", "say", "s", "says"];
        // "sa" has threshold 1: "sat", "say", "s" are all at distance 1
        assert_eq!(suggest("sa", &candidates), vec!["sat", "say", "s"]);

        let candidates = ["stop", "start", "stat"];
        assert_eq!(suggest("stat", &candidates), vec!["stat", "start", "stop"]);
    }

    #[test]
    fn test_deterministic() {
        let candidates = vec!["help".to_string(), "hello".to_string(), "helm".to_string()];
        let first = suggest("hepl", &candidates);
        for _ in 0..10 {
            assert_eq!(suggest("hepl", &candidates), first);
        }
    }
}
