//! Subsequence matching of free-text queries against ticker names.

use crate::Ticker;

const FIRST_CHAR_BONUS: i32 = 10;
const SEPARATOR_BONUS: i32 = 20;
/// Per-character bonus inside a contiguous run; the k-th adjacent match earns `k` times this.
const ADJACENCY_BONUS: i32 = 5;
const LEADING_GAP_PENALTY: i32 = 5;
const MAX_LEADING_GAP_PENALTY: i32 = 15;
const UNMATCHED_CHAR_PENALTY: i32 = 1;

/// Ranks catalog entries whose name contains `query` as a subsequence.
///
/// Best match first. Equal scores keep catalog order. An empty query matches
/// nothing. The result is not truncated.
pub fn find_tickers(catalog: &[Ticker], query: &str) -> Vec<Ticker> {
    let query: Vec<char> = query.chars().map(|c| c.to_ascii_lowercase()).collect();
    if query.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(i32, &Ticker)> = catalog
        .iter()
        .filter_map(|ticker| score_chars(&ticker.name, &query).map(|score| (score, ticker)))
        .collect();

    // `sort_by` is stable, which is what keeps ties in catalog order.
    scored.sort_by(|left, right| right.0.cmp(&left.0));
    scored.into_iter().map(|(_, ticker)| ticker.clone()).collect()
}

/// Match score of `query` against `name`, `None` when it is not a subsequence.
pub fn score(name: &str, query: &str) -> Option<i32> {
    let query: Vec<char> = query.chars().map(|c| c.to_ascii_lowercase()).collect();
    if query.is_empty() {
        return None;
    }
    score_chars(name, &query)
}

fn score_chars(name: &str, query: &[char]) -> Option<i32> {
    let name: Vec<char> = name.chars().map(|c| c.to_ascii_lowercase()).collect();
    if query.len() > name.len() {
        return None;
    }

    let first = query[0];
    name.iter()
        .enumerate()
        .filter(|(_, &c)| c == first)
        .filter_map(|(start, _)| align_from(&name, query, start))
        .max()
}

/// Greedy alignment starting with `query[0]` at `name[start]`.
fn align_from(name: &[char], query: &[char], start: usize) -> Option<i32> {
    let mut score = position_bonus(name, start);
    let mut previous = start;
    let mut run = 0;

    for &wanted in &query[1..] {
        let offset = name[previous + 1..].iter().position(|&c| c == wanted)?;
        let index = previous + 1 + offset;
        if offset == 0 {
            run += 1;
            score = score.saturating_add(run * ADJACENCY_BONUS);
        } else {
            run = 0;
        }
        score += position_bonus(name, index);
        previous = index;
    }

    let leading_gap = i32::try_from(start).unwrap_or(i32::MAX);
    score -= leading_gap
        .saturating_mul(LEADING_GAP_PENALTY)
        .min(MAX_LEADING_GAP_PENALTY);

    let unmatched = i32::try_from(name.len() - query.len()).unwrap_or(i32::MAX);
    Some(score.saturating_sub(unmatched.saturating_mul(UNMATCHED_CHAR_PENALTY)))
}

fn position_bonus(name: &[char], index: usize) -> i32 {
    if index == 0 {
        FIRST_CHAR_BONUS
    } else if is_separator(name[index - 1]) {
        SEPARATOR_BONUS
    } else {
        0
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '_' | '-' | '.' | '(' | '/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Market;

    fn sample_catalog() -> Vec<Ticker> {
        [
            ("005930", "삼성전자"),
            ("005935", "삼성전자우"),
            ("006400", "삼성SDI"),
            ("010140", "삼성중공업"),
            ("009150", "삼성전기"),
            ("035720", "카카오"),
        ]
        .into_iter()
        .map(|(code, name)| Ticker::new(code, name, Market::Kospi))
        .collect()
    }

    fn names(tickers: &[Ticker]) -> Vec<&str> {
        tickers.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn exact_name_matches_only_itself() {
        let results = find_tickers(&sample_catalog(), "카카오");
        assert_eq!(names(&results), vec!["카카오"]);
    }

    #[test]
    fn abbreviation_prefers_shorter_names_then_catalog_order() {
        let results = find_tickers(&sample_catalog(), "삼전");
        assert_eq!(names(&results), vec!["삼성전자", "삼성전기", "삼성전자우"]);
    }

    #[test]
    fn empty_or_unmatched_queries_return_nothing() {
        assert!(find_tickers(&sample_catalog(), "").is_empty());
        assert!(find_tickers(&sample_catalog(), "ZZZ").is_empty());
        assert!(find_tickers(&[], "삼성").is_empty());
    }

    #[test]
    fn ascii_letters_match_case_insensitively() {
        let results = find_tickers(&sample_catalog(), "sdi");
        assert_eq!(names(&results), vec!["삼성SDI"]);
    }

    #[test]
    fn contiguous_run_beats_scattered_match() {
        let contiguous = score("KODEX 200", "200").expect("match");
        let scattered = score("2X0Y0Z", "200").expect("match");
        assert!(contiguous > scattered);
    }

    #[test]
    fn word_start_run_outranks_scattered_prefix_match() {
        let catalog = vec![
            Ticker::new("000001", "2차전지100", Market::Kosdaq),
            Ticker::new("069500", "KODEX 200", Market::Kospi),
        ];

        let results = find_tickers(&catalog, "200");

        assert_eq!(names(&results), vec!["KODEX 200", "2차전지100"]);
        assert_eq!(score("KODEX 200", "200"), Some(14));
        assert_eq!(score("2차전지100", "200"), Some(11));
    }

    #[test]
    fn best_alignment_is_chosen_over_first_occurrence() {
        // Starting at the first 'o' scores -11; the word-start "ok" run scores 4.
        assert_eq!(score("xo ab ok", "ok"), Some(4));
    }

    #[test]
    fn word_start_outranks_mid_word_match() {
        let catalog = vec![
            Ticker::new("000001", "ABCTIGER", Market::Kospi),
            Ticker::new("000002", "ABC TIGER", Market::Kospi),
        ];
        let results = find_tickers(&catalog, "tiger");
        assert_eq!(results[0].code, "000002");
    }

    #[test]
    fn query_longer_than_name_does_not_match() {
        assert_eq!(score("카카오", "카카오뱅크"), None);
    }
}
