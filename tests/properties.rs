use std::collections::BTreeMap;

use proptest::prelude::*;

use seqmatch::manacher;
use seqmatch::{
    add_bold_tag, rolling_hash_search, rolling_hash_search_by_key, AhoCorasick, Highlighter, Kmp,
    RollingHashConfig, RollingHashMatcher, SequenceMatcher, ZAlgorithm,
};

// Small alphabet so that matches and overlaps are common.
fn small_text(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(b'a'..=b'c', 0..=max_len)
}

fn pattern_set() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(b'a'..=b'c', 1..=5), 0..8)
}

prop_compose! {
    fn patterns_and_text(max_len: usize)(patterns in pattern_set(), text in small_text(max_len)) -> (Vec<Vec<u8>>, Vec<u8>) {
        (patterns, text)
    }
}

fn brute_force(pattern: &[u8], text: &[u8]) -> Vec<usize> {
    if pattern.is_empty() {
        return (0..text.len()).collect();
    }
    if pattern.len() > text.len() {
        return Vec::new();
    }
    (0..=text.len() - pattern.len()).filter(|&i| &text[i..i + pattern.len()] == pattern).collect()
}

fn kmp_per_pattern(patterns: &[Vec<u8>], text: &[u8]) -> BTreeMap<usize, Vec<usize>> {
    patterns
        .iter()
        .enumerate()
        .filter_map(|(id, p)| {
            let found = Kmp::new(p.iter().copied()).find_starts(text);
            (!found.is_empty()).then_some((id, found))
        })
        .collect()
}

// Parse tagged output back into (plain text, spans).
fn strip_markers(tagged: &str) -> (String, Vec<(usize, usize)>) {
    let mut plain = String::new();
    let mut spans = Vec::new();
    let mut rest = tagged;
    while let Some(open) = rest.find("<b>") {
        plain.push_str(&rest[..open]);
        rest = &rest[open + 3..];
        let close = rest.find("</b>").expect("unclosed marker");
        let start = plain.len();
        plain.push_str(&rest[..close]);
        spans.push((start, plain.len()));
        rest = &rest[close + 4..];
    }
    assert!(!rest.contains("</b>"), "stray close marker");
    plain.push_str(rest);
    (plain, spans)
}

fn brute_radius(s: &[u8], i: usize) -> usize {
    let mut r = 0;
    while i >= r + 1 && i + r + 1 < s.len() && s[i - r - 1] == s[i + r + 1] {
        r += 1;
    }
    r
}

fn is_palindrome(s: &[u8]) -> bool {
    s.iter().eq(s.iter().rev())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn single_pattern_matchers_agree_with_brute_force(pattern in small_text(4), text in small_text(40)) {
        let expected = brute_force(&pattern, &text);

        let kmp = Kmp::new(pattern.iter().copied());
        let z = ZAlgorithm::new(pattern.iter().copied());
        let rh = RollingHashMatcher::new(pattern.iter().copied(), RollingHashConfig::default());
        prop_assert_eq!(kmp.find_starts(&text), expected.clone());
        prop_assert_eq!(z.find_starts(&text), expected.clone());
        prop_assert_eq!(rh.find_starts(&text), expected.clone());
        // streamed input gives the same answer
        prop_assert_eq!(kmp.find_iter(text.iter().copied()).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn aho_corasick_agrees_with_kmp((patterns, text) in patterns_and_text(60)) {
        let ac = AhoCorasick::new(patterns.iter().cloned());
        let expected = kmp_per_pattern(&patterns, &text);
        prop_assert_eq!(ac.search(&text), expected.clone());

        let rolling = rolling_hash_search(&text, &patterns, &RollingHashConfig::default());
        prop_assert_eq!(rolling, expected);
    }

    #[test]
    fn keyed_rolling_hash_agrees_with_kmp((patterns, text) in patterns_and_text(60)) {
        // a coarse key: 'a' and 'b' hash alike, so verification does the work
        let coarse = |b: &u8| (*b == b'c') as u64;
        let found = rolling_hash_search_by_key(&text, &patterns, &RollingHashConfig::default(), coarse);
        prop_assert_eq!(found, kmp_per_pattern(&patterns, &text));
    }

    #[test]
    fn end_indices_and_lengths_are_consistent_with_search((patterns, text) in patterns_and_text(60)) {
        let ac = AhoCorasick::new(patterns.iter().cloned());
        let found = ac.search(&text);

        let ends: Vec<(usize, Vec<usize>)> = ac.search_end_indices(&text).collect();
        let lengths: Vec<Vec<usize>> = ac.search_lengths(&text).collect();
        prop_assert_eq!(ends.len(), text.len());
        prop_assert_eq!(lengths.len(), text.len());

        for (i, ids) in &ends {
            let mut want_ids = Vec::new();
            let mut want_lens = Vec::new();
            for (&id, starts) in &found {
                let len = patterns[id].len();
                if len <= i + 1 && starts.contains(&(i + 1 - len)) {
                    want_ids.push(id);
                    want_lens.push(len);
                }
            }
            want_lens.sort_unstable();
            want_lens.dedup();
            prop_assert_eq!(ids, &want_ids);
            prop_assert_eq!(&lengths[*i], &want_lens);
        }
    }

    #[test]
    fn search_all_matches_individual_searches(
        patterns in pattern_set(),
        texts in prop::collection::vec(small_text(50), 0..20),
    ) {
        let ac = AhoCorasick::new(patterns.iter().cloned());
        let all = ac.search_all(&texts);
        prop_assert_eq!(all.len(), texts.len());
        for (text, found) in texts.iter().zip(all) {
            prop_assert_eq!(found, ac.search(text));
        }
    }

    #[test]
    fn bold_tags_round_trip_and_are_maximal((patterns, bytes) in patterns_and_text(40)) {
        let words: Vec<String> = patterns.iter().map(|p| String::from_utf8_lossy(p).into_owned()).collect();
        let text = String::from_utf8(bytes).unwrap();
        let tagged = add_bold_tag(&text, &words);

        let (plain, spans) = strip_markers(&tagged);
        prop_assert_eq!(&plain, &text);
        for pair in spans.windows(2) {
            prop_assert!(pair[0].1 < pair[1].0, "spans touch: {:?} in {:?}", spans, tagged);
        }

        // every covered position is inside some word occurrence and vice versa
        let mut covered = vec![false; text.len()];
        for (id, starts) in AhoCorasick::new(patterns.iter().cloned()).search(text.as_bytes()) {
            for s in starts {
                covered[s..s + patterns[id].len()].iter_mut().for_each(|c| *c = true);
            }
        }
        let mut tagged_cover = vec![false; text.len()];
        for &(s, e) in &spans {
            prop_assert!(s < e);
            tagged_cover[s..e].iter_mut().for_each(|c| *c = true);
        }
        prop_assert_eq!(covered, tagged_cover);
    }

    #[test]
    fn manacher_agrees_with_brute_force(text in small_text(30)) {
        let radii = manacher::radii(&text);
        for (i, &r) in radii.iter().enumerate() {
            prop_assert_eq!(r, brute_radius(&text, i), "center {} of {:?}", i, text);
        }

        let mut count = 0;
        let mut best = 0;
        for i in 0..text.len() {
            for j in i + 1..=text.len() {
                if is_palindrome(&text[i..j]) {
                    count += 1;
                    best = best.max(j - i);
                }
            }
        }
        prop_assert_eq!(manacher::count_palindromic_substrings(&text), count);
        for span in manacher::longest_palindromic_spans(&text) {
            prop_assert_eq!(span.len(), best);
            prop_assert!(is_palindrome(&text[span]));
        }
    }
}

#[test]
fn highlighter_spans_match_tagged_output() {
    let h = Highlighter::new(["he", "she", "hers", "his"]);
    assert_eq!(h.spans("ahishers"), vec![1..8]);
    assert_eq!(h.highlight("ahishers"), "a<b>hishers</b>");
}
