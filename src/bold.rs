//! Wrap every occurrence of a word set in markers, merging overlaps.
//!
//! Per-pattern ranges are merged first, then unioned across patterns with a
//! min-heap. Touching ranges merge.
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::ops::Range;

use rayon::prelude::*;

use crate::ahocorasick::AhoCorasick;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markers {
    pub open: String,
    pub close: String,
}

impl Default for Markers {
    fn default() -> Self {
        Markers { open: "<b>".to_string(), close: "</b>".to_string() }
    }
}

impl Markers {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Markers { open: open.into(), close: close.into() }
    }
}

/// Merge the occurrences of one pattern of length `len` into disjoint
/// ranges. `starts` must be ascending. Overlapping and touching occurrences
/// are merged; a zero-length pattern covers nothing.
pub fn merge_occurrences(starts: &[usize], len: usize) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    if len == 0 { return ranges; }
    for &start in starts {
        match ranges.last_mut() {
            Some(last) if start <= last.end => last.end = last.end.max(start + len),
            _ => ranges.push(start..start + len),
        }
    }
    ranges
}

/// Union of several ascending lists of disjoint ranges.
///
/// The heap is keyed on (start, larger end first). Each pop pushes the
/// next range from the same list, so the heap holds at most one entry per
/// list.
pub fn union_ranges(lists: &[Vec<Range<usize>>]) -> Vec<Range<usize>> {
    let mut heap: BinaryHeap<Reverse<(usize, Reverse<usize>, usize, usize)>> =
        BinaryHeap::with_capacity(lists.len());
    for (list, ranges) in lists.iter().enumerate() {
        if let Some(r) = ranges.first() {
            heap.push(Reverse((r.start, Reverse(r.end), list, 0)));
        }
    }

    let mut spans: Vec<Range<usize>> = Vec::new();
    let mut active: Option<Range<usize>> = None;
    while let Some(Reverse((start, Reverse(end), list, cursor))) = heap.pop() {
        if let Some(r) = lists[list].get(cursor + 1) {
            heap.push(Reverse((r.start, Reverse(r.end), list, cursor + 1)));
        }
        match active.as_mut() {
            Some(span) if start <= span.end => span.end = span.end.max(end),
            _ => spans.extend(active.replace(start..end)),
        }
    }
    spans.extend(active);
    spans
}

/// Copy `text`, wrapping each span in `markers`. Spans must be ascending,
/// disjoint and lie on char boundaries.
pub fn insert_markers(text: &str, spans: &[Range<usize>], markers: &Markers) -> String {
    let extra = spans.len() * (markers.open.len() + markers.close.len());
    let mut out = String::with_capacity(text.len() + extra);
    let mut last = 0;
    for span in spans {
        out.push_str(&text[last..span.start]);
        out.push_str(&markers.open);
        out.push_str(&text[span.clone()]);
        out.push_str(&markers.close);
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Reusable tagger: the automaton over the words is built once.
#[derive(Clone, Debug)]
pub struct Highlighter {
    ac: AhoCorasick<u8>,
    markers: Markers,
}

impl Highlighter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<Vec<u8>> = words.into_iter().map(|w| w.as_ref().as_bytes().to_vec()).collect();
        log::debug!("highlighter over {} words", words.len());
        Highlighter { ac: AhoCorasick::new(words), markers: Markers::default() }
    }

    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Merged byte ranges of `text` covered by some word.
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        let found = self.ac.search(text.as_bytes());
        let per_word: Vec<Vec<Range<usize>>> = found
            .iter()
            .map(|(&id, starts)| merge_occurrences(starts, self.ac.pattern_len(id)))
            .collect();
        let spans = union_ranges(&per_word);
        log::trace!("{} words matched, {} spans", per_word.len(), spans.len());
        spans
    }

    pub fn highlight(&self, text: &str) -> String {
        let spans = self.spans(text);
        if spans.is_empty() {
            return text.to_string();
        }
        insert_markers(text, &spans, &self.markers)
    }

    /// `highlight` over each text, in parallel when there is more than one.
    pub fn highlight_all<S>(&self, texts: &[S]) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        let tag = |text: &S| self.highlight(text.as_ref());
        if texts.len() > 1 {
            texts.par_iter().map(tag).collect()
        } else {
            texts.iter().map(tag).collect()
        }
    }
}

/// Wrap every occurrence of `words` in `text` with `<b>`/`</b>`.
///
/// ```
/// assert_eq!(
///     seqmatch::add_bold_tag("aaabbcc", &["aaa", "aab", "bc"]),
///     "<b>aaabbc</b>c"
/// );
/// ```
pub fn add_bold_tag<S: AsRef<str>>(text: &str, words: &[S]) -> String {
    if text.is_empty() || words.is_empty() {
        return text.to_string();
    }
    Highlighter::new(words).highlight(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_single_pattern() {
        assert_eq!(merge_occurrences(&[0, 1, 5, 7], 2), vec![0..3, 5..9]);
        // touching occurrences merge too
        assert_eq!(merge_occurrences(&[0, 2], 2), vec![0..4]);
        assert_eq!(merge_occurrences(&[0, 3], 2), vec![0..2, 3..5]);
        assert!(merge_occurrences(&[0, 1], 0).is_empty());
        assert!(merge_occurrences(&[], 3).is_empty());
    }

    #[test]
    fn union_prefers_longer_at_equal_start() {
        let lists = vec![vec![0..1, 4..5], vec![0..3], vec![3..4, 9..10]];
        assert_eq!(union_ranges(&lists), vec![0..5, 9..10]);
    }

    #[test]
    fn union_of_nothing() {
        assert!(union_ranges(&[]).is_empty());
        assert!(union_ranges(&[vec![], vec![]]).is_empty());
    }

    #[test]
    fn leetcode_examples() {
        assert_eq!(add_bold_tag("abcxyz123", &["abc", "123"]), "<b>abc</b>xyz<b>123</b>");
        assert_eq!(add_bold_tag("aaabbb", &["aa", "b"]), "<b>aaabbb</b>");
        assert_eq!(add_bold_tag("aabcd", &["ab", "bc"]), "a<b>abc</b>d");
    }

    #[test]
    fn no_match_returns_text() {
        assert_eq!(add_bold_tag("hello", &["xyz"]), "hello");
        assert_eq!(add_bold_tag("hello", &[] as &[&str]), "hello");
        assert_eq!(add_bold_tag("", &["a"]), "");
        assert_eq!(add_bold_tag("abc", &[""]), "abc");
    }

    #[test]
    fn span_reaching_end_of_text() {
        assert_eq!(add_bold_tag("xxab", &["ab", "b"]), "xx<b>ab</b>");
        assert_eq!(add_bold_tag("ab", &["ab"]), "<b>ab</b>");
    }

    #[test]
    fn custom_markers_and_utf8() {
        let h = Highlighter::new(["café", "é b"]).with_markers(Markers::new("[", "]"));
        assert_eq!(h.highlight("un café bien"), "un [café b]ien");
        assert_eq!(h.markers().open, "[");
    }

    #[test]
    fn highlight_all_keeps_order() {
        let h = Highlighter::new(["ab"]);
        let out = h.highlight_all(&["ab", "xx", "xab"]);
        assert_eq!(out, vec!["<b>ab</b>", "xx", "x<b>ab</b>"]);
    }
}
