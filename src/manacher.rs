//! Manacher's algorithm and the palindrome queries built on it.
use std::ops::Range;

/// `r[i]` is the radius of the longest odd-length palindrome centred on
/// `s[i]`, i.e. it spans `s[i - r[i]..=i + r[i]]`.
///
/// ```
/// assert_eq!(seqmatch::manacher::radii(b"ebabad"), vec![0, 0, 1, 1, 0, 0]);
/// ```
pub fn radii<T: PartialEq>(s: &[T]) -> Vec<usize> {
    let n = s.len();
    let mut r = vec![0; n];
    // palindrome reaching furthest right so far
    let (mut center, mut right) = (0, 0);
    for i in 0..n {
        if i < right {
            r[i] = r[2 * center - i].min(right - i);
        }
        while i >= r[i] + 1 && i + r[i] + 1 < n && s[i + r[i] + 1] == s[i - r[i] - 1] {
            r[i] += 1;
        }
        if i + r[i] > right {
            center = i;
            right = i + r[i];
        }
    }
    r
}

// `None` between and around every element, so even-length palindromes get
// a centre too. A radius here equals the palindrome's length in `s`.
fn interleave<T>(s: &[T]) -> Vec<Option<&T>> {
    let mut out = Vec::with_capacity(2 * s.len() + 1);
    out.push(None);
    for x in s {
        out.push(Some(x));
        out.push(None);
    }
    out
}

/// Every maximal-length palindromic run of `s`, left to right. An empty
/// input yields the single empty range.
pub fn longest_palindromic_spans<T: PartialEq>(s: &[T]) -> Vec<Range<usize>> {
    let r = radii(&interleave(s));
    let best = r.iter().copied().max().unwrap_or(0);
    r.iter()
        .enumerate()
        .filter(|&(_, &len)| len == best)
        .map(|(i, _)| {
            let start = (i - best) / 2;
            start..start + best
        })
        .collect()
}

pub fn count_palindromic_substrings<T: PartialEq>(s: &[T]) -> usize {
    radii(&interleave(s)).iter().map(|&x| (x + 1) / 2).sum()
}

/// Longest palindromic substrings of `s`, compared by chars.
pub fn longest_palindromic_substrings(s: &str) -> Vec<&str> {
    let chars: Vec<char> = s.chars().collect();
    let bounds: Vec<usize> = s.char_indices().map(|(b, _)| b).chain(std::iter::once(s.len())).collect();
    longest_palindromic_spans(&chars)
        .into_iter()
        .map(|span| &s[bounds[span.start]..bounds[span.end]])
        .collect()
}

/// The leftmost longest palindromic substring.
pub fn longest_palindrome(s: &str) -> &str {
    longest_palindromic_substrings(s).first().copied().unwrap_or("")
}

pub fn count_palindromes(s: &str) -> usize {
    let chars: Vec<char> = s.chars().collect();
    count_palindromic_substrings(&chars)
}
