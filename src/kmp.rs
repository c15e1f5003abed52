//! Knuth-Morris-Pratt single-pattern search.
//!
//! The LPS table is built once in `Kmp::new`; scanning is a single forward
//! pass over any iterator of elements, so the haystack can be streamed.
use std::borrow::Borrow;

use crate::SequenceMatcher;

#[derive(Clone, Debug)]
pub struct Kmp<T> {
    pattern: Vec<T>,
    lps: Vec<usize>,
}

impl<T: PartialEq> Kmp<T> {
    pub fn new(pattern: impl IntoIterator<Item = T>) -> Self {
        let pattern: Vec<T> = pattern.into_iter().collect();
        let lps = build_lps(&pattern);
        Kmp { pattern, lps }
    }

    pub fn pattern(&self) -> &[T] {
        &self.pattern
    }

    /// `lps[i]` is the length of the longest proper prefix of
    /// `pattern[..=i]` that is also a suffix of it.
    pub fn lps(&self) -> &[usize] {
        &self.lps
    }

    /// Start index of every occurrence of the pattern, ascending.
    ///
    /// An empty pattern matches at every index of the haystack.
    pub fn find_iter<I>(&self, haystack: I) -> FindIter<'_, T, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        FindIter { kmp: self, haystack: haystack.into_iter(), pos: 0, matched: 0 }
    }
}

impl<T: PartialEq> SequenceMatcher<T> for Kmp<T> {
    fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    fn find_starts(&self, haystack: &[T]) -> Vec<usize> {
        if self.pattern.len() > haystack.len() { return Vec::new(); }
        self.find_iter(haystack).collect()
    }
}

fn build_lps<T: PartialEq>(p: &[T]) -> Vec<usize> {
    let mut lps = vec![0; p.len()];
    let mut len = 0;
    for i in 1..p.len() {
        while len > 0 && p[i] != p[len] {
            len = lps[len - 1];
        }
        if p[i] == p[len] {
            len += 1;
        }
        lps[i] = len;
    }
    lps
}

pub struct FindIter<'k, T, I> {
    kmp: &'k Kmp<T>,
    haystack: I,
    pos: usize,
    matched: usize,
}

impl<'k, T, I> Iterator for FindIter<'k, T, I>
where
    T: PartialEq,
    I: Iterator,
    I::Item: Borrow<T>,
{
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let p = &self.kmp.pattern;
        let m = p.len();
        for elem in self.haystack.by_ref() {
            let i = self.pos;
            self.pos += 1;
            if m == 0 { return Some(i); }
            let elem = elem.borrow();
            while self.matched > 0 && *elem != p[self.matched] {
                self.matched = self.kmp.lps[self.matched - 1];
            }
            if *elem == p[self.matched] {
                self.matched += 1;
            }
            if self.matched == m {
                self.matched = self.kmp.lps[m - 1];
                return Some(i + 1 - m);
            }
        }
        None
    }
}
