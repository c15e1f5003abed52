//! Z-algorithm single-pattern search.
use crate::SequenceMatcher;

/// `z[i]` is the length of the longest run starting at `i` that matches a
/// prefix of `s`. By convention `z[0] == s.len()`.
pub fn z_array<T: PartialEq>(s: &[T]) -> Vec<usize> {
    let n = s.len();
    let mut z = vec![0; n];
    if n == 0 { return z; }
    z[0] = n;
    // [left, right) is the rightmost window known to match a prefix
    let (mut left, mut right) = (0, 0);
    for i in 1..n {
        if i < right {
            z[i] = z[i - left].min(right - i);
        }
        while i + z[i] < n && s[z[i]] == s[i + z[i]] {
            z[i] += 1;
        }
        if i + z[i] > right {
            left = i;
            right = i + z[i];
        }
    }
    z
}

#[derive(Clone, Debug)]
pub struct ZAlgorithm<T> {
    pattern: Vec<T>,
}

impl<T: PartialEq> ZAlgorithm<T> {
    pub fn new(pattern: impl IntoIterator<Item = T>) -> Self {
        ZAlgorithm { pattern: pattern.into_iter().collect() }
    }

    pub fn pattern(&self) -> &[T] {
        &self.pattern
    }

    /// Runs the Z-array over `pattern, <sep>, haystack`. The separator is
    /// `None`, which never equals an element, so a match can't straddle it.
    pub fn find_iter(&self, haystack: &[T]) -> FindIter {
        let m = self.pattern.len();
        let joined: Vec<Option<&T>> = self
            .pattern
            .iter()
            .map(Some)
            .chain(std::iter::once(None))
            .chain(haystack.iter().map(Some))
            .collect();
        FindIter { z: z_array(&joined), pattern_len: m, pos: m + 1 }
    }
}

impl<T: PartialEq> SequenceMatcher<T> for ZAlgorithm<T> {
    fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    fn find_starts(&self, haystack: &[T]) -> Vec<usize> {
        if self.pattern.len() > haystack.len() { return Vec::new(); }
        self.find_iter(haystack).collect()
    }
}

pub struct FindIter {
    z: Vec<usize>,
    pattern_len: usize,
    pos: usize,
}

impl Iterator for FindIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.pos < self.z.len() {
            let i = self.pos;
            self.pos += 1;
            if self.z[i] == self.pattern_len {
                return Some(i - self.pattern_len - 1);
            }
        }
        None
    }
}
