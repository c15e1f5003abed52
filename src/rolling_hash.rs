//! Polynomial rolling hash over fixed-length windows.
//!
//! One hash per base, all modulo one prime, products in `u128`. A hash hit
//! is only a candidate: searches compare the elements before reporting it.
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::error::{Error, Result};
use crate::SequenceMatcher;

pub const DEFAULT_BASES: [u64; 2] = [31, 37];
pub const DEFAULT_MODULUS: u64 = 1_000_000_007;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollingHashConfig {
    bases: Vec<u64>,
    modulus: u64,
}

impl Default for RollingHashConfig {
    fn default() -> Self {
        RollingHashConfig { bases: DEFAULT_BASES.to_vec(), modulus: DEFAULT_MODULUS }
    }
}

impl RollingHashConfig {
    pub fn new(bases: &[u64], modulus: u64) -> Result<Self> {
        if bases.is_empty() {
            return Err(Error::NoHashBases);
        }
        if modulus < 2 {
            return Err(Error::InvalidModulus(modulus));
        }
        Ok(RollingHashConfig { bases: bases.to_vec(), modulus })
    }

    pub fn bases(&self) -> &[u64] {
        &self.bases
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Hash of every `length`-element window of `iter`, in order of window
    /// start. Yields nothing if `iter` is shorter than `length` or if
    /// `length` is zero.
    pub fn windows<I>(&self, iter: I, length: usize) -> Windows<'_, I::IntoIter, fn(I::Item) -> u64>
    where
        I: IntoIterator,
        I::Item: Into<u64>,
    {
        self.windows_by_key(iter, length, <I::Item as Into<u64>>::into as fn(I::Item) -> u64)
    }

    /// Like [`windows`](Self::windows), with `key` mapping each element to
    /// the integer that gets hashed.
    pub fn windows_by_key<I, F>(&self, iter: I, length: usize, key: F) -> Windows<'_, I::IntoIter, F>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> u64,
    {
        let md = self.modulus as u128;
        // base^length: weight of the element leaving the window
        let weights = self
            .bases
            .iter()
            .map(|&p| {
                let mut w: u128 = 1;
                for _ in 0..length {
                    w = w * (p as u128 % md) % md;
                }
                w as u64
            })
            .collect();
        Windows {
            config: self,
            iter: iter.into_iter(),
            key,
            length,
            window: VecDeque::with_capacity(length),
            hashes: vec![0; self.bases.len()],
            weights,
            primed: false,
        }
    }

    /// Hash of a whole sequence, equal to the first window of that length.
    pub fn hash_of<I>(&self, seq: I) -> Vec<u64>
    where
        I: IntoIterator,
        I::Item: Into<u64>,
    {
        self.hash_of_by_key(seq, <I::Item as Into<u64>>::into)
    }

    pub fn hash_of_by_key<I, F>(&self, seq: I, mut key: F) -> Vec<u64>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> u64,
    {
        let md = self.modulus as u128;
        let mut hashes = vec![0u64; self.bases.len()];
        for v in seq {
            let v = key(v) as u128 % md;
            for (h, &p) in hashes.iter_mut().zip(&self.bases) {
                *h = ((*h as u128 * p as u128 + v) % md) as u64;
            }
        }
        hashes
    }
}

pub struct Windows<'c, I, F> {
    config: &'c RollingHashConfig,
    iter: I,
    key: F,
    length: usize,
    window: VecDeque<u64>,
    hashes: Vec<u64>,
    weights: Vec<u64>,
    primed: bool,
}

impl<'c, I, F> Iterator for Windows<'c, I, F>
where
    I: Iterator,
    F: FnMut(I::Item) -> u64,
{
    type Item = Vec<u64>;

    fn next(&mut self) -> Option<Vec<u64>> {
        if self.length == 0 { return None; }
        let md = self.config.modulus as u128;
        if !self.primed {
            while self.window.len() < self.length {
                let v = ((self.key)(self.iter.next()?) as u128 % md) as u64;
                self.window.push_back(v);
                for (h, &p) in self.hashes.iter_mut().zip(&self.config.bases) {
                    *h = ((*h as u128 * p as u128 + v as u128) % md) as u64;
                }
            }
            self.primed = true;
            return Some(self.hashes.clone());
        }
        let v = ((self.key)(self.iter.next()?) as u128 % md) as u64;
        self.window.push_back(v);
        let old = self.window.pop_front().unwrap_or(0) as u128;
        for ((h, &p), &w) in self.hashes.iter_mut().zip(&self.config.bases).zip(&self.weights) {
            let shifted = *h as u128 * p as u128 % md;
            let dropped = w as u128 * old % md;
            *h = ((shifted + md - dropped + v as u128) % md) as u64;
        }
        Some(self.hashes.clone())
    }
}

fn into_key<T: Copy + Into<u64>>(x: &T) -> u64 {
    (*x).into()
}

/// Single-pattern search by comparing window hashes.
///
/// `K` maps an element to the integer that gets hashed. [`new`](Self::new)
/// uses `Into<u64>`; [`with_key`](Self::with_key) takes any mapping, so
/// words, tuples or enums can be searched too.
#[derive(Clone, Debug)]
pub struct RollingHashMatcher<T, K = fn(&T) -> u64> {
    pattern: Vec<T>,
    hash: Vec<u64>,
    config: RollingHashConfig,
    key: K,
}

impl<T: Copy + PartialEq + Into<u64>> RollingHashMatcher<T> {
    pub fn new(pattern: impl IntoIterator<Item = T>, config: RollingHashConfig) -> Self {
        RollingHashMatcher::with_key(pattern, config, into_key::<T> as fn(&T) -> u64)
    }
}

impl<T: PartialEq, K: Fn(&T) -> u64> RollingHashMatcher<T, K> {
    pub fn with_key(pattern: impl IntoIterator<Item = T>, config: RollingHashConfig, key: K) -> Self {
        let pattern: Vec<T> = pattern.into_iter().collect();
        let hash = config.hash_of_by_key(pattern.iter(), &key);
        RollingHashMatcher { pattern, hash, config, key }
    }

    pub fn pattern(&self) -> &[T] {
        &self.pattern
    }

    /// Start index of every occurrence, ascending. An empty pattern matches
    /// at every index.
    pub fn find_iter<'h>(&'h self, haystack: &'h [T]) -> FindIter<'h, T, K> {
        FindIter {
            pattern: &self.pattern,
            target: &self.hash,
            haystack,
            windows: self.config.windows_by_key(haystack.iter(), self.pattern.len(), &self.key),
            pos: 0,
        }
    }
}

impl<T: PartialEq, K: Fn(&T) -> u64> SequenceMatcher<T> for RollingHashMatcher<T, K> {
    fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    fn find_starts(&self, haystack: &[T]) -> Vec<usize> {
        self.find_iter(haystack).collect()
    }
}

pub struct FindIter<'h, T, K> {
    pattern: &'h [T],
    target: &'h [u64],
    haystack: &'h [T],
    windows: Windows<'h, std::slice::Iter<'h, T>, &'h K>,
    pos: usize,
}

impl<'h, T: PartialEq, K: Fn(&T) -> u64> Iterator for FindIter<'h, T, K> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let m = self.pattern.len();
        if m == 0 {
            if self.pos >= self.haystack.len() { return None; }
            self.pos += 1;
            return Some(self.pos - 1);
        }
        loop {
            let h = self.windows.next()?;
            let i = self.pos;
            self.pos += 1;
            if h == self.target && self.haystack[i..i + m] == *self.pattern {
                return Some(i);
            }
        }
    }
}

/// Start indices of every pattern in `text`, keyed by pattern index.
///
/// Patterns are grouped by length and each distinct length slides one
/// window over the text. Only patterns with at least one match appear.
pub fn rolling_hash_search<T, P>(
    text: &[T],
    patterns: &[P],
    config: &RollingHashConfig,
) -> BTreeMap<usize, Vec<usize>>
where
    T: Copy + PartialEq + Into<u64>,
    P: AsRef<[T]>,
{
    rolling_hash_search_by_key(text, patterns, config, into_key::<T>)
}

/// [`rolling_hash_search`] with `key` mapping each element to the integer
/// that gets hashed.
pub fn rolling_hash_search_by_key<T, P, K>(
    text: &[T],
    patterns: &[P],
    config: &RollingHashConfig,
    key: K,
) -> BTreeMap<usize, Vec<usize>>
where
    T: PartialEq,
    P: AsRef<[T]>,
    K: Fn(&T) -> u64,
{
    let mut by_length: HashMap<usize, HashMap<Vec<u64>, Vec<usize>>> = HashMap::new();
    for (id, p) in patterns.iter().enumerate() {
        let p = p.as_ref();
        by_length
            .entry(p.len())
            .or_default()
            .entry(config.hash_of_by_key(p.iter(), &key))
            .or_default()
            .push(id);
    }
    log::debug!(
        "rolling hash search: {} patterns in {} length groups over {} elements",
        patterns.len(),
        by_length.len(),
        text.len()
    );

    let mut res: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (&length, table) in &by_length {
        if length == 0 {
            if text.is_empty() { continue; }
            for ids in table.values() {
                for &id in ids {
                    res.insert(id, (0..text.len()).collect());
                }
            }
            continue;
        }
        for (i, h) in config.windows_by_key(text.iter(), length, &key).enumerate() {
            let Some(ids) = table.get(&h) else { continue };
            let window = &text[i..i + length];
            for &id in ids {
                if patterns[id].as_ref() == window {
                    res.entry(id).or_default().push(i);
                }
            }
        }
    }
    res
}
