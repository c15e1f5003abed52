//! Aho-Corasick multi-pattern automaton.
//!
//! Trie plus BFS failure links. Each node's pattern and length bit sets are
//! OR-ed with its failure node's, so a node reports every pattern ending there.
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;

use rayon::prelude::*;

use crate::bitset::BitSet;
use crate::error::{Error, Result};

pub const ROOT: usize = 0;

#[derive(Clone, Debug)]
struct Node<T> {
    transitions: HashMap<T, usize>,
    failure: usize,
    matches: BitSet,
    lengths: BitSet,
}

impl<T> Node<T> {
    fn new() -> Self {
        Node { transitions: HashMap::new(), failure: ROOT, matches: BitSet::new(), lengths: BitSet::new() }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AhoCorasickBuilder {
    pattern_limit: Option<usize>,
}

impl AhoCorasickBuilder {
    pub fn new() -> Self {
        AhoCorasickBuilder::default()
    }

    /// Refuse to build from more than `limit` patterns.
    pub fn pattern_limit(&mut self, limit: usize) -> &mut Self {
        self.pattern_limit = Some(limit);
        self
    }

    pub fn build<T, I, P>(&self, patterns: I) -> Result<AhoCorasick<T>>
    where
        T: Eq + Hash + Clone,
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = T>,
    {
        let patterns: Vec<Vec<T>> = patterns.into_iter().map(|p| p.into_iter().collect()).collect();
        if let Some(limit) = self.pattern_limit {
            if patterns.len() > limit {
                return Err(Error::TooManyPatterns { count: patterns.len(), limit });
            }
        }
        Ok(AhoCorasick::from_patterns(patterns))
    }
}

#[derive(Clone, Debug)]
pub struct AhoCorasick<T> {
    nodes: Vec<Node<T>>,
    patterns: Vec<Vec<T>>,
}

impl<T: Eq + Hash + Clone> AhoCorasick<T> {
    /// Build an automaton; pattern `i` of the input gets id `i`.
    ///
    /// ```
    /// use seqmatch::AhoCorasick;
    ///
    /// let ac = AhoCorasick::new(["he", "she", "hers", "his"].map(str::bytes));
    /// let found = ac.search("ahishers".bytes());
    /// assert_eq!(found[&3], vec![1]);
    /// assert_eq!(found[&1], vec![3]);
    /// ```
    pub fn new<I, P>(patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = T>,
    {
        let patterns = patterns.into_iter().map(|p| p.into_iter().collect()).collect();
        AhoCorasick::from_patterns(patterns)
    }

    pub fn builder() -> AhoCorasickBuilder {
        AhoCorasickBuilder::new()
    }

    fn from_patterns(patterns: Vec<Vec<T>>) -> Self {
        let mut ac = AhoCorasick { nodes: vec![Node::new()], patterns };
        ac.build_trie();
        ac.fill_failure_links();
        log::debug!(
            "built Aho-Corasick automaton: {} patterns, {} nodes",
            ac.patterns.len(),
            ac.nodes.len()
        );
        ac
    }

    fn build_trie(&mut self) {
        for (id, pattern) in self.patterns.iter().enumerate() {
            let mut cur = ROOT;
            for elem in pattern {
                cur = match self.nodes[cur].transitions.get(elem) {
                    Some(&next) => next,
                    None => {
                        let next = self.nodes.len();
                        self.nodes.push(Node::new());
                        self.nodes[cur].transitions.insert(elem.clone(), next);
                        next
                    }
                };
            }
            self.nodes[cur].matches.insert(id);
            self.nodes[cur].lengths.insert(pattern.len());
        }
    }

    fn fill_failure_links(&mut self) {
        let mut queue: VecDeque<usize> = VecDeque::new();

        // Depth one: failure is the root. They still inherit the root's sets,
        // which are non-empty only when an empty pattern was given.
        let children: Vec<usize> = self.nodes[ROOT].transitions.values().copied().collect();
        for child in children {
            self.inherit(child, ROOT);
            queue.push_back(child);
        }

        while let Some(id) = queue.pop_front() {
            let edges: Vec<(T, usize)> =
                self.nodes[id].transitions.iter().map(|(e, &c)| (e.clone(), c)).collect();
            for (elem, child) in edges {
                let fail = self.goto(self.nodes[id].failure, &elem);
                self.nodes[child].failure = fail;
                self.inherit(child, fail);
                queue.push_back(child);
            }
        }
    }

    fn inherit(&mut self, id: usize, from: usize) {
        debug_assert_ne!(id, from);
        let (matches, lengths) = {
            let src = &self.nodes[from];
            (src.matches.clone(), src.lengths.clone())
        };
        let node = &mut self.nodes[id];
        node.matches.union_with(&matches);
        node.lengths.union_with(&lengths);
    }

    /// Next state after reading `elem` in state `id`.
    ///
    /// Follows failure links until some state has a transition on `elem`,
    /// falling back to the root when none does. Never fails.
    #[inline]
    pub fn goto(&self, mut id: usize, elem: &T) -> usize {
        loop {
            if let Some(&next) = self.nodes[id].transitions.get(elem) {
                return next;
            }
            if id == ROOT { return ROOT; }
            id = self.nodes[id].failure;
        }
    }

    /// Start indices of every pattern occurrence, keyed by pattern id.
    ///
    /// Only patterns that occur at least once get an entry. Each list is
    /// strictly ascending. Identical patterns are reported separately
    /// under their own ids.
    pub fn search<I>(&self, haystack: I) -> BTreeMap<usize, Vec<usize>>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut res: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut state = ROOT;
        let mut seen = 0;
        for (i, elem) in haystack.into_iter().enumerate() {
            state = self.goto(state, elem.borrow());
            for id in self.nodes[state].matches.iter() {
                res.entry(id).or_default().push(i + 1 - self.patterns[id].len());
            }
            seen = i + 1;
        }
        log::trace!("scanned {} elements, {} patterns matched", seen, res.len());
        res
    }

    /// For each haystack position, in order, the ids of patterns whose
    /// occurrence ends exactly there. Positions without a match yield an
    /// empty list.
    pub fn search_end_indices<I>(&self, haystack: I) -> EndIndices<'_, T, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        EndIndices { ac: self, haystack: haystack.into_iter().enumerate(), state: ROOT }
    }

    /// For each haystack position, in order, the distinct lengths of the
    /// patterns ending there. Patterns sharing a length collapse into one
    /// entry.
    pub fn search_lengths<I>(&self, haystack: I) -> Lengths<'_, T, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        Lengths { ac: self, haystack: haystack.into_iter(), state: ROOT }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn failure(&self, id: usize) -> usize {
        self.nodes[id].failure
    }

    /// Patterns ending at node `id`, failure-inherited ones included.
    pub fn matches(&self, id: usize) -> &BitSet {
        &self.nodes[id].matches
    }

    /// Lengths of the patterns in `matches(id)`.
    pub fn lengths(&self, id: usize) -> &BitSet {
        &self.nodes[id].lengths
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn pattern(&self, id: usize) -> &[T] {
        &self.patterns[id]
    }

    pub fn pattern_len(&self, id: usize) -> usize {
        self.patterns[id].len()
    }
}

impl<T: Eq + Hash + Clone + Sync> AhoCorasick<T> {
    /// `search` over each text, in the same order. More than one text is
    /// scanned in parallel.
    pub fn search_all<S>(&self, texts: &[S]) -> Vec<BTreeMap<usize, Vec<usize>>>
    where
        S: AsRef<[T]> + Sync,
    {
        let scan = |text: &S| self.search(text.as_ref());
        if texts.len() > 1 {
            texts.par_iter().map(scan).collect()
        } else {
            texts.iter().map(scan).collect()
        }
    }
}

pub struct EndIndices<'a, T, I> {
    ac: &'a AhoCorasick<T>,
    haystack: std::iter::Enumerate<I>,
    state: usize,
}

impl<'a, T, I> Iterator for EndIndices<'a, T, I>
where
    T: Eq + Hash + Clone,
    I: Iterator,
    I::Item: Borrow<T>,
{
    type Item = (usize, Vec<usize>);

    fn next(&mut self) -> Option<(usize, Vec<usize>)> {
        let (i, elem) = self.haystack.next()?;
        self.state = self.ac.goto(self.state, elem.borrow());
        Some((i, self.ac.nodes[self.state].matches.iter().collect()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.haystack.size_hint()
    }
}

pub struct Lengths<'a, T, I> {
    ac: &'a AhoCorasick<T>,
    haystack: I,
    state: usize,
}

impl<'a, T, I> Iterator for Lengths<'a, T, I>
where
    T: Eq + Hash + Clone,
    I: Iterator,
    I::Item: Borrow<T>,
{
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let elem = self.haystack.next()?;
        self.state = self.ac.goto(self.state, elem.borrow());
        Some(self.ac.nodes[self.state].lengths.iter().collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.haystack.size_hint()
    }
}
