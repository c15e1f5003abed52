//! Exact sequence matching.
//!
//! Single-pattern search ([`Kmp`], [`ZAlgorithm`], [`RollingHashMatcher`])
//! over any sequence of comparable elements, multi-pattern search with an
//! [`AhoCorasick`] automaton, overlap-merging highlighting built on top of
//! it ([`Highlighter`], [`add_bold_tag`]), and palindrome queries via
//! Manacher's algorithm ([`manacher`]).
//!
//! All searches report start indices in ascending order. Indices count
//! elements of whatever sequence is searched: bytes for `str::bytes`,
//! chars for `str::chars`.
//!
//! ```
//! use seqmatch::{Kmp, SequenceMatcher, ZAlgorithm};
//!
//! let text = b"casbababbbbbabbceab";
//! let kmp = Kmp::new(b"bb".iter().copied());
//! let z = ZAlgorithm::new(b"bb".iter().copied());
//! assert_eq!(kmp.find_starts(text), vec![7, 8, 9, 10, 13]);
//! assert_eq!(z.find_starts(text), kmp.find_starts(text));
//! ```

pub mod ahocorasick;
pub mod bitset;
pub mod bold;
mod error;
pub mod kmp;
pub mod manacher;
pub mod rolling_hash;
pub mod z_algorithm;

pub use crate::ahocorasick::{AhoCorasick, AhoCorasickBuilder};
pub use crate::bitset::BitSet;
pub use crate::bold::{add_bold_tag, Highlighter, Markers};
pub use crate::error::{Error, Result};
pub use crate::kmp::Kmp;
pub use crate::rolling_hash::{
    rolling_hash_search, rolling_hash_search_by_key, RollingHashConfig, RollingHashMatcher,
};
pub use crate::z_algorithm::{z_array, ZAlgorithm};

/// A single-pattern exact matcher.
pub trait SequenceMatcher<T> {
    fn pattern_len(&self) -> usize;

    /// Start index of every contiguous occurrence of the pattern in
    /// `haystack`, ascending. An empty pattern matches at every index.
    fn find_starts(&self, haystack: &[T]) -> Vec<usize>;
}
