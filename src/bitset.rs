//! Bit set of state indexes.
//!
//! A [`StateSet`] holds the allowed states of one variable inside a product term. Sets are
//! small (one word covers 64 states) but grow automatically for larger types.

use std::hash::{Hash, Hasher};

/// A set of state indexes backed by a vector of u64 words.
#[derive(Debug, Clone, Default)]
pub struct StateSet {
    /// Storage: each u64 holds 64 bits
    words: Vec<u64>,
    /// Number of set bits (cached for O(1) len())
    count: usize,
}

impl StateSet {
    /// Number of bits per word.
    const BITS_PER_WORD: usize = 64;

    /// Creates an empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the set `{0, 1, ..., n-1}`.
    pub fn full(n: usize) -> Self {
        let mut set = Self::empty();
        set.extend(0..n);
        set
    }

    /// Creates the set holding a single state.
    pub fn single(state: usize) -> Self {
        let mut set = Self::empty();
        set.insert(state);
        set
    }

    /// Returns the number of states in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no state is in the set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        if word_idx >= self.words.len() {
            return false;
        }
        (self.words[word_idx] & (1u64 << bit_idx)) != 0
    }

    /// Adds a state. Returns true if it was not present before.
    pub fn insert(&mut self, index: usize) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(index);

        // Grow if necessary
        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }

        let mask = 1u64 << bit_idx;
        let was_clear = (self.words[word_idx] & mask) == 0;
        if was_clear {
            self.words[word_idx] |= mask;
            self.count += 1;
        }
        was_clear
    }

    /// Removes a state. Returns true if it was present before.
    pub fn remove(&mut self, index: usize) -> bool {
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        if word_idx >= self.words.len() {
            return false;
        }

        let mask = 1u64 << bit_idx;
        let was_set = (self.words[word_idx] & mask) != 0;
        if was_set {
            self.words[word_idx] &= !mask;
            self.count -= 1;
        }
        was_set
    }

    pub fn extend(&mut self, iter: impl IntoIterator<Item = usize>) {
        for index in iter {
            self.insert(index);
        }
    }

    /// Returns the lowest state in the set.
    pub fn first(&self) -> Option<usize> {
        self.iter().next()
    }

    /// Returns the only state in the set, if it has exactly one.
    pub fn single_state(&self) -> Option<usize> {
        if self.count == 1 {
            self.first()
        } else {
            None
        }
    }

    /// Returns `self ∩ other`.
    pub fn intersection(&self, other: &StateSet) -> StateSet {
        let words: Vec<u64> = self.words.iter().zip(other.words.iter()).map(|(a, b)| a & b).collect();
        Self::from_words(words)
    }

    /// Returns `self ∪ other`.
    pub fn union(&self, other: &StateSet) -> StateSet {
        let n = self.words.len().max(other.words.len());
        let words: Vec<u64> = (0..n)
            .map(|i| self.words.get(i).copied().unwrap_or(0) | other.words.get(i).copied().unwrap_or(0))
            .collect();
        Self::from_words(words)
    }

    /// Returns the states of `{0..n}` not in this set.
    pub fn complement(&self, n: usize) -> StateSet {
        let mut set = StateSet::empty();
        set.extend((0..n).filter(|&i| !self.contains(i)));
        set
    }

    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.words
            .iter()
            .enumerate()
            .all(|(i, &w)| w & !other.words.get(i).copied().unwrap_or(0) == 0)
    }

    pub fn intersects(&self, other: &StateSet) -> bool {
        self.words.iter().zip(other.words.iter()).any(|(a, b)| a & b != 0)
    }

    fn from_words(mut words: Vec<u64>) -> StateSet {
        while words.last() == Some(&0) {
            words.pop();
        }
        let count = words.iter().map(|w| w.count_ones() as usize).sum();
        StateSet { words, count }
    }

    /// Words with trailing zero words stripped, used for equality and hashing.
    fn significant_words(&self) -> &[u64] {
        let mut n = self.words.len();
        while n > 0 && self.words[n - 1] == 0 {
            n -= 1;
        }
        &self.words[..n]
    }

    /// Returns an iterator over all states in ascending order.
    pub fn iter(&self) -> StateSetIter<'_> {
        StateSetIter {
            set: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.significant_words() == other.significant_words()
    }
}

impl Eq for StateSet {}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant_words().hash(state);
    }
}

impl FromIterator<usize> for StateSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = StateSet::empty();
        set.extend(iter);
        set
    }
}

/// Iterator over the states of a [`StateSet`].
pub struct StateSetIter<'a> {
    set: &'a StateSet,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for StateSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit_idx = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1;
                return Some(self.word_idx * StateSet::BITS_PER_WORD + bit_idx);
            }
            self.word_idx += 1;
            if self.word_idx >= self.set.words.len() {
                return None;
            }
            self.current_word = self.set.words[self.word_idx];
        }
    }
}
