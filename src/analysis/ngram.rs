use std::collections::HashMap;
use crate::analysis::char_unit::{CharMode, Unit};
use crate::core::error::{Error, Result};

/// Largest gram size accepted by the generator.
pub const MAX_GRAM_SIZE: usize = 64;

/// One indexed feature: `n` units plus the occurrence number of those units
/// inside the string (1 for the first occurrence, 2 for the second, ...).
///
/// Numbering repeated n-grams turns a string's n-gram multiset into a plain
/// set, so set intersection of features is multiset intersection of n-grams.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NGram {
    units: Box<[Unit]>,
    occurrence: u32,
}

impl NGram {
    pub fn new(units: Vec<Unit>, occurrence: u32) -> Self {
        NGram { units: units.into_boxed_slice(), occurrence }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn occurrence(&self) -> u32 {
        self.occurrence
    }

    /// Append the flat key (units, then occurrence) used by bucket files.
    /// Flat keys of equal-size grams sort exactly like `NGram` values.
    pub fn write_key(&self, out: &mut Vec<u32>) {
        out.extend(self.units.iter().map(|u| u.0));
        out.push(self.occurrence);
    }

    pub fn key(&self) -> Vec<u32> {
        let mut key = Vec::with_capacity(self.units.len() + 1);
        self.write_key(&mut key);
        key
    }

    pub fn from_key(key: &[u32]) -> Option<Self> {
        let (occurrence, units) = key.split_last()?;
        Some(NGram::new(units.iter().map(|&u| Unit(u)).collect(), *occurrence))
    }
}

/// The sorted feature set of one string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NGramSet {
    grams: Vec<NGram>,
}

impl NGramSet {
    pub fn len(&self) -> usize {
        self.grams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NGram> {
        self.grams.iter()
    }

    pub fn as_slice(&self) -> &[NGram] {
        &self.grams
    }

    pub fn contains(&self, gram: &NGram) -> bool {
        self.grams.binary_search(gram).is_ok()
    }

    /// Number of features shared with `other` (sorted merge).
    pub fn intersection_size(&self, other: &NGramSet) -> usize {
        let (mut i, mut j, mut shared) = (0, 0, 0);
        while i < self.grams.len() && j < other.grams.len() {
            match self.grams[i].cmp(&other.grams[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    shared += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }
}

/// Splits strings into character n-grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NGramGenerator {
    n: usize,
    boundary_marks: bool,
    mode: CharMode,
}

impl NGramGenerator {
    pub fn new(n: usize, boundary_marks: bool, mode: CharMode) -> Result<Self> {
        if n == 0 || n > MAX_GRAM_SIZE {
            return Err(Error::invalid_parameter(format!(
                "gram size must lie in 1..={}, got {}",
                MAX_GRAM_SIZE, n
            )));
        }
        Ok(NGramGenerator { n, boundary_marks, mode })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn boundary_marks(&self) -> bool {
        self.boundary_marks
    }

    pub fn mode(&self) -> CharMode {
        self.mode
    }

    /// Characters of `text` with marker padding applied. The result always
    /// holds at least `n` units.
    pub fn padded(&self, text: &str) -> Vec<Unit> {
        let units = self.mode.decompose(text);
        let mut src = Vec::with_capacity(units.len() + 2 * self.n);

        if self.boundary_marks {
            src.extend(std::iter::repeat(Unit::BEGIN).take(self.n - 1));
            src.extend_from_slice(&units);
            src.extend(std::iter::repeat(Unit::END).take(self.n - 1));
        } else {
            src.extend_from_slice(&units);
        }

        if src.len() < self.n {
            let missing = self.n - src.len();
            src.extend(std::iter::repeat(Unit::END).take(missing));
        }
        src
    }

    /// Feature set of `text`.
    pub fn generate(&self, text: &str) -> NGramSet {
        let src = self.padded(text);
        let mut seen: HashMap<&[Unit], u32> = HashMap::new();
        let mut grams = Vec::with_capacity(src.len() + 1 - self.n);

        for window in src.windows(self.n) {
            let count = seen.entry(window).or_insert(0);
            *count += 1;
            grams.push(NGram::new(window.to_vec(), *count));
        }

        grams.sort_unstable();
        NGramSet { grams }
    }

    /// Number of features a string of `char_len` characters yields.
    pub fn gram_count(&self, char_len: usize) -> usize {
        if self.boundary_marks {
            (char_len + self.n - 1).max(1)
        } else if char_len < self.n {
            1
        } else {
            char_len - self.n + 1
        }
    }
}
