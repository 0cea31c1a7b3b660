// Flag Subset Enumeration
// Walks the power set of a flag sequence by subset size, then combination order

/// `2^len`, saturating at `u64::MAX` for 64 or more flags
pub fn subset_count(len: usize) -> u64 {
    u32::try_from(len)
        .ok()
        .and_then(|shift| 1u64.checked_shl(shift))
        .unwrap_or(u64::MAX)
}

/// Iterator over every subset of a flag sequence.
///
/// Subsets come out smallest first: the empty subset, then every
/// single flag in sequence order, then every pair in lexicographic
/// index order, and so on up to the full set. A sequence of `k` flags
/// yields exactly `2^k` subsets.
#[derive(Debug, Clone)]
pub struct FlagSubsets {
    flags: Vec<char>,
    /// Positions into `flags` for the subset yielded next
    indices: Vec<usize>,
    done: bool,
}

impl FlagSubsets {
    pub fn new(flags: impl Into<Vec<char>>) -> Self {
        Self {
            flags: flags.into(),
            indices: Vec::new(),
            done: false,
        }
    }

    /// Number of subsets this iterator yields in total
    pub fn total(&self) -> u64 {
        subset_count(self.flags.len())
    }

    fn advance(&mut self) {
        let n = self.flags.len();
        let r = self.indices.len();

        // Rightmost position that has not reached its final value
        match (0..r).rev().find(|&i| self.indices[i] != i + n - r) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..r {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None if r < n => self.indices = (0..=r).collect(),
            None => self.done = true,
        }
    }
}

impl Iterator for FlagSubsets {
    type Item = Vec<char>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let subset = self.indices.iter().map(|&i| self.flags[i]).collect();
        self.advance();
        Some(subset)
    }
}
