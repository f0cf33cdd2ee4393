//! Inversion-list code point sets.
//!
//! Ranges are stored as sorted, disjoint, non-adjacent inclusive pairs, so
//! membership is a binary search and the boolean operations are linear merges.

/// Largest valid code point.
pub const CODE_POINT_MAX: u32 = 0x10FFFF;

/// A set of code points over `0..=0x10FFFF`.
///
/// Unlike `char`, members may be lone surrogates; the rule grammar and the
/// downstream category assignment both treat the full code point space
/// uniformly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnicodeSet {
    /// Sorted, disjoint, non-adjacent inclusive ranges.
    ranges: Vec<(u32, u32)>,
}

impl UnicodeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding the inclusive range `lo..=hi`.
    /// Empty if `lo > hi`.
    pub fn from_range(lo: u32, hi: u32) -> Self {
        let mut s = Self::new();
        s.add_range(lo, hi);
        s
    }

    /// Create a set holding a single code point.
    pub fn single(c: u32) -> Self {
        Self::from_range(c, c)
    }

    /// The set of all code points, `0..=0x10FFFF`.
    pub fn any() -> Self {
        Self::from_range(0, CODE_POINT_MAX)
    }

    /// Whether `c` is a member.
    pub fn contains(&self, c: u32) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if c < lo {
                    std::cmp::Ordering::Greater
                } else if c > hi {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of stored ranges.
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Number of member code points.
    pub fn char_count(&self) -> u64 {
        self.ranges
            .iter()
            .map(|&(lo, hi)| u64::from(hi - lo) + 1)
            .sum()
    }

    /// Iterate over the normalized inclusive ranges in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.ranges.iter().copied()
    }

    /// Add a single code point.
    pub fn add(&mut self, c: u32) {
        self.add_range(c, c);
    }

    /// Add the inclusive range `lo..=hi`. No-op if `lo > hi`.
    pub fn add_range(&mut self, lo: u32, hi: u32) {
        if lo > hi {
            return;
        }
        debug_assert!(hi <= CODE_POINT_MAX);
        self.ranges.push((lo, hi));
        self.normalize();
    }

    /// Union with `other`.
    pub fn add_set(&mut self, other: &UnicodeSet) {
        self.ranges.extend_from_slice(&other.ranges);
        self.normalize();
    }

    /// Remove every member of `other`.
    pub fn remove_set(&mut self, other: &UnicodeSet) {
        let mut mask = other.clone();
        mask.complement();
        self.retain_set(&mask);
    }

    /// Intersect with `other`.
    pub fn retain_set(&mut self, other: &UnicodeSet) {
        let a = &self.ranges;
        let b = &other.ranges;
        let mut out = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let lo = a[i].0.max(b[j].0);
            let hi = a[i].1.min(b[j].1);
            if lo <= hi {
                out.push((lo, hi));
            }
            if a[i].1 < b[j].1 {
                i += 1;
            } else {
                j += 1;
            }
        }
        self.ranges = out;
    }

    /// Complement within `0..=0x10FFFF`.
    pub fn complement(&mut self) {
        let mut out = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = 0u32;
        let mut exhausted = false;
        for &(lo, hi) in &self.ranges {
            if lo > next {
                out.push((next, lo - 1));
            }
            if hi == CODE_POINT_MAX {
                exhausted = true;
                break;
            }
            next = hi + 1;
        }
        if !exhausted && next <= CODE_POINT_MAX {
            out.push((next, CODE_POINT_MAX));
        }
        self.ranges = out;
    }

    /// Restore the sorted / disjoint / non-adjacent invariant.
    fn normalize(&mut self) {
        if self.ranges.len() < 2 {
            return;
        }
        self.ranges.sort_unstable();
        let mut out: Vec<(u32, u32)> = Vec::with_capacity(self.ranges.len());
        for &(lo, hi) in &self.ranges {
            match out.last_mut() {
                // merge overlapping and adjacent ranges
                Some(last) if lo <= last.1.saturating_add(1) => {
                    last.1 = last.1.max(hi);
                }
                _ => out.push((lo, hi)),
            }
        }
        self.ranges = out;
    }
}
