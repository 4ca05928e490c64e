//! Fixed-width element signatures.
//!
//! A signature is a 128-bit Bloom filter with a single hash function. It is
//! maintained incrementally as elements are added to a set and lets
//! containment tests fail fast: if some bit of `a` is missing from `b`, then
//! `a` cannot be a subset of `b`. The converse does not hold, so a passing
//! signature test must always be confirmed by an exact comparison.

use std::fmt;
use std::hash::Hash;

/// Number of bits addressing a slot (2^7 = 128 slots).
const SHIFT: u32 = 7;

/// Multiplier for Fibonacci hashing of element codes.
const GOLDEN: u32 = 0x9E37_79B9;

/// An element that can be stored in a [`BloomSet`](super::BloomSet).
///
/// Elements are ordered (the order is the canonical order used by sets and
/// tries) and expose a 32-bit code from which the signature slot is derived.
pub trait Element: Copy + Ord + Hash + fmt::Debug {
    /// A stable code for this element; distinct elements should have distinct codes.
    fn code(&self) -> u32;
}

impl Element for u32 {
    fn code(&self) -> u32 {
        *self
    }
}

impl Element for usize {
    fn code(&self) -> u32 {
        (*self as u64 ^ (*self as u64 >> 32)) as u32
    }
}

/// 128-bit single-hash Bloom filter over element codes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    low: u64,
    high: u64,
}

impl Signature {
    pub const EMPTY: Signature = Signature { low: 0, high: 0 };

    /// Slot in `0..128` assigned to an element.
    fn slot<T: Element>(element: &T) -> u32 {
        element.code().wrapping_mul(GOLDEN) >> (32 - SHIFT)
    }

    /// Signature of a single element.
    pub fn of_element<T: Element>(element: &T) -> Signature {
        let mut signature = Signature::EMPTY;
        signature.insert(element);
        signature
    }

    /// Signature of a collection of elements.
    pub fn of<'a, T: Element + 'a>(elements: impl IntoIterator<Item = &'a T>) -> Signature {
        let mut signature = Signature::EMPTY;
        for element in elements {
            signature.insert(element);
        }
        signature
    }

    pub fn insert<T: Element>(&mut self, element: &T) {
        let slot = Self::slot(element);
        if slot < 64 {
            self.low |= 1u64 << slot;
        } else {
            self.high |= 1u64 << (slot - 64);
        }
    }

    /// Returns false only if the element is certainly absent.
    pub fn may_contain<T: Element>(&self, element: &T) -> bool {
        let slot = Self::slot(element);
        if slot < 64 {
            self.low & (1u64 << slot) != 0
        } else {
            self.high & (1u64 << (slot - 64)) != 0
        }
    }

    /// Whether every bit of `other` is also set in `self`.
    ///
    /// `a.covers(b) == false` proves that the set behind `b` is not a subset of
    /// the set behind `a`.
    pub fn covers(&self, other: &Signature) -> bool {
        self.low & other.low == other.low && self.high & other.high == other.high
    }

    pub fn union(&self, other: &Signature) -> Signature {
        Signature {
            low: self.low | other.low,
            high: self.high | other.high,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.low == 0 && self.high == 0
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.low.count_ones() + self.high.count_ones()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:016x}{:016x})", self.high, self.low)
    }
}
