//! Append-only sets with a signature for fast containment rejection.

use super::signature::{Element, Signature};
use std::fmt;

/// A set of elements kept as a sorted vector together with its [`Signature`].
///
/// The sorted vector is the exact container; the signature is updated on every
/// insertion. Removing elements is not supported since the signature cannot be
/// updated; derived sets (unions, replacements) are built as new values.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BloomSet<T: Element> {
    elements: Vec<T>,
    signature: Signature,
}

impl<T: Element> Default for BloomSet<T> {
    fn default() -> Self {
        BloomSet::new()
    }
}

impl<T: Element> BloomSet<T> {
    pub fn new() -> Self {
        BloomSet {
            elements: Vec::new(),
            signature: Signature::EMPTY,
        }
    }

    pub fn singleton(element: T) -> Self {
        BloomSet {
            elements: vec![element],
            signature: Signature::of_element(&element),
        }
    }

    /// Build from a vector that may be unsorted and contain duplicates.
    pub fn from_vec(mut elements: Vec<T>) -> Self {
        elements.sort_unstable();
        elements.dedup();
        let signature = Signature::of(&elements);
        BloomSet {
            elements,
            signature,
        }
    }

    /// Insert an element; returns false if it was already present.
    pub fn insert(&mut self, element: T) -> bool {
        match self.elements.binary_search(&element) {
            Ok(_) => false,
            Err(pos) => {
                self.elements.insert(pos, element);
                self.signature.insert(&element);
                true
            }
        }
    }

    pub fn contains(&self, element: &T) -> bool {
        self.signature.may_contain(element) && self.elements.binary_search(element).is_ok()
    }

    /// Whether every element of `self` is in `other`.
    pub fn is_subset(&self, other: &BloomSet<T>) -> bool {
        if self.elements.len() > other.elements.len() || !other.signature.covers(&self.signature) {
            return false;
        }
        let mut rest = other.elements.iter();
        'outer: for element in &self.elements {
            for candidate in rest.by_ref() {
                if candidate == element {
                    continue 'outer;
                }
                if candidate > element {
                    return false;
                }
            }
            return false;
        }
        true
    }

    /// Whether the two sets share an element.
    pub fn intersects(&self, other: &BloomSet<T>) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.elements.len() && j < other.elements.len() {
            match self.elements[i].cmp(&other.elements[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return true,
            }
        }
        false
    }

    /// The union of two sets, computed by merging.
    pub fn union(&self, other: &BloomSet<T>) -> BloomSet<T> {
        if other.elements.is_empty() {
            return self.clone();
        }
        if self.elements.is_empty() {
            return other.clone();
        }
        let mut elements = Vec::with_capacity(self.elements.len() + other.elements.len());
        let (mut i, mut j) = (0, 0);
        while i < self.elements.len() && j < other.elements.len() {
            match self.elements[i].cmp(&other.elements[j]) {
                std::cmp::Ordering::Less => {
                    elements.push(self.elements[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    elements.push(other.elements[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    elements.push(self.elements[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        elements.extend_from_slice(&self.elements[i..]);
        elements.extend_from_slice(&other.elements[j..]);
        BloomSet {
            elements,
            signature: self.signature.union(&other.signature),
        }
    }

    /// `(self \ {excluded}) ∪ other`, built as a new set.
    pub fn replace(&self, excluded: &T, other: &BloomSet<T>) -> BloomSet<T> {
        let mut elements: Vec<T> = self
            .elements
            .iter()
            .filter(|element| *element != excluded)
            .copied()
            .collect();
        elements.extend_from_slice(&other.elements);
        BloomSet::from_vec(elements)
    }

    /// A new set with the elements satisfying the predicate.
    pub fn filtered(&self, mut keep: impl FnMut(&T) -> bool) -> BloomSet<T> {
        let elements: Vec<T> = self.elements.iter().filter(|e| keep(e)).copied().collect();
        let signature = Signature::of(&elements);
        BloomSet {
            elements,
            signature,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Elements in canonical (ascending) order.
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl<T: Element> FromIterator<T> for BloomSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        BloomSet::from_vec(iter.into_iter().collect())
    }
}

impl<T: Element> Extend<T> for BloomSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<'a, T: Element> IntoIterator for &'a BloomSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T: Element> fmt::Debug for BloomSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.elements.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(elements: &[u32]) -> BloomSet<u32> {
        elements.iter().copied().collect()
    }

    #[test]
    fn test_from_vec_sorts_and_dedups() {
        let s = BloomSet::from_vec(vec![5u32, 1, 5, 3, 1]);
        assert_eq!(s.as_slice(), &[1, 3, 5]);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_insert_keeps_order_and_signature() {
        let mut s = BloomSet::new();
        assert!(s.insert(4u32));
        assert!(s.insert(2));
        assert!(!s.insert(4));
        assert_eq!(s.as_slice(), &[2, 4]);
        assert_eq!(s.signature(), &Signature::of(&[2u32, 4]));
        assert!(s.contains(&2));
        assert!(!s.contains(&3));
    }

    #[test]
    fn test_subset() {
        assert!(set(&[]).is_subset(&set(&[1, 2])));
        assert!(set(&[1, 2]).is_subset(&set(&[1, 2])));
        assert!(set(&[2, 9]).is_subset(&set(&[1, 2, 5, 9])));
        assert!(!set(&[2, 8]).is_subset(&set(&[1, 2, 5, 9])));
        assert!(!set(&[1, 2, 3]).is_subset(&set(&[1, 2])));
        assert!(!set(&[10]).is_subset(&set(&[1, 2])));
    }

    #[test]
    fn test_union_and_replace() {
        let a = set(&[1, 4, 6]);
        let b = set(&[2, 4, 7]);
        assert_eq!(a.union(&b).as_slice(), &[1, 2, 4, 6, 7]);
        assert_eq!(a.union(&set(&[])), a);
        assert_eq!(a.replace(&4, &set(&[3, 6])).as_slice(), &[1, 3, 6]);
    }

    #[test]
    fn test_intersects_and_filtered() {
        assert!(set(&[1, 5]).intersects(&set(&[5, 9])));
        assert!(!set(&[1, 5]).intersects(&set(&[2, 9])));
        let odd = set(&[1, 2, 3, 4, 5]).filtered(|e| e % 2 == 1);
        assert_eq!(odd.as_slice(), &[1, 3, 5]);
        assert_eq!(odd.signature(), &Signature::of(&[1u32, 3, 5]));
    }
}
