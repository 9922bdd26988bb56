//! Bounded, order-preserving entity storage.
//!
//! Elements are densely packed in `[0, len)`. Removal shifts the tail down by
//! one so that insertion order is preserved, which lets the world loop remove
//! at a cursor and re-visit the same index on the next iteration.

use crate::error::CollectionError;
use serde::{Deserialize, Serialize};

/// What happens when pushing into a full collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// Drop the element in the last slot and put the incoming one there
    #[default]
    EvictLast,
    /// Refuse the incoming element
    Reject,
    /// Ignore the capacity and keep growing
    Grow,
}

/// Fixed-capacity vector with checked access and an explicit overflow policy
#[derive(Debug, Clone)]
pub struct BoundedCollection<T> {
    items: Vec<T>,
    capacity: usize,
    policy: CapacityPolicy,
    overflow_count: u64,
}

impl<T> BoundedCollection<T> {
    /// Create an empty collection using the default `EvictLast` policy
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_policy(capacity, CapacityPolicy::default())
    }

    /// Create an empty collection with an explicit overflow policy
    pub fn with_policy(capacity: usize, policy: CapacityPolicy) -> Self {
        // Grow collections should not reserve an arbitrarily large buffer up front.
        let reserve = match policy {
            CapacityPolicy::Grow => 0,
            _ => capacity,
        };
        Self {
            items: Vec::with_capacity(reserve),
            capacity,
            policy,
            overflow_count: 0,
        }
    }

    /// Append `value`.
    ///
    /// Returns `Ok(None)` on a normal append and `Ok(Some(evicted))` when an
    /// `EvictLast` collection was full. A full `Reject` collection returns
    /// `CapacityExceeded` and drops `value`.
    pub fn push(&mut self, value: T) -> Result<Option<T>, CollectionError> {
        if self.items.len() < self.capacity || self.policy == CapacityPolicy::Grow {
            self.items.push(value);
            return Ok(None);
        }

        self.overflow_count += 1;
        match self.policy {
            CapacityPolicy::EvictLast => {
                log::warn!(
                    "collection full (capacity {}), evicting last element",
                    self.capacity
                );
                match self.items.last_mut() {
                    Some(slot) => Ok(Some(std::mem::replace(slot, value))),
                    // Zero capacity: nothing to evict, the incoming value is the one lost.
                    None => Ok(Some(value)),
                }
            }
            CapacityPolicy::Reject | CapacityPolicy::Grow => {
                log::warn!("collection full (capacity {}), rejecting push", self.capacity);
                Err(CollectionError::CapacityExceeded {
                    capacity: self.capacity,
                })
            }
        }
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Result<&T, CollectionError> {
        let len = self.items.len();
        self.items
            .get(index)
            .ok_or(CollectionError::IndexOutOfBounds { index, len })
    }

    /// Mutable element at `index`
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, CollectionError> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(CollectionError::IndexOutOfBounds { index, len })
    }

    /// Remove the element at `index`, shifting everything after it down by one.
    /// Ownership passes to the caller.
    pub fn remove_at(&mut self, index: usize) -> Result<T, CollectionError> {
        let len = self.items.len();
        if index >= len {
            return Err(CollectionError::IndexOutOfBounds { index, len });
        }
        Ok(self.items.remove(index))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the last occupied slot, `None` when empty
    #[inline]
    pub fn last_index(&self) -> Option<usize> {
        self.items.len().checked_sub(1)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    /// True when the next push would overflow
    pub fn is_full(&self) -> bool {
        self.policy != CapacityPolicy::Grow && self.items.len() >= self.capacity
    }

    /// Number of pushes that hit a full collection
    pub fn overflow_count(&self) -> u64 {
        self.overflow_count
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a BoundedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn filled(n: usize, capacity: usize) -> BoundedCollection<usize> {
        let mut c = BoundedCollection::with_capacity(capacity);
        for i in 0..n {
            c.push(i).unwrap();
        }
        c
    }

    #[test]
    fn test_empty() {
        let c: BoundedCollection<u8> = BoundedCollection::with_capacity(4);
        assert_eq!(c.len(), 0);
        assert!(c.is_empty());
        assert_eq!(c.last_index(), None);
        assert_eq!(
            c.get(0),
            Err(CollectionError::IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_push_and_get() {
        let c = filled(3, 10);
        assert_eq!(c.len(), 3);
        assert_eq!(c.last_index(), Some(2));
        assert_eq!(*c.get(1).unwrap(), 1);
        assert!(c.get(3).is_err());
    }

    #[test]
    fn test_remove_middle_shifts_tail() {
        let mut c = filled(5, 10);
        assert_eq!(c.remove_at(1).unwrap(), 1);
        assert_eq!(c.as_slice(), &[0, 2, 3, 4]);
    }

    #[test]
    fn test_remove_last_truncates() {
        let mut c = filled(3, 10);
        assert_eq!(c.remove_at(2).unwrap(), 2);
        assert_eq!(c.as_slice(), &[0, 1]);
    }

    #[test]
    fn test_remove_out_of_bounds() {
        let mut c = filled(2, 10);
        assert_eq!(
            c.remove_at(2),
            Err(CollectionError::IndexOutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_evict_last_on_overflow() {
        let mut c = filled(3, 3);
        assert!(c.is_full());

        let evicted = c.push(99).unwrap();
        assert_eq!(evicted, Some(2));
        assert_eq!(c.as_slice(), &[0, 1, 99]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.overflow_count(), 1);
    }

    #[test]
    fn test_reject_on_overflow() {
        let mut c = BoundedCollection::with_policy(2, CapacityPolicy::Reject);
        c.push('a').unwrap();
        c.push('b').unwrap();

        assert_eq!(
            c.push('c'),
            Err(CollectionError::CapacityExceeded { capacity: 2 })
        );
        assert_eq!(c.as_slice(), &['a', 'b']);
        assert_eq!(c.overflow_count(), 1);
    }

    #[test]
    fn test_grow_ignores_capacity() {
        let mut c = BoundedCollection::with_policy(1, CapacityPolicy::Grow);
        for i in 0..5 {
            assert_eq!(c.push(i), Ok(None));
        }
        assert_eq!(c.len(), 5);
        assert!(!c.is_full());
        assert_eq!(c.overflow_count(), 0);
    }

    #[test]
    fn test_zero_capacity_evict_returns_incoming() {
        let mut c = BoundedCollection::with_capacity(0);
        assert_eq!(c.push(7), Ok(Some(7)));
        assert!(c.is_empty());
    }

    #[test]
    fn test_move_between_collections() {
        let mut alive = BoundedCollection::with_capacity(4);
        let mut dead = BoundedCollection::with_capacity(4);
        alive.push(String::from("a")).unwrap();
        alive.push(String::from("b")).unwrap();

        let moved = alive.remove_at(0).unwrap();
        dead.push(moved).unwrap();

        assert_eq!(alive.as_slice(), &["b".to_string()]);
        assert_eq!(dead.as_slice(), &["a".to_string()]);
    }

    #[test]
    fn test_revisit_after_remove() {
        // Remove every even value while scanning with a cursor.
        let mut c = filled(8, 8);
        let mut visited = Vec::new();
        let mut i = 0;
        while i < c.len() {
            let v = *c.get(i).unwrap();
            visited.push(v);
            if v % 2 == 0 {
                c.remove_at(i).unwrap();
            } else {
                i += 1;
            }
        }
        assert_eq!(visited, (0..8).collect::<Vec<_>>());
        assert_eq!(c.as_slice(), &[1, 3, 5, 7]);
    }

    proptest! {
        #[test]
        fn proptest_order_preserved(
            ops in proptest::collection::vec((any::<bool>(), 0usize..16), 0..64),
        ) {
            let mut c = BoundedCollection::with_policy(1000, CapacityPolicy::Reject);
            let mut model: Vec<usize> = Vec::new();
            let mut next = 0usize;

            for (is_push, idx) in ops {
                if is_push || model.is_empty() {
                    c.push(next).unwrap();
                    model.push(next);
                    next += 1;
                } else {
                    let i = idx % model.len();
                    prop_assert_eq!(c.remove_at(i).unwrap(), model.remove(i));
                }
            }

            prop_assert_eq!(c.as_slice(), model.as_slice());
            prop_assert!(c.as_slice().windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn proptest_remove_shifts_by_one(n in 1usize..32, seed in any::<usize>()) {
            let mut c = filled(n, 64);
            let i = seed % n;
            let before: Vec<usize> = c.as_slice().to_vec();

            c.remove_at(i).unwrap();

            prop_assert_eq!(c.len(), n - 1);
            prop_assert_eq!(&c.as_slice()[..i], &before[..i]);
            prop_assert_eq!(&c.as_slice()[i..], &before[i + 1..]);
        }

        #[test]
        fn proptest_overflow_keeps_len(capacity in 1usize..16, extra in 1usize..8) {
            let mut c = filled(capacity, capacity);
            for k in 0..extra {
                let evicted = c.push(1000 + k).unwrap();
                prop_assert!(evicted.is_some());
                prop_assert_eq!(c.len(), capacity);
                prop_assert_eq!(*c.get(capacity - 1).unwrap(), 1000 + k);
            }
            prop_assert_eq!(c.overflow_count(), extra as u64);
        }
    }
}
