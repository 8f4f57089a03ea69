//! Fixed-capacity entity pools.
//!
//! Every entity kind lives in a pre-allocated array with a live-count cursor. Slots
//! `[0, len)` are live; everything past the cursor is stale storage. Removal moves the last
//! live element into the freed slot, so it is O(1) and does not preserve order.

use crate::error::{PoolKind, SimError};

#[derive(Clone, Debug)]
pub struct Pool<T, const N: usize> {
    items: [T; N],
    count: usize,
    kind: PoolKind,
}

impl<T: Copy + Default, const N: usize> Pool<T, N> {
    pub fn new(kind: PoolKind) -> Self {
        Self {
            items: [T::default(); N],
            count: 0,
            kind,
        }
    }
}

impl<T: Copy, const N: usize> Pool<T, N> {
    pub const CAPACITY: usize = N;

    #[inline(always)]
    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.count == N
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    #[inline(always)]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Appends `item` and returns its slot index.
    pub fn create(&mut self, item: T) -> Result<usize, SimError> {
        if self.count == N {
            return Err(SimError::CapacityExceeded {
                pool: self.kind,
                capacity: N,
            });
        }
        let index = self.count;
        self.items[index] = item;
        self.count += 1;
        Ok(index)
    }

    /// Swap-and-shrink removal. After this call the element that used to sit at `len - 1`
    /// lives at `index`; any index held for it is stale. Out-of-range indices are ignored.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.count {
            return None;
        }
        let removed = self.items[index];
        self.count -= 1;
        self.items[index] = self.items[self.count];
        Some(removed)
    }

    /// Visits every live element once, removing those for which `keep` returns false.
    ///
    /// Removal pulls the last element into the current slot, so the cursor only advances
    /// when the current element is kept.
    pub fn retain_mut<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&mut T) -> bool,
    {
        let mut removed = 0;
        let mut index = 0;
        while index < self.count {
            if keep(&mut self.items[index]) {
                index += 1;
            } else {
                self.remove_at(index);
                removed += 1;
            }
        }
        removed
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.count]
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items[..self.count]
    }

    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.as_slice().iter()
    }

    #[inline(always)]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.as_mut_slice().iter_mut()
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;

    type SmallPool = Pool<u32, 4>;

    fn filled(values: &[u32]) -> SmallPool {
        let mut pool = SmallPool::new(PoolKind::Bullets);
        for value in values {
            pool.create(*value).expect("capacity");
        }
        pool
    }

    #[test]
    fn create_until_full_then_reports_capacity() {
        let mut pool = filled(&[1, 2, 3, 4]);
        assert!(pool.is_full());
        assert_eq!(
            pool.create(5),
            Err(SimError::CapacityExceeded {
                pool: PoolKind::Bullets,
                capacity: 4,
            })
        );
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn remove_moves_last_element_into_slot() {
        let mut pool = filled(&[10, 20, 30, 40]);
        assert_eq!(pool.remove_at(1), Some(20));
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(1), Some(&40));
        assert_eq!(pool.as_slice(), &[10, 40, 30]);
    }

    #[test]
    fn removing_sole_element_empties_pool() {
        let mut pool = filled(&[7]);
        assert_eq!(pool.remove_at(0), Some(7));
        assert!(pool.is_empty());
        assert_eq!(pool.iter().count(), 0);
    }

    #[test]
    fn out_of_range_remove_is_ignored() {
        let mut pool = filled(&[1, 2]);
        assert_eq!(pool.remove_at(2), None);
        assert_eq!(pool.remove_at(99), None);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn retain_revisits_swapped_in_element() {
        // Removing index 0 pulls the last element (also odd) into slot 0; it must still be
        // examined rather than skipped.
        let mut pool = filled(&[1, 2, 4, 3]);
        let mut visited = Vec::new();
        let removed = pool.retain_mut(|value| {
            visited.push(*value);
            *value % 2 == 0
        });
        assert_eq!(removed, 2);
        assert_eq!(visited, vec![1, 3, 4, 2]);
        let mut left: Vec<u32> = pool.iter().copied().collect();
        left.sort_unstable();
        assert_eq!(left, vec![2, 4]);
    }

    #[test]
    fn random_operation_sequences_keep_count_in_bounds() {
        let mut rng = SeededRng::new(0xA11C_E123);
        let mut pool: Pool<u32, 16> = Pool::new(PoolKind::Asteroids);
        let mut model: Vec<u32> = Vec::new();

        for step in 0..2_000u32 {
            if rng.next_int(3) == 0 && !model.is_empty() {
                let index = rng.next_int(model.len() as u32) as usize;
                let removed = pool.remove_at(index);
                assert_eq!(removed, Some(model.swap_remove(index)));
            } else {
                let created = pool.create(step);
                if model.len() < 16 {
                    assert_eq!(created, Ok(model.len()));
                    model.push(step);
                } else {
                    assert!(created.is_err());
                }
            }
            assert!(pool.len() <= pool.capacity());
            assert_eq!(pool.as_slice(), model.as_slice());
        }
    }
}
