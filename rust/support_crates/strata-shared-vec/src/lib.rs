//! An immutable, cheaply cloneable, and sliceable shared vector slice.
//!
//! `SharedVec<T>` is the storage primitive behind built blocks: a block and every
//! region taken from it point into the same `Arc<Vec<T>>`, while explicit copies
//! ([`SharedVec::compact`], [`SharedVec::gather`]) always land in a fresh allocation
//! that no other holder references.

use std::fmt;
use std::ops::{Deref, RangeBounds};
use std::sync::Arc;

/// Fixed bookkeeping cost of one shared allocation: the two `Arc` reference
/// counters plus the `Vec` header stored inside the `Arc`.
const SHARED_HEADER_SIZE: usize = 2 * std::mem::size_of::<usize>() + 3 * std::mem::size_of::<usize>();

/// An immutable, cheaply cloneable, and sliceable shared vector slice.
///
/// Internally uses `Arc<Vec<T>>` for shared ownership and stores an offset and length
/// to represent a view into the vector.
#[derive(Clone)]
pub struct SharedVec<T> {
    inner: Arc<Vec<T>>,
    offset: usize,
    len: usize,
}

impl<T> SharedVec<T> {
    /// Creates a new `SharedVec` from a `Vec<T>`, taking ownership without copying.
    pub fn from_vec(vec: Vec<T>) -> Self {
        let len = vec.len();
        SharedVec {
            inner: Arc::new(vec),
            offset: 0,
            len,
        }
    }

    /// Creates a new `SharedVec` from a slice by cloning the data.
    pub fn from_slice(slice: &[T]) -> Self
    where
        T: Clone,
    {
        SharedVec::from_vec(slice.to_vec())
    }

    /// Returns an empty `SharedVec`.
    pub fn empty() -> Self {
        SharedVec::from_vec(Vec::new())
    }

    /// Returns the length of the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the element at the given index, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            Some(&self.inner[self.offset + index])
        } else {
            None
        }
    }

    /// Returns the view as a `&[T]`.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.inner[self.offset..self.offset + self.len]
    }

    /// Returns an iterator over the view.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns a sub-view sharing the same allocation.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn slice<R>(&self, range: R) -> Self
    where
        R: RangeBounds<usize>,
    {
        use std::ops::Bound::*;
        let start = match range.start_bound() {
            Included(&n) => n,
            Excluded(&n) => n + 1,
            Unbounded => 0,
        };
        let end = match range.end_bound() {
            Included(&n) => n + 1,
            Excluded(&n) => n,
            Unbounded => self.len,
        };
        assert!(start <= end && end <= self.len, "slice out of bounds");
        SharedVec {
            inner: self.inner.clone(),
            offset: self.offset + start,
            len: end - start,
        }
    }

    /// Copies the view into a new, exactly sized allocation owned only by the result.
    pub fn compact(&self) -> Self
    where
        T: Clone,
    {
        SharedVec::from_slice(self.as_slice())
    }

    /// Builds a new allocation holding the elements at `indices`, in order.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn gather(&self, indices: &[usize]) -> Self
    where
        T: Clone,
    {
        let values = self.as_slice();
        SharedVec::from_vec(indices.iter().map(|&i| values[i].clone()).collect())
    }

    /// Returns `true` if both views point into the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Stable identity of the backing allocation, shared by every view into it.
    pub fn allocation_id(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }

    /// Memory held alive by this view: the full backing allocation, not just
    /// the viewed range.
    pub fn retained_size_in_bytes(&self) -> usize {
        self.inner.capacity() * std::mem::size_of::<T>() + SHARED_HEADER_SIZE
    }

    /// Converts to a `Vec<T>` by cloning the data.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }
}

impl<T> Deref for SharedVec<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsRef<[T]> for SharedVec<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedVec").field(&self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for SharedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for SharedVec<T> {}

impl<T> Default for SharedVec<T> {
    fn default() -> Self {
        SharedVec::empty()
    }
}

impl<'a, T> IntoIterator for &'a SharedVec<T> {
    type Item = &'a T;

    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T> From<Vec<T>> for SharedVec<T> {
    fn from(vec: Vec<T>) -> Self {
        SharedVec::from_vec(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_shares_allocation() {
        let shared = SharedVec::from_vec(vec![1, 2, 3, 4, 5]);
        let sub = shared.slice(1..4);
        assert_eq!(&*sub, &[2, 3, 4]);
        assert!(sub.ptr_eq(&shared));
        assert_eq!(sub.allocation_id(), shared.allocation_id());
        assert_eq!(sub.retained_size_in_bytes(), shared.retained_size_in_bytes());
    }

    #[test]
    fn test_compact_detaches() {
        let shared = SharedVec::from_vec((0..100u64).collect::<Vec<_>>());
        let sub = shared.slice(90..);
        let copy = sub.compact();
        assert_eq!(copy, sub);
        assert!(!copy.ptr_eq(&shared));
        assert!(copy.retained_size_in_bytes() < shared.retained_size_in_bytes());
    }

    #[test]
    fn test_gather() {
        let shared = SharedVec::from_vec(vec![10, 20, 30, 40]).slice(1..);
        let gathered = shared.gather(&[2, 0, 0]);
        assert_eq!(&*gathered, &[40, 20, 20]);
        assert!(!gathered.ptr_eq(&shared));
    }

    #[test]
    fn test_empty_and_default() {
        let empty = SharedVec::<i32>::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.get(0), None);
        assert_eq!(empty, SharedVec::default());
        assert!(empty.slice(..).is_empty());
    }

    #[test]
    #[should_panic(expected = "slice out of bounds")]
    fn test_slice_out_of_bounds() {
        let shared = SharedVec::from_vec(vec![1, 2, 3]);
        let _ = shared.slice(2..5);
    }
}
