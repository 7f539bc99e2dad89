use core::{marker::PhantomData, mem};

use alloc::{vec, vec::Vec};

#[cfg(feature = "serde")]
use super::check_layout;
use super::midpoint;
use crate::{Error, aggregator::Aggregator, check_index, check_range};

/// This data structure allows range queries and single element modification.
///
/// The tree allocates `2 * size` slots where `size` is the smallest power of two that fits
/// every element. Leaf `i` lives at slot `size + i`, unused leaves hold the identity, and
/// every other slot holds the combination of its two children.
///
/// Works with any [Aggregator], for example MIN and MAX which the lazy tree cannot express.
///
/// # Example
///
/// ```
/// use rangetree::{aggregator::min::I32MinAggregator, SegmentTree};
///
/// let mut tree: SegmentTree<I32MinAggregator> = SegmentTree::build(vec![5, 8, 6, 3, 1, 7, 2, 6]).unwrap();
/// assert_eq!(tree.query(0, 4), Ok(1));
/// tree.assign(4, 9).unwrap();
/// assert_eq!(tree.query(0, 4), Ok(3));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
#[derive(Debug, Clone)]
pub struct SegmentTree<A: Aggregator> {
    buf: Vec<A::PartialAggregate>,
    len: usize,
    size: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    _marker: PhantomData<A>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSegmentTree<T> {
    buf: Vec<T>,
    len: usize,
    size: usize,
}

#[cfg(feature = "serde")]
impl<'de, A: Aggregator> serde::Deserialize<'de> for SegmentTree<A> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let RawSegmentTree { buf, len, size } =
            <RawSegmentTree<A::PartialAggregate> as serde::Deserialize>::deserialize(deserializer)?;
        check_layout(len, size, buf.len()).map_err(serde::de::Error::custom)?;
        Ok(Self {
            buf,
            len,
            size,
            _marker: PhantomData,
        })
    }
}

impl<A: Aggregator> SegmentTree<A> {
    /// Builds a tree over `values`. Uses `O(len)` time.
    ///
    /// Returns [Error::EmptyInput] if `values` is empty.
    pub fn build(values: Vec<A::PartialAggregate>) -> Result<Self, Error> {
        if values.is_empty() {
            log::warn!("rejected build of a segment tree without elements");
            return Err(Error::EmptyInput);
        }
        let len = values.len();
        let size = len.next_power_of_two();
        let mut buf = vec![A::IDENTITY; 2 * size];
        buf[size..size + len].copy_from_slice(&values);
        for i in (1..size).rev() {
            buf[i] = A::combine(buf[i << 1], buf[i << 1 | 1]);
        }
        log::debug!("built segment tree with {len} elements and width {size}");
        Ok(Self {
            buf,
            len,
            size,
            _marker: PhantomData,
        })
    }

    /// Combines the value at `index` with `delta`.
    /// Uses `O(log(len))` time.
    pub fn combine(&mut self, index: usize, delta: A::PartialAggregate) -> Result<(), Error> {
        check_index(index, self.len)?;
        let p = index + self.size;
        self.buf[p] = A::combine(self.buf[p], delta);
        self.fix_up(p);
        Ok(())
    }

    /// Sets the value at `index` and returns the old value.
    /// Uses `O(log(len))` time.
    pub fn assign(
        &mut self,
        index: usize,
        value: A::PartialAggregate,
    ) -> Result<A::PartialAggregate, Error> {
        check_index(index, self.len)?;
        let p = index + self.size;
        let old = mem::replace(&mut self.buf[p], value);
        self.fix_up(p);
        Ok(old)
    }

    fn fix_up(&mut self, mut p: usize) {
        while p > 1 {
            p >>= 1;
            self.buf[p] = A::combine(self.buf[p << 1], self.buf[p << 1 | 1]);
        }
    }

    /// Combines every value in the inclusive range `[left, right]`, walking bottom-up.
    /// Uses `O(log(len))` time.
    ///
    /// Values are combined in index order, so the aggregator only has to be associative.
    pub fn query(&self, left: usize, right: usize) -> Result<A::PartialAggregate, Error> {
        check_range(left, right, self.len)?;
        let mut l = left + self.size;
        let mut r = right + self.size;
        let mut acc_left = A::IDENTITY;
        let mut acc_right = A::IDENTITY;
        while l <= r {
            if l & 1 == 1 {
                acc_left = A::combine(acc_left, self.buf[l]);
                l += 1;
            }
            if r & 1 == 0 {
                acc_right = A::combine(self.buf[r], acc_right);
                r -= 1;
            }
            l >>= 1;
            r >>= 1;
        }
        Ok(A::combine(acc_left, acc_right))
    }

    /// Same as [Self::query] but descends recursively from the root
    pub fn query_top_down(&self, left: usize, right: usize) -> Result<A::PartialAggregate, Error> {
        check_range(left, right, self.len)?;
        Ok(self.query_node(1, left, right, 0, self.size - 1))
    }

    fn query_node(
        &self,
        node: usize,
        ql: usize,
        qr: usize,
        tl: usize,
        tr: usize,
    ) -> A::PartialAggregate {
        if qr < tl || tr < ql {
            return A::IDENTITY;
        }
        if ql <= tl && tr <= qr {
            return self.buf[node];
        }
        let mid = midpoint(tl, tr);
        A::combine(
            self.query_node(2 * node, ql, qr, tl, mid),
            self.query_node(2 * node + 1, ql, qr, mid + 1, tr),
        )
    }

    /// Returns the value at `index`
    pub fn get(&self, index: usize) -> Result<A::PartialAggregate, Error> {
        check_index(index, self.len)?;
        Ok(self.buf[self.size + index])
    }

    /// View the values in this segment tree using a slice. Uses `O(1)` time.
    #[inline]
    pub fn view(&self) -> &[A::PartialAggregate] {
        &self.buf[self.size..self.size + self.len]
    }

    /// The number of elements stored in this segment tree
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree has no elements, which a successfully built tree never does
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
