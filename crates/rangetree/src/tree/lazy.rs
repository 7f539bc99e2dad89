use core::{marker::PhantomData, mem};

use alloc::{vec, vec::Vec};

#[cfg(feature = "serde")]
use super::check_layout;
use super::midpoint;
use crate::{Error, aggregator::RangeSumAggregator, check_index, check_range};

#[cfg(feature = "profiler")]
use crate::stats::Stats;
#[cfg(feature = "profiler")]
use rangetree_stats::{Measure, Work};

/// Deferred work stored at a node and owed to its children
///
/// A node holds at most one kind of pending work at a time, which is what lets a
/// range-assign cleanly supersede an earlier range-add over the same subtree.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp<T> {
    /// Nothing is owed to the children
    None,
    /// Every element in the subtree must still be increased by the delta.
    ///
    /// The node's own sum does not include it yet.
    Add(T),
    /// Every element in the subtree equals the value.
    ///
    /// The node's own sum already reflects it, the children's sums do not.
    Assign(T),
}

impl<T> PendingOp<T> {
    /// Returns `true` if the op represents [PendingOp::None]
    pub fn is_none(&self) -> bool {
        matches!(self, PendingOp::None)
    }
    /// Returns `true` if the op represents [PendingOp::Add]
    pub fn is_add(&self) -> bool {
        matches!(self, PendingOp::Add(_))
    }
    /// Returns `true` if the op represents [PendingOp::Assign]
    pub fn is_assign(&self) -> bool {
        matches!(self, PendingOp::Assign(_))
    }
}

#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, Copy)]
struct Node<T> {
    sum: T,
    pending: PendingOp<T>,
}

/// A sum segment tree with lazy propagation of range-add and range-assign updates
///
/// The tree is laid out implicitly in a vector: node `1` is the root covering `[0, len - 1]`
/// and node `i` has the children `2i` and `2i + 1`. The vector holds `2 * size` nodes where
/// `size` is the smallest power of two that fits every element.
///
/// All operations run in `O(log n)`. Queries take `&mut self` since they push pending work
/// one level down along the path they visit.
///
/// The tree is not safe to mutate concurrently. Use [SharedTree](crate::SharedTree) to
/// serialize access through one lock per call.
///
/// # Example
///
/// ```
/// use rangetree::{aggregator::sum::I64SumAggregator, LazySegmentTree};
///
/// let mut tree: LazySegmentTree<I64SumAggregator> = LazySegmentTree::new(vec![1, 2, 3, 4]).unwrap();
/// tree.update(0, 3, 10).unwrap();
/// tree.assign(1, 2, 0).unwrap();
/// assert_eq!(tree.to_vec(), vec![11, 0, 0, 14]);
/// assert_eq!(tree.query(0, 3), Ok(25));
/// ```
///
/// Deserialization checks the layout and fails with [Error::EmptyInput] or
/// [Error::InvalidLayout] instead of producing a tree that panics later.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
#[derive(Debug)]
pub struct LazySegmentTree<A: RangeSumAggregator> {
    data: Vec<A::PartialAggregate>,
    size: usize,
    nodes: Vec<Node<A::PartialAggregate>>,
    #[cfg(feature = "profiler")]
    #[cfg_attr(feature = "serde", serde(skip))]
    stats: Stats,
    #[cfg(feature = "profiler")]
    #[cfg_attr(feature = "serde", serde(skip))]
    work: Work,
    #[cfg_attr(feature = "serde", serde(skip))]
    _marker: PhantomData<A>,
}

impl<A: RangeSumAggregator> Clone for LazySegmentTree<A> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            size: self.size,
            nodes: self.nodes.clone(),
            #[cfg(feature = "profiler")]
            stats: Stats::default(),
            #[cfg(feature = "profiler")]
            work: Work::default(),
            _marker: PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawLazyTree<T> {
    data: Vec<T>,
    size: usize,
    nodes: Vec<Node<T>>,
}

#[cfg(feature = "serde")]
impl<'de, A: RangeSumAggregator> serde::Deserialize<'de> for LazySegmentTree<A> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let RawLazyTree { data, size, nodes } =
            <RawLazyTree<A::PartialAggregate> as serde::Deserialize>::deserialize(deserializer)?;
        check_layout(data.len(), size, nodes.len()).map_err(serde::de::Error::custom)?;
        Ok(Self {
            data,
            size,
            nodes,
            #[cfg(feature = "profiler")]
            stats: Stats::default(),
            #[cfg(feature = "profiler")]
            work: Work::default(),
            _marker: PhantomData,
        })
    }
}

impl<A: RangeSumAggregator> LazySegmentTree<A> {
    /// Builds a tree over `values` with [Aggregator::IDENTITY](crate::Aggregator::IDENTITY) as the default value
    ///
    /// Returns [Error::EmptyInput] if `values` is empty.
    pub fn new(values: Vec<A::PartialAggregate>) -> Result<Self, Error> {
        Self::build(values, A::IDENTITY)
    }

    /// Builds a tree over `values`
    ///
    /// `default` fills the node slots that no element maps to. Uses `O(len)` time.
    ///
    /// Returns [Error::EmptyInput] if `values` is empty.
    pub fn build(
        values: Vec<A::PartialAggregate>,
        default: A::PartialAggregate,
    ) -> Result<Self, Error> {
        if values.is_empty() {
            log::warn!("rejected build of a lazy segment tree without elements");
            return Err(Error::EmptyInput);
        }

        #[cfg(feature = "profiler")]
        let measure = Measure::start(Work::default());

        let len = values.len();
        let size = len.next_power_of_two();
        let mut tree = Self {
            data: values,
            size,
            nodes: vec![
                Node {
                    sum: default,
                    pending: PendingOp::None,
                };
                2 * size
            ],
            #[cfg(feature = "profiler")]
            stats: Stats::default(),
            #[cfg(feature = "profiler")]
            work: Work::default(),
            _marker: PhantomData,
        };
        tree.build_node(1, 0, len - 1);

        #[cfg(feature = "profiler")]
        measure.finish(&tree.stats.build, tree.work);

        log::debug!("built lazy segment tree with {len} elements and width {size}");
        Ok(tree)
    }

    fn build_node(&mut self, node: usize, tl: usize, tr: usize) -> A::PartialAggregate {
        self.visit();
        let sum = if tl == tr {
            self.data[tl]
        } else {
            let mid = midpoint(tl, tr);
            let left = self.build_node(2 * node, tl, mid);
            let right = self.build_node(2 * node + 1, mid + 1, tr);
            A::combine(left, right)
        };
        self.nodes[node].sum = sum;
        sum
    }

    /// Adds `add` to every element in the inclusive range `[left, right]`
    ///
    /// Returns [Error::InvalidRange] without touching the tree if `left > right` or `right >= len`.
    ///
    /// # Example
    ///
    /// ```
    /// use rangetree::{aggregator::sum::I32SumAggregator, LazySegmentTree};
    ///
    /// let mut tree: LazySegmentTree<I32SumAggregator> = LazySegmentTree::new(vec![0; 6]).unwrap();
    /// tree.update(2, 4, 3).unwrap();
    /// assert_eq!(tree.to_vec(), vec![0, 0, 3, 3, 3, 0]);
    /// ```
    pub fn update(
        &mut self,
        left: usize,
        right: usize,
        add: A::PartialAggregate,
    ) -> Result<(), Error> {
        check_range(left, right, self.len())?;

        #[cfg(feature = "profiler")]
        let measure = Measure::start(self.work);

        log::trace!("update [{left}, {right}] by {add:?}");
        let last = self.len() - 1;
        self.update_node(1, left, right, add, 0, last);

        #[cfg(feature = "profiler")]
        measure.finish(&self.stats.update, self.work);
        Ok(())
    }

    // Returns the resolved sum of `node` after the update so the parent can rebuild its own.
    fn update_node(
        &mut self,
        node: usize,
        ql: usize,
        qr: usize,
        add: A::PartialAggregate,
        tl: usize,
        tr: usize,
    ) -> A::PartialAggregate {
        self.visit();
        let len = tr - tl + 1;
        if qr < tl || tr < ql {
            return self.resolved(node, len);
        }
        if ql <= tl && tr <= qr {
            self.apply_add(node, add, len);
            return self.resolved(node, len);
        }
        let mid = midpoint(tl, tr);
        self.push_down(node, tl, mid, tr);
        let left = self.update_node(2 * node, ql, qr, add, tl, mid);
        let right = self.update_node(2 * node + 1, ql, qr, add, mid + 1, tr);
        let sum = A::combine(left, right);
        self.nodes[node].sum = sum;
        sum
    }

    /// Overwrites every element in the inclusive range `[left, right]` with `value`
    ///
    /// Returns [Error::InvalidRange] without touching the tree if `left > right` or `right >= len`.
    ///
    /// # Example
    ///
    /// ```
    /// use rangetree::{aggregator::sum::I32SumAggregator, LazySegmentTree};
    ///
    /// let mut tree: LazySegmentTree<I32SumAggregator> = LazySegmentTree::new(vec![1, 2, 3]).unwrap();
    /// tree.assign(0, 1, 9).unwrap();
    /// assert_eq!(tree.to_vec(), vec![9, 9, 3]);
    /// ```
    pub fn assign(
        &mut self,
        left: usize,
        right: usize,
        value: A::PartialAggregate,
    ) -> Result<(), Error> {
        check_range(left, right, self.len())?;

        #[cfg(feature = "profiler")]
        let measure = Measure::start(self.work);

        log::trace!("assign [{left}, {right}] to {value:?}");
        let last = self.len() - 1;
        self.assign_node(1, left, right, value, 0, last);

        #[cfg(feature = "profiler")]
        measure.finish(&self.stats.assign, self.work);
        Ok(())
    }

    // Returns the change in the sum of `node`. Ancestors add it to their own sums instead of
    // recombining their children.
    fn assign_node(
        &mut self,
        node: usize,
        ql: usize,
        qr: usize,
        value: A::PartialAggregate,
        tl: usize,
        tr: usize,
    ) -> A::PartialAggregate {
        self.visit();
        if qr < tl || tr < ql {
            return A::IDENTITY;
        }
        let len = tr - tl + 1;
        if ql <= tl && tr <= qr {
            return self.apply_assign(node, value, len);
        }
        let mid = midpoint(tl, tr);
        self.push_down(node, tl, mid, tr);
        let left = self.assign_node(2 * node, ql, qr, value, tl, mid);
        let right = self.assign_node(2 * node + 1, ql, qr, value, mid + 1, tr);
        let diff = A::combine(left, right);
        let node = &mut self.nodes[node];
        node.sum = A::combine(node.sum, diff);
        diff
    }

    /// Returns the sum of the elements in the inclusive range `[left, right]`
    ///
    /// Returns [Error::InvalidRange] if `left > right` or `right >= len`.
    pub fn query(&mut self, left: usize, right: usize) -> Result<A::PartialAggregate, Error> {
        check_range(left, right, self.len())?;

        #[cfg(feature = "profiler")]
        let measure = Measure::start(self.work);

        let last = self.len() - 1;
        let sum = self.query_node(1, left, right, 0, last);
        log::trace!("query [{left}, {right}] = {sum:?}");

        #[cfg(feature = "profiler")]
        measure.finish(&self.stats.query, self.work);
        Ok(sum)
    }

    fn query_node(
        &mut self,
        node: usize,
        ql: usize,
        qr: usize,
        tl: usize,
        tr: usize,
    ) -> A::PartialAggregate {
        self.visit();
        if qr < tl || tr < ql {
            return A::IDENTITY;
        }
        if ql <= tl && tr <= qr {
            return self.resolved(node, tr - tl + 1);
        }
        let mid = midpoint(tl, tr);
        self.push_down(node, tl, mid, tr);
        A::combine(
            self.query_node(2 * node, ql, qr, tl, mid),
            self.query_node(2 * node + 1, ql, qr, mid + 1, tr),
        )
    }

    /// Returns the current value of the element at `index`
    ///
    /// Returns [Error::OutOfBounds] if `index >= len`.
    pub fn get(&mut self, index: usize) -> Result<A::PartialAggregate, Error> {
        check_index(index, self.len())?;
        self.query(index, index)
    }

    /// Returns the sum of every element in `O(1)`
    pub fn total(&self) -> A::PartialAggregate {
        self.resolved(1, self.len())
    }

    /// Returns the current value of every element
    ///
    /// Pushes all pending work down to the leaves. Uses `O(len)` time.
    pub fn to_vec(&mut self) -> Vec<A::PartialAggregate> {
        let mut out = Vec::with_capacity(self.len());
        let last = self.len() - 1;
        self.collect(1, 0, last, &mut out);
        out
    }

    fn collect(&mut self, node: usize, tl: usize, tr: usize, out: &mut Vec<A::PartialAggregate>) {
        self.visit();
        if tl == tr {
            out.push(self.resolved(node, 1));
            return;
        }
        let mid = midpoint(tl, tr);
        self.push_down(node, tl, mid, tr);
        self.collect(2 * node, tl, mid, out);
        self.collect(2 * node + 1, mid + 1, tr, out);
    }

    /// Returns the values the tree was built from
    ///
    /// Updates never modify these.
    pub fn initial(&self) -> &[A::PartialAggregate] {
        &self.data
    }

    /// Returns the number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the tree has no elements, which a successfully built tree never does
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the width of the tree, the smallest power of two `>= len`
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns an estimation of the heap memory used by the tree
    pub fn size_bytes(&self) -> usize {
        self.data.len() * mem::size_of::<A::PartialAggregate>()
            + self.nodes.len() * mem::size_of::<Node<A::PartialAggregate>>()
    }

    /// Reads a node's sum including its pending add
    #[inline]
    fn resolved(&self, node: usize, len: usize) -> A::PartialAggregate {
        let Node { sum, pending } = self.nodes[node];
        match pending {
            PendingOp::Add(delta) => A::combine(sum, A::scale(delta, len)),
            PendingOp::None | PendingOp::Assign(_) => sum,
        }
    }

    fn apply_add(&mut self, node: usize, delta: A::PartialAggregate, len: usize) {
        let node = &mut self.nodes[node];
        node.pending = match node.pending {
            PendingOp::None => PendingOp::Add(delta),
            PendingOp::Add(pending) => PendingOp::Add(A::combine(pending, delta)),
            PendingOp::Assign(value) => {
                // stays an assign so the node never holds two kinds of pending work
                node.sum = A::combine(node.sum, A::scale(delta, len));
                PendingOp::Assign(A::combine(value, delta))
            }
        };
    }

    // Returns the diff between the new and the previous resolved sum.
    fn apply_assign(
        &mut self,
        node: usize,
        value: A::PartialAggregate,
        len: usize,
    ) -> A::PartialAggregate {
        let previous = self.resolved(node, len);
        let sum = A::scale(value, len);
        let node = &mut self.nodes[node];
        node.sum = sum;
        // leaves have no children to hand an assign to
        node.pending = if len == 1 {
            PendingOp::None
        } else {
            PendingOp::Assign(value)
        };
        A::inverse(sum, previous)
    }

    fn push_down(&mut self, node: usize, tl: usize, mid: usize, tr: usize) {
        let left_len = mid - tl + 1;
        let right_len = tr - mid;
        match mem::replace(&mut self.nodes[node].pending, PendingOp::None) {
            PendingOp::None => {}
            PendingOp::Add(delta) => {
                self.pushed();
                let sum = &mut self.nodes[node].sum;
                *sum = A::combine(*sum, A::scale(delta, left_len + right_len));
                self.apply_add(2 * node, delta, left_len);
                self.apply_add(2 * node + 1, delta, right_len);
            }
            PendingOp::Assign(value) => {
                self.pushed();
                self.apply_assign(2 * node, value, left_len);
                self.apply_assign(2 * node + 1, value, right_len);
            }
        }
    }

    #[inline(always)]
    fn visit(&mut self) {
        #[cfg(feature = "profiler")]
        {
            self.work.nodes += 1;
        }
    }

    #[inline(always)]
    fn pushed(&mut self) {
        #[cfg(feature = "profiler")]
        {
            self.work.push_downs += 1;
        }
    }

    /// Returns the per-operation profiles of the tree
    #[cfg(feature = "profiler")]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Prints latency percentiles and node work of every operation
    #[cfg(feature = "profiler")]
    pub fn print_stats(&self) {
        self.stats.print();
    }
}
