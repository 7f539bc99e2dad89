use crate::{Error, LazySegmentTree, aggregator::RangeSumAggregator};

/// A cloneable handle to a [LazySegmentTree] where every call holds one lock for its whole duration
///
/// Push-down rewrites a node and both of its children in several steps, so the lazy tree
/// cannot tolerate interleaving at any finer granularity than a whole operation. Queries
/// mutate too, which is why this is an exclusive lock and not a reader-writer lock.
///
/// By default the handle is single-threaded and backed by `RefCell`. With the `sync`
/// feature it is backed by a `parking_lot` mutex and can be shared between threads.
///
/// # Example
///
/// ```
/// use rangetree::{aggregator::sum::I64SumAggregator, LazySegmentTree, SharedTree};
///
/// let tree: LazySegmentTree<I64SumAggregator> = LazySegmentTree::new(vec![1, 2, 3]).unwrap();
/// let shared = SharedTree::new(tree);
/// let other = shared.clone();
/// other.assign(0, 2, 5).unwrap();
/// assert_eq!(shared.query(0, 2), Ok(15));
/// ```
#[derive(Clone)]
pub struct SharedTree<A: RangeSumAggregator> {
    inner: Inner<A>,
}

impl<A: RangeSumAggregator> SharedTree<A> {
    /// Wraps the given tree
    pub fn new(tree: LazySegmentTree<A>) -> Self {
        Self {
            inner: Inner::new(tree),
        }
    }

    /// Locks the tree for a batch of operations
    ///
    /// With `sync`, calling any other method on this handle or its clones from the thread
    /// that holds the guard deadlocks.
    ///
    /// # Panics
    ///
    /// Without `sync`, panics if a guard from this handle or one of its clones is still alive.
    /// The same holds for every other method since each of them takes the lock.
    #[inline]
    pub fn lock(&self) -> TreeGuard<'_, A> {
        self.inner.lock()
    }

    /// See [LazySegmentTree::update]
    #[inline]
    pub fn update(&self, left: usize, right: usize, add: A::PartialAggregate) -> Result<(), Error> {
        self.lock().update(left, right, add)
    }

    /// See [LazySegmentTree::assign]
    #[inline]
    pub fn assign(
        &self,
        left: usize,
        right: usize,
        value: A::PartialAggregate,
    ) -> Result<(), Error> {
        self.lock().assign(left, right, value)
    }

    /// See [LazySegmentTree::query]
    #[inline]
    pub fn query(&self, left: usize, right: usize) -> Result<A::PartialAggregate, Error> {
        self.lock().query(left, right)
    }

    /// See [LazySegmentTree::get]
    #[inline]
    pub fn get(&self, index: usize) -> Result<A::PartialAggregate, Error> {
        self.lock().get(index)
    }

    /// See [LazySegmentTree::total]
    #[inline]
    pub fn total(&self) -> A::PartialAggregate {
        self.lock().total()
    }

    /// See [LazySegmentTree::len]
    #[inline]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// See [LazySegmentTree::is_empty]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<A: RangeSumAggregator> From<LazySegmentTree<A>> for SharedTree<A> {
    fn from(tree: LazySegmentTree<A>) -> Self {
        Self::new(tree)
    }
}

impl<A: RangeSumAggregator> core::fmt::Debug for SharedTree<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedTree")
            .field("tree", &*self.lock())
            .finish()
    }
}

cfg_not_sync! {
    use alloc::rc::Rc;
    use core::cell::{RefCell, RefMut};

    /// The guard you get from [SharedTree::lock]
    pub type TreeGuard<'a, A> = RefMut<'a, LazySegmentTree<A>>;

    #[derive(Clone)]
    struct Inner<A: RangeSumAggregator>(Rc<RefCell<LazySegmentTree<A>>>);

    impl<A: RangeSumAggregator> Inner<A> {
        #[inline(always)]
        fn new(tree: LazySegmentTree<A>) -> Self {
            Self(Rc::new(RefCell::new(tree)))
        }

        #[inline(always)]
        fn lock(&self) -> TreeGuard<'_, A> {
            self.0.borrow_mut()
        }
    }
}

cfg_sync! {
    use parking_lot::{Mutex, MutexGuard};
    use std::sync::Arc;

    /// The guard you get from [SharedTree::lock]
    pub type TreeGuard<'a, A> = MutexGuard<'a, LazySegmentTree<A>>;

    #[derive(Clone)]
    struct Inner<A: RangeSumAggregator>(Arc<Mutex<LazySegmentTree<A>>>);

    impl<A: RangeSumAggregator> Inner<A> {
        #[inline(always)]
        fn new(tree: LazySegmentTree<A>) -> Self {
            Self(Arc::new(Mutex::new(tree)))
        }

        #[inline(always)]
        fn lock(&self) -> TreeGuard<'_, A> {
            self.0.lock()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::sum::I64SumAggregator;

    fn shared() -> SharedTree<I64SumAggregator> {
        LazySegmentTree::new(vec![5, 8, 6, 3, 2, 7, 2, 6])
            .unwrap()
            .into()
    }

    #[test]
    fn clones_share_state() {
        let a = shared();
        let b = a.clone();
        a.update(1, 7, 2).unwrap();
        assert_eq!(b.query(1, 7), Ok(48));
        b.assign(1, 7, 2).unwrap();
        assert_eq!(a.query(0, 1), Ok(7));
        assert_eq!(a.total(), 19);
        assert_eq!(a.get(7), Ok(2));
        assert_eq!(a.len(), 8);
        assert!(!a.is_empty());
    }

    #[test]
    fn batch_under_one_guard() {
        let a = shared();
        {
            let mut tree = a.lock();
            tree.assign(0, 3, 1).unwrap();
            tree.update(0, 3, 1).unwrap();
        }
        assert_eq!(a.query(0, 3), Ok(8));
    }

    #[test]
    fn errors_pass_through() {
        let a = shared();
        assert!(a.update(5, 4, 1).unwrap_err().is_invalid_range());
        assert!(a.get(8).unwrap_err().is_out_of_bounds());
        assert_eq!(a.total(), 39);
    }

    #[cfg(not(feature = "sync"))]
    #[test]
    #[should_panic]
    fn call_while_locked_panics() {
        let a = shared();
        let b = a.clone();
        let _guard = a.lock();
        let _ = b.total();
    }

    #[cfg(all(feature = "sync", feature = "profiler"))]
    #[test]
    fn profiles_calls_from_threads() {
        let a: SharedTree<I64SumAggregator> = LazySegmentTree::new(vec![1; 32]).unwrap().into();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let tree = a.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        tree.query(i, 31).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let tree = a.lock();
        assert_eq!(tree.stats().query.summary().calls, 100);
        assert_eq!(tree.stats().build.summary().calls, 1);
    }

    #[cfg(feature = "sync")]
    #[test]
    fn concurrent_updates() {
        let a: SharedTree<I64SumAggregator> = LazySegmentTree::new(vec![0; 64]).unwrap().into();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let tree = a.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        tree.update(t * 16, t * 16 + 15, 1).unwrap();
                        let _ = tree.query(0, 63).unwrap();
                        if i % 10 == 0 {
                            tree.assign(t * 16, t * 16, 0).unwrap();
                            tree.update(t * 16, t * 16, (i + 1) as i64).unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        // every block ends with its first element reset to the final update count
        let mut tree = a.lock();
        for t in 0..4 {
            assert_eq!(tree.query(t * 16 + 1, t * 16 + 15), Ok(15 * 100));
            assert_eq!(tree.get(t * 16), Ok(100));
        }
    }
}
