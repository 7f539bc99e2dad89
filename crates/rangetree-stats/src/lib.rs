//! Per-operation profiles for the `profiler` feature of rangetree.
//!
//! An [OpProfile] keeps a latency sketch of one tree operation next to the amount of
//! [Work] its calls did: how many nodes the recursion entered and how many nodes handed
//! pending updates down to their children.
#![deny(missing_docs)]
#![forbid(unsafe_code)]

use minstant::Instant;
use sketches_ddsketch::{Config, DDSketch};

#[cfg(not(feature = "sync"))]
type Shared<T> = std::rc::Rc<core::cell::RefCell<T>>;
#[cfg(feature = "sync")]
type Shared<T> = std::sync::Arc<parking_lot::Mutex<T>>;

/// Counters a tree bumps while walking its nodes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Work {
    /// Nodes entered by the recursion
    pub nodes: u64,
    /// Nodes that handed pending work to their children
    pub push_downs: u64,
}

impl Work {
    /// Returns the work done since the `earlier` snapshot
    #[inline]
    pub fn since(self, earlier: Work) -> Work {
        Work {
            nodes: self.nodes.saturating_sub(earlier.nodes),
            push_downs: self.push_downs.saturating_sub(earlier.push_downs),
        }
    }
}

/// Latency percentiles in nanoseconds
#[derive(Debug, Default, Clone, Copy)]
pub struct Percentiles {
    /// Fastest call
    pub min: f64,
    /// Median
    pub p50: f64,
    /// 99th percentile
    pub p99: f64,
    /// 99.9th percentile
    pub p99_9: f64,
    /// Slowest call
    pub max: f64,
}

/// Everything an [OpProfile] recorded so far
#[derive(Debug, Default, Clone, Copy)]
pub struct Summary {
    /// Number of recorded calls
    pub calls: usize,
    /// Latency of the calls
    pub latency: Percentiles,
    /// Work summed over every call
    pub work: Work,
    /// Most nodes a single call entered
    pub max_nodes: u64,
}

impl Summary {
    /// Average number of nodes entered per call
    pub fn mean_nodes(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.work.nodes as f64 / self.calls as f64
        }
    }
}

struct Recorded {
    latency: DDSketch,
    work: Work,
    max_nodes: u64,
}

impl Default for Recorded {
    fn default() -> Self {
        Self {
            latency: DDSketch::new(Config::new(0.01, 2048, 1.0e-9)),
            work: Work::default(),
            max_nodes: 0,
        }
    }
}

/// A shared handle to the profile of one operation
///
/// Clones record into the same profile. The handle is `Rc`-backed by default and
/// `Arc<parking_lot::Mutex>`-backed with the `sync` feature.
#[derive(Clone, Default)]
pub struct OpProfile {
    inner: Shared<Recorded>,
}

impl OpProfile {
    #[cfg(not(feature = "sync"))]
    #[inline]
    fn with<R>(&self, f: impl FnOnce(&mut Recorded) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }

    #[cfg(feature = "sync")]
    #[inline]
    fn with<R>(&self, f: impl FnOnce(&mut Recorded) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Records one call that took `nanos` and did `work`
    pub fn record(&self, nanos: f64, work: Work) {
        self.with(|r| {
            r.latency.add(nanos);
            r.work.nodes += work.nodes;
            r.work.push_downs += work.push_downs;
            r.max_nodes = r.max_nodes.max(work.nodes);
        })
    }

    /// Returns what was recorded so far
    pub fn summary(&self) -> Summary {
        self.with(|r| {
            let quantile = |q: f64| r.latency.quantile(q).ok().flatten().unwrap_or(0.0);
            Summary {
                calls: r.latency.count(),
                latency: Percentiles {
                    min: r.latency.min().unwrap_or(0.0),
                    p50: quantile(0.5),
                    p99: quantile(0.99),
                    p99_9: quantile(0.999),
                    max: r.latency.max().unwrap_or(0.0),
                },
                work: r.work,
                max_nodes: r.max_nodes,
            }
        })
    }
}

/// A started measurement of one call
///
/// The tree snapshots its [Work] counters when the call starts and hands the counters
/// back to [Measure::finish] once the call is done.
#[must_use = "a measurement records nothing until it is finished"]
pub struct Measure {
    start: Instant,
    work: Work,
}

impl Measure {
    /// Starts measuring from the current counters
    #[inline]
    pub fn start(work: Work) -> Self {
        Self {
            start: Instant::now(),
            work,
        }
    }

    /// Records the elapsed time and the work done since [Measure::start] into `profile`
    #[inline]
    pub fn finish(self, profile: &OpProfile, work: Work) {
        profile.record(
            self.start.elapsed().as_nanos() as f64,
            work.since(self.work),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(nodes: u64, push_downs: u64) -> Work {
        Work { nodes, push_downs }
    }

    #[test]
    fn records_work_per_call() {
        let profile = OpProfile::default();
        profile.record(100.0, work(7, 0));
        profile.record(300.0, work(3, 2));

        let summary = profile.summary();
        assert_eq!(summary.calls, 2);
        assert_eq!(summary.work, work(10, 2));
        assert_eq!(summary.max_nodes, 7);
        assert_eq!(summary.mean_nodes(), 5.0);
        assert_eq!(summary.latency.min, 100.0);
        assert_eq!(summary.latency.max, 300.0);
    }

    #[test]
    fn empty_profile() {
        let summary = OpProfile::default().summary();
        assert_eq!(summary.calls, 0);
        assert_eq!(summary.mean_nodes(), 0.0);
        assert_eq!(summary.latency.p99, 0.0);
    }

    #[test]
    fn measure_counts_the_difference() {
        let profile = OpProfile::default();
        let measure = Measure::start(work(40, 5));
        measure.finish(&profile, work(47, 6));
        assert_eq!(profile.summary().work, work(7, 1));
    }

    #[test]
    fn clones_share_samples() {
        let profile = OpProfile::default();
        let other = profile.clone();
        other.record(10.0, work(1, 0));
        assert_eq!(profile.summary().calls, 1);
    }

    #[cfg(feature = "sync")]
    #[test]
    fn records_from_threads() {
        let profile = OpProfile::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let profile = profile.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        profile.record(1.0, work(2, 1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let summary = profile.summary();
        assert_eq!(summary.calls, 200);
        assert_eq!(summary.work, work(400, 200));
    }
}
