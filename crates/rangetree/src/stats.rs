use core::fmt;
use rangetree_stats::{OpProfile, Summary};

/// Profiles for [LazySegmentTree](crate::LazySegmentTree)
///
/// A cloned tree starts with fresh profiles.
#[derive(Clone, Default)]
pub struct Stats {
    /// Building the tree
    pub build: OpProfile,
    /// Range-add updates
    pub update: OpProfile,
    /// Range-assign updates
    pub assign: OpProfile,
    /// Range-sum queries, including point lookups
    pub query: OpProfile,
}

impl Stats {
    fn summaries(&self) -> [(&'static str, Summary); 4] {
        [
            ("build", self.build.summary()),
            ("update", self.update.summary()),
            ("assign", self.assign.summary()),
            ("query", self.query.summary()),
        ]
    }

    pub(crate) fn print(&self) {
        use prettytable::{Table, row};
        let mut table = Table::new();
        table.add_row(row![
            "op",
            "calls",
            "p50",
            "p99",
            "p99.9",
            "max",
            "nodes/call",
            "max nodes",
            "push-downs",
        ]);
        let ns = |p: f64| format!("{:.2}ns", p);

        for (op, summary) in self.summaries() {
            table.add_row(row![
                op,
                summary.calls,
                ns(summary.latency.p50),
                ns(summary.latency.p99),
                ns(summary.latency.p99_9),
                ns(summary.latency.max),
                format!("{:.1}", summary.mean_nodes()),
                summary.max_nodes,
                summary.work.push_downs,
            ]);
        }

        println!("====LazySegmentTree Profiler Dump====");
        table.printstd();
    }
}

impl fmt::Debug for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Stats");
        for (op, summary) in self.summaries() {
            s.field(op, &summary);
        }
        s.finish()
    }
}
