use criterion::{Bencher, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rangetree::{
    Aggregator, SegmentTree,
    aggregator::{max::I64MaxAggregator, sum::I64SumAggregator},
};

const SIZES: [usize; 2] = [1 << 10, 1 << 16];

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("point");
    for len in SIZES {
        group.bench_with_input(BenchmarkId::new("sum_query", len), &len, query::<I64SumAggregator>);
        group.bench_with_input(BenchmarkId::new("max_query", len), &len, query::<I64MaxAggregator>);
        group.bench_with_input(
            BenchmarkId::new("sum_query_top_down", len),
            &len,
            query_top_down::<I64SumAggregator>,
        );
        group.bench_with_input(BenchmarkId::new("sum_assign", len), &len, assign::<I64SumAggregator>);
    }
    group.finish();
}

fn prepare_tree<A: Aggregator<PartialAggregate = i64>>(len: usize) -> SegmentTree<A> {
    let values = (0..len).map(|_| fastrand::i64(-1000..1000)).collect();
    SegmentTree::build(values).unwrap()
}

fn generate_range(len: usize) -> (usize, usize) {
    let a = fastrand::usize(0..len);
    let b = fastrand::usize(0..len);
    (a.min(b), a.max(b))
}

fn query<A: Aggregator<PartialAggregate = i64>>(bencher: &mut Bencher, len: &usize) {
    let tree = prepare_tree::<A>(*len);
    bencher.iter(|| {
        let (l, r) = generate_range(*len);
        black_box(tree.query(l, r).unwrap())
    });
}

fn query_top_down<A: Aggregator<PartialAggregate = i64>>(bencher: &mut Bencher, len: &usize) {
    let tree = prepare_tree::<A>(*len);
    bencher.iter(|| {
        let (l, r) = generate_range(*len);
        black_box(tree.query_top_down(l, r).unwrap())
    });
}

fn assign<A: Aggregator<PartialAggregate = i64>>(bencher: &mut Bencher, len: &usize) {
    let mut tree = prepare_tree::<A>(*len);
    bencher.iter(|| {
        let i = fastrand::usize(0..*len);
        black_box(tree.assign(i, fastrand::i64(-10..10)).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
