use rangetree::{
    LazySegmentTree, SegmentTree,
    aggregator::{max::I64MaxAggregator, sum::I64SumAggregator},
};

fn main() -> Result<(), rangetree::Error> {
    tracing_subscriber::fmt::init();

    let values = vec![5, 8, 6, 3, 2, 7, 2, 6];
    let mut tree: LazySegmentTree<I64SumAggregator> = LazySegmentTree::new(values.clone())?;

    println!("sum [1, 7]: {}", tree.query(1, 7)?);

    tree.update(1, 7, 2)?;
    println!("sum [1, 7] after adding 2: {}", tree.query(1, 7)?);

    tree.assign(1, 7, 2)?;
    println!("sum [1, 7] after assigning 2: {}", tree.query(1, 7)?);
    println!("sum [1, 2]: {}", tree.query(1, 2)?);
    println!("sum [0, 1]: {}", tree.query(0, 1)?);
    println!("sum [5, 7]: {}", tree.query(5, 7)?);
    println!("value at 7: {}", tree.get(7)?);
    println!("current values: {:?}", tree.to_vec());
    println!("initial values: {:?}", tree.initial());

    if let Err(err) = tree.query(3, 8) {
        println!("rejected: {err}");
    }

    let max: SegmentTree<I64MaxAggregator> = SegmentTree::build(values)?;
    println!("max [2, 5]: {}", max.query(2, 5)?);

    Ok(())
}
