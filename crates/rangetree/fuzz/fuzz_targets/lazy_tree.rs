#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rangetree::{LazySegmentTree, aggregator::sum::I64SumAggregator};

#[derive(Debug, Arbitrary)]
enum Op {
    Update(u16, u16, i16),
    Assign(u16, u16, i16),
    Query(u16, u16),
}

#[derive(Debug, Arbitrary)]
struct Input {
    values: Vec<i16>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut naive: Vec<i64> = input.values.iter().map(|&v| v as i64).collect();
    let mut tree: LazySegmentTree<I64SumAggregator> = match LazySegmentTree::new(naive.clone()) {
        Ok(tree) => tree,
        Err(err) => {
            assert!(err.is_empty_input());
            return;
        }
    };
    let len = naive.len();

    for op in input.ops {
        match op {
            Op::Update(l, r, v) => {
                let (l, r) = (l as usize, r as usize);
                match tree.update(l, r, v as i64) {
                    Ok(()) => naive[l..=r].iter_mut().for_each(|x| *x += v as i64),
                    Err(err) => assert!(l > r || r >= len, "{err}"),
                }
            }
            Op::Assign(l, r, v) => {
                let (l, r) = (l as usize, r as usize);
                match tree.assign(l, r, v as i64) {
                    Ok(()) => naive[l..=r].iter_mut().for_each(|x| *x = v as i64),
                    Err(err) => assert!(l > r || r >= len, "{err}"),
                }
            }
            Op::Query(l, r) => {
                let (l, r) = (l as usize, r as usize);
                if let Ok(sum) = tree.query(l, r) {
                    assert_eq!(sum, naive[l..=r].iter().sum::<i64>());
                }
            }
        }
    }
    assert_eq!(tree.to_vec(), naive);
});
