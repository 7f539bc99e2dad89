use clap::Parser;
use rangetree::{LazySegmentTree, SharedTree, aggregator::sum::I64SumAggregator};
use std::{thread, time::Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 4)]
    threads: usize,
    #[arg(short, long, default_value_t = 1 << 16)]
    len: usize,
    #[arg(short, long, default_value_t = 100_000)]
    ops: usize,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    println!("Running with {:#?}", args);

    let tree: LazySegmentTree<I64SumAggregator> = match LazySegmentTree::new(vec![0; args.len]) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("failed to build tree: {err}");
            std::process::exit(1);
        }
    };
    let shared = SharedTree::new(tree);

    let now = Instant::now();
    let handles: Vec<_> = (0..args.threads)
        .map(|_| {
            let tree = shared.clone();
            let len = args.len;
            let ops = args.ops;
            thread::spawn(move || {
                let mut adds = 0i64;
                for _ in 0..ops {
                    let a = fastrand::usize(0..len);
                    let b = fastrand::usize(0..len);
                    let (l, r) = (a.min(b), a.max(b));
                    if fastrand::bool() {
                        // every add is later visible in the root total
                        tree.update(l, r, 1).expect("range is in bounds");
                        adds += (r - l + 1) as i64;
                    } else {
                        tree.query(l, r).expect("range is in bounds");
                    }
                }
                adds
            })
        })
        .collect();

    let expected: i64 = handles
        .into_iter()
        .map(|h| h.join().expect("worker panicked"))
        .sum();

    println!(
        "Ran {} ops on {} threads in {:?}",
        args.ops * args.threads,
        args.threads,
        now.elapsed()
    );
    println!("total {} expected {}", shared.total(), expected);
    assert_eq!(shared.total(), expected);
}
