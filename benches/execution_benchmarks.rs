//! Benchmarks for the sort and hash join operators

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use oxiexec::{
    collect_all, ColumnDef, DataType, EvalNode, ExecutionOperator, HashLeftOuterJoinExec, JoinSpec, Schema,
    SeqScanExec, SortExec, SortSpec, TaskContext, Tuple, Value,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;

fn keyed_rows(n: usize, key_range: i64, seed: u64) -> Vec<Tuple> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| vec![Value::Integer(rng.gen_range(0..key_range)), Value::from(format!("row{i}"))])
        .collect()
}

fn schema(prefix: &str) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        ColumnDef::new(format!("{prefix}.k"), DataType::Integer, false),
        ColumnDef::new(format!("{prefix}.v"), DataType::Text, false),
    ]))
}

/// Benchmark the blocking sort on a single integer key
fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");
    group.measurement_time(Duration::from_secs(10));

    let size = 10_000;
    let rows = Arc::new(keyed_rows(size, 1_000, 7));
    group.throughput(Throughput::Elements(size as u64));
    group.bench_function("sort_10k_by_int_key", |b| {
        b.iter_batched(
            || SeqScanExec::new(schema("t"), Arc::clone(&rows)).unwrap(),
            |scan| {
                let mut sort = SortExec::new(TaskContext::default(), Box::new(scan), &[SortSpec::asc("t.k")]).unwrap();
                black_box(collect_all(&mut sort).unwrap())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Benchmark build plus probe of the hash left outer join
fn bench_hash_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_left_outer_join");
    group.measurement_time(Duration::from_secs(10));

    let size = 10_000;
    let left = Arc::new(keyed_rows(size, 2_000, 11));
    let right = Arc::new(keyed_rows(size / 4, 2_000, 13));
    let merged = Schema::merge(&schema("l"), &schema("r"));
    let cond = EvalNode::eq(EvalNode::field(&merged, "l.k").unwrap(), EvalNode::field(&merged, "r.k").unwrap()).unwrap();

    group.throughput(Throughput::Elements(size as u64));
    group.bench_function("join_10k_by_2500", |b| {
        b.iter(|| {
            let l = SeqScanExec::new(schema("l"), Arc::clone(&left)).unwrap();
            let r = SeqScanExec::new(schema("r"), Arc::clone(&right)).unwrap();
            let mut join =
                HashLeftOuterJoinExec::new(TaskContext::default(), JoinSpec::new(cond.clone()), Box::new(l), Box::new(r))
                    .unwrap();
            let mut count = 0usize;
            while join.next().unwrap().is_some() {
                count += 1;
            }
            black_box(count)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_sort, bench_hash_join);
criterion_main!(benches);
