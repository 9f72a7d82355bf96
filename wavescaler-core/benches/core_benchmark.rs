use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use wavescaler_core::{
    move_item, DropPosition, Group, HistoryManager, Signal, SignalItem, TreePath, WaveDocument,
};

/// Root of `groups` groups with `per_group` signals each.
fn create_test_tree(groups: usize, per_group: usize) -> Vec<SignalItem> {
    (0..groups)
        .map(|g| {
            Group::new(format!("G{g}"))
                .with_items((0..per_group).map(|s| Signal::new(format!("s{g}_{s}"), "01.x=.10").into()))
                .into()
        })
        .collect()
}

fn bench_move_item(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tree Editor");
    group.throughput(Throughput::Elements(1));

    let root = create_test_tree(20, 15);
    let source = TreePath::from([3, 4]);
    let target = TreePath::from([17, 2]);

    group.bench_function("move_item_300_signals", |b| {
        b.iter(|| {
            let moved = move_item(
                black_box(&root),
                black_box(&source),
                black_box(&target),
                DropPosition::After,
            );
            black_box(moved);
        })
    });

    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("History");
    group.throughput(Throughput::Elements(1));

    let base = WaveDocument::with_signals(create_test_tree(20, 15));
    let mut edited = base.clone();
    edited.signal.push(Signal::new("extra", "1").into());

    group.bench_function("save_state_alternating", |b| {
        let mut history = HistoryManager::default();
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let doc = if flip { &edited } else { &base };
            black_box(history.save_state(black_box(doc), None));
        })
    });

    group.bench_function("save_state_duplicate", |b| {
        let mut history = HistoryManager::default();
        history.save_state(&base, None);
        b.iter(|| {
            black_box(history.save_state(black_box(&base), None));
        })
    });

    group.finish();
}

criterion_group!(benches, bench_move_item, bench_history);
criterion_main!(benches);
