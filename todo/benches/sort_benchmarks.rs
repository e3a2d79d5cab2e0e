//! Sort and submit benchmarks
//!
//! The list is re-sorted on every submission, so submit cost grows with the
//! list. These measure the sort on its own, a reducer submit, and the
//! JSON write-through every engine operation pays for a list of a given size.
//!
//! Run with: `cargo bench -p todo`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::sync::Arc;
use todo::sort::sort_by_text;
use todo::{Config, TodoAction, TodoEngine, TodoEnvironment, TodoItem, TodoReducer, TodoState};
use todo_engine_core::reducer::Reducer;
use todo_engine_testing::{InMemoryStorage, SequentialIdGenerator};

const SIZES: [usize; 4] = [10, 100, 500, 1_000];

fn sorted_items(n: usize) -> Vec<TodoItem> {
    (0..n).map(|i| TodoItem::new(i.to_string(), format!("item {i:06}"))).collect()
}

fn reversed_items(n: usize) -> Vec<TodoItem> {
    let mut items = sorted_items(n);
    items.reverse();
    items
}

fn benchmark_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_by_text");

    for n in SIZES {
        group.throughput(Throughput::Elements(n as u64));

        let sorted = sorted_items(n);
        group.bench_with_input(BenchmarkId::new("already_sorted", n), &sorted, |b, items| {
            b.iter(|| sort_by_text(black_box(items)));
        });

        let reversed = reversed_items(n);
        group.bench_with_input(BenchmarkId::new("reversed", n), &reversed, |b, items| {
            b.iter(|| sort_by_text(black_box(items)));
        });
    }

    group.finish();
}

fn benchmark_reducer_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("reducer_submit");
    let reducer = TodoReducer::new();
    let env = TodoEnvironment::new(Arc::new(SequentialIdGenerator::new()));

    for n in SIZES {
        let mut state = TodoState::new();
        state.items = sorted_items(n);
        // Sorts to the front, so every pass of the sort moves it once.
        state.current_input_text = "a new item".to_string();

        group.bench_with_input(BenchmarkId::from_parameter(n), &state, |b, state| {
            b.iter_batched(
                || state.clone(),
                |mut state| reducer.reduce(&mut state, TodoAction::SubmitInput, &env),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_engine_write_through(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_write_through");

    for n in [10, 100] {
        let storage = InMemoryStorage::new();
        let mut engine = TodoEngine::with_storage(storage, &Config::default()).expect("open engine");
        for item in sorted_items(n) {
            engine.set_input_text(item.text).expect("set input");
            engine.submit_input().expect("submit");
        }

        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| {
                engine.set_input_text(black_box("benchmark")).expect("set input");
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_sort, benchmark_reducer_submit, benchmark_engine_write_through);
criterion_main!(benches);
