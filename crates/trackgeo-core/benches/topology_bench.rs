//! # Topology Benchmarks
//!
//! Performance benchmarks for projection, distance and search.
//!
//! Run with: `cargo bench -p trackgeo-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use trackgeo_core::{
    Condition, Container, EffectiveDirection, Orientation, Position, Record, RecordId, Topology,
};

/// A lead-in edge followed by `size` diamonds joined by short connectors.
///
/// Every diamond doubles the number of distinct paths, so unconstrained
/// projection and search fan out to `2^size` branches.
fn create_ladder(size: usize) -> Container {
    let mut records = vec![Record::top_edge(
        "IN", "START", "J0", "Ende", "Spitze", "100",
    )];

    for k in 0..size {
        let (from, to, next) = (
            format!("J{}", 2 * k),
            format!("J{}", 2 * k + 1),
            format!("J{}", 2 * k + 2),
        );
        let exit = if k + 1 == size { "Ende" } else { "Spitze" };
        records.push(Record::top_edge(&format!("L{k}"), &from, &to, "Links", "Links", "80"));
        records.push(Record::top_edge(&format!("R{k}"), &from, &to, "Rechts", "Rechts", "95"));
        records.push(Record::top_edge(&format!("C{k}"), &to, &next, "Spitze", exit, "20"));
    }

    let last = format!("C{}", size.saturating_sub(1));
    records.push(Record::point_object(
        "Signal",
        "TARGET",
        vec![Record::placement(&last, "10", Some("in"))],
    ));
    Container::from_records(records)
}

fn start() -> Position {
    Position::at(RecordId::from("IN"), 0, EffectiveDirection::Forward)
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");

    for size in [2, 4, 8] {
        let store = create_ladder(size);
        let topology = Topology::new(&store);
        let distance = 100_000 + 115_000 * size as i64;

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(topology.project(&start(), black_box(distance))));
        });
    }

    group.finish();
}

fn bench_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance");

    for size in [2, 4, 8, 16] {
        let store = create_ladder(size);
        let topology = Topology::new(&store);
        let target = Position::at(
            RecordId::new(format!("C{}", size - 1)),
            10_000,
            EffectiveDirection::Forward,
        );

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(topology.distance(&start(), &target)));
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let condition = Condition::type_is("Signal");

    for size in [2, 4, 8] {
        let store = create_ladder(size);
        let topology = Topology::new(&store);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                black_box(topology.search(&start(), &condition, Orientation::Both, true))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_projection, bench_distance, bench_search);
criterion_main!(benches);
