//! # Property-Based Tests
//!
//! Invariants of the geometry operations, checked with proptest on random
//! branch-free chains whose edges may each run either way.
//!
//! A chain of `n` edges joins nodes `K0..Kn`. Chain coordinates measure
//! track distance from `K0`; a reversed edge has its endpoint A at the
//! far end.

use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::Index;
use trackgeo_core::{
    Condition, Container, EffectiveDirection, Orientation, Position, Record, RecordId, Topology,
};

// =============================================================================
// CHAIN FIXTURE
// =============================================================================

struct Chain {
    store: Container,
    /// (length in mm, reversed) per edge.
    edges: Vec<(i64, bool)>,
}

impl Chain {
    fn build(layout: &[(i64, bool)]) -> Self {
        let n = layout.len();
        let role = |node: usize| if node == 0 || node == n { "Ende" } else { "Verbindung" };

        let records = layout
            .iter()
            .enumerate()
            .map(|(i, &(meters, reversed))| {
                let (a, b) = if reversed { (i + 1, i) } else { (i, i + 1) };
                Record::top_edge(
                    &format!("E{i}"),
                    &format!("K{a}"),
                    &format!("K{b}"),
                    role(a),
                    role(b),
                    &meters.to_string(),
                )
            })
            .collect();

        Self {
            store: Container::from_records(records),
            edges: layout.iter().map(|&(m, r)| (m * 1000, r)).collect(),
        }
    }

    fn total(&self) -> i64 {
        self.edges.iter().map(|(len, _)| len).sum()
    }

    /// Chain coordinate of `offset` on edge `i`.
    fn coordinate(&self, i: usize, offset: i64) -> i64 {
        let before: i64 = self.edges[..i].iter().map(|(len, _)| len).sum();
        let (len, reversed) = self.edges[i];
        before + if reversed { len - offset } else { offset }
    }

    /// +1 when the edge's ascending order runs towards `Kn`.
    fn sense(&self, i: usize) -> i64 {
        if self.edges[i].1 { -1 } else { 1 }
    }

    /// A point strictly inside edge `i`, `permille` of the way from A.
    fn offset(&self, i: usize, permille: i64) -> i64 {
        self.edges[i].0 * permille / 1000
    }
}

fn chain_layout() -> impl Strategy<Value = Vec<(i64, bool)>> {
    vec((1i64..500, any::<bool>()), 1..8)
}

fn facing(forward: bool) -> EffectiveDirection {
    if forward {
        EffectiveDirection::Forward
    } else {
        EffectiveDirection::Reverse
    }
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Projecting by zero returns every reference unchanged.
    #[test]
    fn zero_projection_is_identity(
        layout in chain_layout(),
        at in any::<Index>(),
        permille in 1i64..1000,
        forward in any::<bool>(),
    ) {
        let chain = Chain::build(&layout);
        let i = at.index(layout.len());
        let start = Position::at(RecordId::new(format!("E{i}")), chain.offset(i, permille), facing(forward));

        let results = Topology::new(&chain.store).project(&start, 0).expect("project");
        prop_assert_eq!(results.len(), 1);
        prop_assert_eq!(results[0].refs(), start.refs());
    }

    /// On a branch-free chain, projecting by `d` then by `-d` returns to the
    /// start.
    #[test]
    fn projection_round_trip(
        layout in chain_layout(),
        at in any::<Index>(),
        permille in 1i64..1000,
        target_permille in 0i64..=1000,
        forward in any::<bool>(),
    ) {
        let chain = Chain::build(&layout);
        let topology = Topology::new(&chain.store);
        let i = at.index(layout.len());
        let offset = chain.offset(i, permille);
        let start = Position::at(RecordId::new(format!("E{i}")), offset, facing(forward));

        let x = chain.coordinate(i, offset);
        let t = chain.total() * target_permille / 1000;
        let along = if forward { chain.sense(i) } else { -chain.sense(i) };
        let distance = along * (t - x);

        let there = topology.project(&start, distance).expect("project");
        prop_assert_eq!(there.len(), 1);

        let back = topology.project(&there[0], -distance).expect("project back");
        prop_assert!(
            back.iter().any(|p| p.refs()[0].edge == start.refs()[0].edge
                && p.refs()[0].offset == offset),
            "{:?} -> {:?} -> {:?}", start, there, back
        );
    }

    /// Distance is symmetric and equals the chain-coordinate gap.
    #[test]
    fn distance_is_symmetric(
        layout in chain_layout(),
        a in any::<Index>(),
        b in any::<Index>(),
        pa in 1i64..1000,
        pb in 1i64..1000,
        fa in any::<bool>(),
        fb in any::<bool>(),
    ) {
        let chain = Chain::build(&layout);
        let topology = Topology::new(&chain.store);
        let (i, j) = (a.index(layout.len()), b.index(layout.len()));
        let (oa, ob) = (chain.offset(i, pa), chain.offset(j, pb));
        let p = Position::at(RecordId::new(format!("E{i}")), oa, facing(fa));
        let q = Position::at(RecordId::new(format!("E{j}")), ob, facing(fb));

        let expected = (chain.coordinate(i, oa) - chain.coordinate(j, ob)).abs();
        prop_assert_eq!(topology.distance(&p, &q).expect("distance"), Some(expected));
        prop_assert_eq!(topology.distance(&q, &p).expect("distance"), Some(expected));
    }

    /// Orientation is symmetric and compares facings in chain direction.
    #[test]
    fn orientation_is_symmetric(
        layout in chain_layout(),
        a in any::<Index>(),
        b in any::<Index>(),
        pa in 1i64..1000,
        pb in 1i64..1000,
        fa in any::<bool>(),
        fb in any::<bool>(),
    ) {
        let chain = Chain::build(&layout);
        let topology = Topology::new(&chain.store);
        let (i, j) = (a.index(layout.len()), b.index(layout.len()));
        let p = Position::at(RecordId::new(format!("E{i}")), chain.offset(i, pa), facing(fa));
        let q = Position::at(RecordId::new(format!("E{j}")), chain.offset(j, pb), facing(fb));

        let towards_end = |edge: usize, forward: bool| (chain.sense(edge) > 0) == forward;
        let expected = if towards_end(i, fa) == towards_end(j, fb) {
            Orientation::Equal
        } else {
            Orientation::Opposite
        };
        prop_assert_eq!(topology.orientation(&p, &q).expect("orientation"), expected);
        prop_assert_eq!(topology.orientation(&q, &p).expect("orientation"), expected);
    }

    /// A condition that never holds finds nothing, in either direction.
    #[test]
    fn constant_false_finds_nothing(
        layout in chain_layout(),
        at in any::<Index>(),
        permille in 1i64..1000,
        forward in any::<bool>(),
    ) {
        let chain = Chain::build(&layout);
        let topology = Topology::new(&chain.store);
        let i = at.index(layout.len());
        let start = Position::at(RecordId::new(format!("E{i}")), chain.offset(i, permille), facing(true));

        let matches = topology
            .search(&start, &Condition::Constant(false), Orientation::Both, forward)
            .expect("search");
        prop_assert!(matches.is_empty());
    }

    /// The same chain and query always give the same answer.
    #[test]
    fn projection_is_deterministic(
        layout in chain_layout(),
        at in any::<Index>(),
        permille in 1i64..1000,
        distance in -2_000_000i64..2_000_000,
    ) {
        let first = Chain::build(&layout);
        let second = Chain::build(&layout);
        let i = at.index(layout.len());
        let start = Position::at(RecordId::new(format!("E{i}")), first.offset(i, permille), facing(true));

        let a = Topology::new(&first.store).project(&start, distance).expect("project");
        let b = Topology::new(&second.store).project(&start, distance).expect("project");
        prop_assert_eq!(a, b);
    }
}
