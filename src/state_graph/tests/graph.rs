use std::collections::{BTreeMap, HashSet};

use cuboid::{CubeState, Dimensions, MoveCatalog, NamedMove, Turn};
use proptest::prelude::*;
use state_graph::{StateGraph, StateGraphBuilder, VertexId, make_graph};

fn dims(s: &str) -> Dimensions {
    s.parse().unwrap()
}

fn graph_of(dimensions: &str, moves: &str) -> StateGraph {
    let catalog = MoveCatalog::new(dims(dimensions));
    make_graph(catalog.dimensions(), catalog.parse(moves).unwrap()).unwrap()
}

fn depth_histogram(graph: &StateGraph) -> BTreeMap<usize, usize> {
    let mut histogram = BTreeMap::new();
    for (id, _) in graph.vertices() {
        *histogram.entry(graph.depth(id).unwrap()).or_default() += 1;
    }
    histogram
}

/// Every edge is a real move, and every permitted move from every expanded
/// vertex lands on a vertex of the graph.
fn assert_closed(graph: &StateGraph) {
    let dims = graph.vertex(graph.root()).unwrap().dimensions();
    for edge in graph.edges() {
        let source = graph.vertex(edge.source).unwrap();
        let target = graph.vertex(edge.target).unwrap();
        assert_eq!(&source.apply_moves(edge.label).unwrap(), target);
        assert!(graph.depth(edge.target).unwrap() <= graph.depth(edge.source).unwrap() + 1);
    }
    for (id, state) in graph.vertices() {
        assert_eq!(state.dimensions(), dims);
        assert_eq!(graph.out_edges(id).len(), graph.permitted_moves().len());
        for &mv in graph.permitted_moves() {
            assert!(graph.contains(&state.apply_moves(mv).unwrap()));
        }
    }
}

#[test_log::test]
fn test_flat_cuboid_half_turns() {
    let graph = graph_of("3x2x1", "R2 D2 U2");
    assert_eq!(graph.vertex_count(), 48);
    assert_eq!(graph.edge_count(), 144);
    assert_eq!(graph.neighbors(graph.root()).len(), 3);
    assert_eq!(graph.diameter_from_root(), 6);
    assert_eq!(
        depth_histogram(&graph),
        BTreeMap::from([(0, 1), (1, 3), (2, 5), (3, 8), (4, 13), (5, 13), (6, 5)])
    );
    assert_closed(&graph);

    let bipartition = graph.bipartition().unwrap();
    assert_eq!((bipartition.even.len(), bipartition.odd.len()), (24, 24));
    assert!(bipartition.even.contains(&graph.root()));
    assert_eq!(graph.simple_edges().len(), 72);
}

#[test_log::test]
fn test_cubie_quarter_turns() {
    let graph = graph_of("1x1x1", "R U");
    assert_eq!(graph.vertex_count(), 24);
    assert_eq!(graph.edge_count(), 48);
    assert_eq!(graph.simple_edges().len(), 48);
    let bipartition = graph.bipartition().unwrap();
    assert_eq!((bipartition.even.len(), bipartition.odd.len()), (12, 12));
    assert_closed(&graph);
}

#[test_log::test]
fn test_pocket_cube_half_turns() {
    let graph = graph_of("2x2x2", "R2 U2 F2");
    assert_eq!(graph.vertex_count(), 24);
    assert_eq!(graph.edge_count(), 72);
    assert_eq!(graph.simple_edges().len(), 36);
    assert_eq!(graph.diameter_from_root(), 4);
    assert_eq!(
        depth_histogram(&graph),
        BTreeMap::from([(0, 1), (1, 3), (2, 6), (3, 9), (4, 5)])
    );
    assert_eq!(
        graph
            .bipartition()
            .map(|bipartition| (bipartition.even.len(), bipartition.odd.len())),
        Some((12, 12))
    );
}

#[test_log::test]
fn test_other_shapes() {
    assert_eq!(graph_of("3x3x3", "R2 L2 U2 D2").vertex_count(), 192);
    assert_eq!(graph_of("3x3x3", "R2 L2 U2 D2").edge_count(), 768);
    assert_eq!(graph_of("3x3x1", "F R2 U2").vertex_count(), 768);
    assert_eq!(graph_of("2x2x1", "R2 U2 F").vertex_count(), 48);
    assert_eq!(graph_of("1x2x3", "R2 U2 F2").vertex_count(), 192);
    assert_eq!(graph_of("1x1x1", "R L").vertex_count(), 4);
}

#[test_log::test]
fn test_pocket_cube_two_generators() {
    let graph = graph_of("2x2x2", "R U");
    assert_eq!(graph.vertex_count(), 29_160);
    assert_eq!(graph.edge_count(), 2 * 29_160);
    assert_eq!(graph.diameter_from_root(), 27);
}

#[test_log::test]
fn test_parallel_matches_sequential() {
    for (dimensions, moves) in [
        ("3x2x1", "R2 D2 U2"),
        ("3x3x3", "R2 L2 U2 D2"),
        ("3x3x1", "F R2 U2"),
        ("2x2x2", "R U"),
    ] {
        let catalog = MoveCatalog::new(dims(dimensions));
        let builder = StateGraphBuilder::new(&catalog, catalog.parse(moves).unwrap()).unwrap();
        let solved = CubeState::solved(catalog.dimensions());

        let sequential = builder.build(&solved).unwrap();
        let parallel = builder.build_parallel(&solved).unwrap();

        assert_eq!(sequential.edges(), parallel.edges(), "{dimensions} {moves}");
        assert!(
            sequential
                .vertices()
                .zip(parallel.vertices())
                .all(|(a, b)| a == b && sequential.depth(a.0) == parallel.depth(b.0))
        );
    }
}

#[test_log::test]
fn test_moves_that_coincide_give_parallel_edges() {
    // With a single layer on the X axis, R and L' turn the same layer the same
    // way
    let graph = graph_of("1x1x1", "R L'");
    assert_eq!(graph.vertex_count(), 4);
    assert_eq!(graph.edge_count(), 8);
    assert_eq!(graph.neighbors(graph.root()).len(), 1);

    let first = graph.neighbors(graph.root())[0];
    assert_eq!(
        graph.moves_between(graph.root(), first).into_iter().collect::<Vec<_>>(),
        [NamedMove::L_PRIME, NamedMove::R]
    );
    assert_eq!(graph.simple_edges().len(), 4);
}

#[test_log::test]
fn test_max_depth() {
    let catalog = MoveCatalog::new(dims("2x2x2"));
    let permitted = catalog.parse("R2 U2 F2").unwrap();
    let solved = CubeState::solved(catalog.dimensions());

    for (max_depth, vertices, edges) in [(0, 1, 0), (1, 4, 3), (2, 10, 12)] {
        let builder = StateGraphBuilder::new(&catalog, permitted.clone())
            .unwrap()
            .with_max_depth(max_depth);
        for graph in [
            builder.build(&solved).unwrap(),
            builder.build_parallel(&solved).unwrap(),
        ] {
            assert_eq!(graph.vertex_count(), vertices);
            assert_eq!(graph.edge_count(), edges);
            assert!(graph.diameter_from_root() <= max_depth);
        }
    }
}

#[test_log::test]
fn test_edge_list_file() {
    let graph = graph_of("1x1x1", "R2 U2");
    let path = std::env::temp_dir().join(format!("edge_list_{}.txt", std::process::id()));
    graph.save_edge_list(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(written, "4 4\n0 1\n0 2\n1 3\n2 3\n");

    let graph = graph_of("3x2x1", "R2 D2 U2");
    let mut out = vec![];
    graph.write_edge_list(&mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    let mut lines = out.lines();
    assert_eq!(lines.next(), Some("48 72"));

    let pairs = lines
        .map(|line| {
            let (u, v) = line.split_once(' ').unwrap();
            (u.parse::<usize>().unwrap(), v.parse::<usize>().unwrap())
        })
        .collect::<Vec<_>>();
    assert_eq!(pairs.len(), 72);
    assert!(pairs.iter().all(|(u, v)| u < v));
    assert!(pairs.is_sorted());
}

fn small_half_turn_graph() -> impl Strategy<Value = (Dimensions, Vec<NamedMove>)> {
    (1..=2_u16, 1..=2_u16, 1..=2_u16).prop_flat_map(|(length, width, height)| {
        let dims = Dimensions::new(length, width, height).unwrap();
        let half_turns = MoveCatalog::new(dims)
            .moves()
            .iter()
            .copied()
            .filter(|mv| mv.turn == Turn::Double)
            .collect::<Vec<_>>();
        (Just(dims), prop::sample::subsequence(half_turns.clone(), 0..=3.min(half_turns.len())))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn proptest_graph_is_reachability_closure((dims, permitted) in small_half_turn_graph()) {
        let graph = make_graph(dims, permitted).unwrap();
        assert_closed(&graph);

        // Every vertex is reached from the root through the recorded edges
        let mut reached = HashSet::from([graph.root()]);
        let mut stack = vec![graph.root()];
        while let Some(id) = stack.pop() {
            for edge in graph.out_edges(id) {
                if reached.insert(edge.target) {
                    stack.push(edge.target);
                }
            }
        }
        prop_assert_eq!(reached.len(), graph.vertex_count());
        prop_assert!((0..graph.vertex_count()).all(|index| reached.contains(&VertexId(index))));
    }

    #[test]
    fn proptest_parallel_build_is_deterministic((dims, permitted) in small_half_turn_graph()) {
        let builder = StateGraphBuilder::new(&MoveCatalog::new(dims), permitted).unwrap();
        let solved = CubeState::solved(dims);
        let sequential = builder.build(&solved).unwrap();
        let parallel = builder.build_parallel(&solved).unwrap();
        prop_assert_eq!(sequential.edges(), parallel.edges());
        prop_assert_eq!(sequential.vertex_count(), parallel.vertex_count());
    }
}
