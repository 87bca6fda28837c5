use dynamic_connectivity::EulerTourForest;

mod common;
use common::init_logger;

#[test]
fn link_cut_sanity() {
    init_logger();
    let mut f: EulerTourForest<i32> = EulerTourForest::new();
    f.link(1, 2);
    f.link(2, 3);
    f.link(4, 5);
    f.validate_structure(1);
    f.validate_structure(4);

    assert!(f.connected(1, 3));
    assert!(!f.connected(1, 4));
    assert_eq!(f.size(1), 3);
    assert_eq!(f.size(4), 2);

    f.cut(2, 3);
    f.validate_structure(1);
    f.validate_structure(3);
    assert!(!f.connected(1, 3));
    assert_eq!(f.size(1), 2);
    assert_eq!(f.size(3), 1);
}

#[test]
fn make_root_is_idempotent_and_updates_get_root() {
    init_logger();
    let mut f: EulerTourForest<i32> = EulerTourForest::new();
    f.link(1, 2);
    f.link(2, 3);
    f.link(3, 4);

    f.make_root(3);
    assert_eq!(f.get_root(3), 3);
    assert_eq!(f.get_root(1), 3);
    f.make_root(3);
    assert_eq!(f.get_root(3), 3);
    f.validate_structure(3);

    f.make_root(1);
    assert_eq!(f.get_root(1), 1);
    f.validate_structure(1);
}

#[test]
fn make_root_on_isolated_vertex_is_a_no_op() {
    init_logger();
    let mut f: EulerTourForest<i32> = EulerTourForest::new();
    f.make_root(7);
    assert_eq!(f.get_root(7), 7);
    assert_eq!(f.size(7), 1);
    f.validate_structure(7);
}

#[test]
fn link_then_cut_restores_original_components() {
    init_logger();
    let mut f: EulerTourForest<i32> = EulerTourForest::new();
    f.link(1, 2);
    f.link(3, 4);
    assert!(!f.connected(1, 3));
    f.link(2, 3);
    assert!(f.connected(1, 4));
    f.cut(2, 3);
    assert!(!f.connected(1, 4));
    assert!(f.connected(1, 2));
    assert!(f.connected(3, 4));
}

#[test]
fn annotated_vertices_are_scoped_to_their_own_tree() {
    init_logger();
    let mut f: EulerTourForest<i32> = EulerTourForest::new();
    f.link(1, 2);
    f.link(2, 3);
    f.link(10, 11);
    f.set_annotation(1, true);
    f.set_annotation(3, true);
    f.set_annotation(10, true);

    let mut in_first_tree = f.annotated_vertices(2);
    in_first_tree.sort();
    assert_eq!(in_first_tree, vec![1, 3]);

    let in_second_tree = f.annotated_vertices(11);
    assert_eq!(in_second_tree, vec![10]);
}

#[test]
fn cut_of_a_non_edge_is_a_no_op() {
    init_logger();
    let mut f: EulerTourForest<i32> = EulerTourForest::new();
    f.link(1, 2);
    f.cut(1, 3);
    assert!(f.connected(1, 2));
    f.validate_structure(1);
}

#[test]
fn random_tree_stress() {
    init_logger();
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(4815162342);
    // Two disjoint trees in the same forest, at contiguous but non-overlapping
    // vertex ranges, so `parent` stays a flat array while `connected` has
    // genuine pairs to answer `false` for (a single tree can only ever answer
    // `true`).
    let l = 1024;
    let second_len = 64;
    let total = l + second_len;
    let mut parent = vec![0usize; total];
    for (i, p) in parent.iter_mut().enumerate() {
        *p = i;
    }
    let mut f: EulerTourForest<usize> = EulerTourForest::new();
    for i in 1..l {
        let p = rng.gen_range(0..i);
        parent[i] = p;
        f.link(p, i);
        f.validate_structure(0);
    }
    for i in 1..second_len {
        let v = l + i;
        let p = l + rng.gen_range(0..i);
        parent[v] = p;
        f.link(p, v);
        f.validate_structure(l);
    }

    fn brute_root(parent: &[usize], mut v: usize) -> usize {
        while parent[v] != v {
            v = parent[v];
        }
        v
    }
    for i in (0..total).step_by(7) {
        f.make_root(i);
        assert_eq!(f.get_root(i), i);
        f.validate_structure(i);
    }
    // Exhaustive per spec.md scenario S2: every pair, not a sampled subset.
    // Includes pairs straddling the two trees, which must come back `false`.
    for i in 0..total {
        for j in 0..total {
            assert_eq!(
                f.connected(i, j),
                brute_root(&parent, i) == brute_root(&parent, j),
                "mismatch for ({i}, {j})"
            );
        }
    }
}
