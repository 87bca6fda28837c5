//! Euler-Tour Forest (ETF): represents a forest of rooted, undirected trees
//! as sequences of directed half-edge tokens (plus one self-loop per vertex)
//! stored in a single [`BstSeq`]. Link/cut/reroot are ported from the
//! reference `EulerTourForest` in the original Python implementation this
//! crate's specification was distilled from.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::bst_seq::{BstSeq, Idx};

/// A vertex identifier: an opaque, hashable, totally-orderable key. No state
/// is kept per vertex outside the forest; unknown vertices are materialized
/// on first mention.
pub trait Vertex: Copy + Eq + Hash + Ord + Debug {}
impl<T: Copy + Eq + Hash + Ord + Debug> Vertex for T {}

/// Forest of rooted, undirected trees, each represented as one Euler tour.
pub struct EulerTourForest<V: Vertex> {
    seq: BstSeq<(V, V)>,
    /// Directed token `(u, v)` -> the node carrying it. `(v, v)` is present
    /// iff `v` has ever been mentioned.
    edge_map: HashMap<(V, V), Idx>,
}

impl<V: Vertex> Default for EulerTourForest<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex> EulerTourForest<V> {
    pub fn new() -> Self {
        Self {
            seq: BstSeq::new(),
            edge_map: HashMap::new(),
        }
    }

    /// Materializes `v`'s self-loop token if this is its first mention.
    fn ensure_vertex(&mut self, v: V) {
        if !self.edge_map.contains_key(&(v, v)) {
            let idx = self.seq.create((v, v));
            self.edge_map.insert((v, v), idx);
        }
    }

    fn self_loop(&self, v: V) -> Idx {
        self.edge_map[&(v, v)]
    }

    /// Is `{u, v}` currently an edge in the forest? O(1).
    pub fn linked(&self, u: V, v: V) -> bool {
        self.edge_map.contains_key(&(u, v))
    }

    /// Do `u` and `v` lie in the same tree? O(log n).
    pub fn connected(&mut self, u: V, v: V) -> bool {
        self.ensure_vertex(u);
        self.ensure_vertex(v);
        self.seq.root_of(self.self_loop(u)) == self.seq.root_of(self.self_loop(v))
    }

    /// Returns the current root vertex of `v`'s tree. O(log n).
    pub fn get_root(&mut self, v: V) -> V {
        self.ensure_vertex(v);
        let tree = self.seq.root_of(self.self_loop(v));
        let leftmost = self.seq.index(tree, 0).expect("non-empty tree");
        self.seq.value(leftmost).0
    }

    /// Makes `v` the root of its tree. O(log n).
    ///
    /// No-op when `(v, v)` is already leftmost — including the single-vertex
    /// case, where the self-loop is simultaneously leftmost and the target.
    pub fn make_root(&mut self, v: V) {
        self.ensure_vertex(v);
        let node = self.self_loop(v);
        let tree = self.seq.root_of(node);
        let leftmost = self.seq.index(tree, 0).expect("non-empty tree");
        if leftmost == node {
            return;
        }
        log::trace!("rerooting to {v:?}");
        let (old, _rest) = self.seq.pop_front(tree);
        let (l, mid, r) = self.seq.split(node);
        debug_assert_eq!(mid, node);
        let merged = self.seq.merge(r, old, l);
        self.seq.push_front(mid, merged);
    }

    /// Adds edge `{u, v}`. Requires `!connected(u, v)`. O(log n).
    pub fn link(&mut self, u: V, v: V) {
        self.ensure_vertex(u);
        self.ensure_vertex(v);
        assert!(
            !self.connected(u, v),
            "EulerTourForest::link: {u:?} and {v:?} are already connected"
        );
        log::debug!("linking {u:?}-{v:?}");
        self.make_root(u);
        self.make_root(v);
        let uv = self.seq.create((u, v));
        let vu = self.seq.create((v, u));
        self.edge_map.insert((u, v), uv);
        self.edge_map.insert((v, u), vu);
        let tree_u = self.seq.root_of(self.self_loop(u));
        let tree_v = self.seq.root_of(self.self_loop(v));
        let merged = self.seq.merge(tree_u, uv, tree_v);
        self.seq.push_back(merged, vu);
    }

    /// Removes edge `{u, v}`. Must be present; `u != v`. O(log n). A no-op
    /// if the edge isn't present (the caller-visible contract at this layer
    /// only forbids `u == v`; idempotent-on-absence is left to
    /// [`crate::level_structure::LevelStructure`], which is the layer the
    /// specification asks to absorb that redundancy).
    pub fn cut(&mut self, u: V, v: V) {
        assert_ne!(u, v, "EulerTourForest::cut: u and v must differ");
        self.ensure_vertex(u);
        self.ensure_vertex(v);
        if !self.linked(u, v) {
            return;
        }
        log::debug!("cutting {u:?}-{v:?}");
        self.make_root(u);
        let uv = self.edge_map[&(u, v)];
        let vu = self.edge_map[&(v, u)];
        let (l1, alpha, _m1) = self.seq.split(uv);
        let (_m2, beta, r2) = self.seq.split(vu);
        debug_assert_eq!(alpha, uv);
        debug_assert_eq!(beta, vu);
        let (l1, m) = self.seq.pop_back(l1);
        self.seq.merge(l1, m, r2);
        self.edge_map.remove(&(u, v));
        self.edge_map.remove(&(v, u));
    }

    /// Sets `v`'s annotation. O(log n).
    pub fn set_annotation(&mut self, v: V, flag: bool) {
        self.ensure_vertex(v);
        let node = self.self_loop(v);
        self.seq.set_annotation(node, flag);
    }

    pub fn annotation(&mut self, v: V) -> bool {
        self.ensure_vertex(v);
        self.seq.annotation(self.self_loop(v))
    }

    /// Enumerates every annotated vertex in `v`'s tree. Output sensitive.
    pub fn annotated_vertices(&mut self, v: V) -> Vec<V> {
        self.ensure_vertex(v);
        let tree = self.seq.root_of(self.self_loop(v));
        self.seq
            .annotated_nodes(tree)
            .into_iter()
            .map(|idx| self.seq.value(idx).0)
            .collect()
    }

    /// Number of vertices in `v`'s tree. A tree of `n` vertices has `n`
    /// self-loop tokens and `2*(n-1)` half-edge tokens, i.e. `3n-2` sequence
    /// nodes in total, so `n = (len + 2) / 3`.
    pub fn size(&mut self, v: V) -> usize {
        self.ensure_vertex(v);
        (self.seq.len_of(self.self_loop(v)) + 2) / 3
    }

    /// Every vertex materialized in this forest so far (i.e. with a
    /// self-loop token already present), across every tree. Does not
    /// materialize anything. Intended for validators/tests.
    pub fn known_vertices(&self) -> impl Iterator<Item = V> + '_ {
        self.edge_map.keys().filter(|(a, b)| a == b).map(|&(a, _)| a)
    }

    /// Renders the tree containing `v` as an indented ASCII tour, for
    /// interactive debugging.
    pub fn render(&mut self, v: V) -> String {
        self.ensure_vertex(v);
        let tree = self.seq.root_of(self.self_loop(v));
        self.seq.render(tree)
    }

    /// Walks the tree containing `v` and checks the Euler-tour invariants
    /// from the specification: contiguity of consecutive tokens (cyclically)
    /// and the underlying BST-Seq invariants. Intended for tests.
    pub fn validate_structure(&mut self, v: V) {
        self.ensure_vertex(v);
        let tree = self.seq.root_of(self.self_loop(v));
        self.seq.validate_structure(tree);
        let tour = self.seq.inorder(tree);
        for i in 0..tour.len() {
            let (_, b) = tour[i];
            let (c, _) = tour[(i + 1) % tour.len()];
            assert_eq!(*b, *c, "Euler tour not contiguous at position {i}");
        }
    }
}
