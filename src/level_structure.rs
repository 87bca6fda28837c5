//! Level Structure (LS): a stack of Euler-Tour Forests indexed by level
//! `0..=⌊log2 n⌋`, plus per-level sets of spanning (tree) and auxiliary
//! (non-tree) edges. Implements the public `link`/`cut`/`connected` API with
//! the Holm-de Lichtenberg-Thorup replacement search on cut.
//!
//! Grounded in the shape of the teacher's `ETTSolver` (`src/dynamic_2core.rs`
//! in the original crate this is distilled from): a per-level `Vec` of
//! Euler-Tour structures, a level-indexed map of edge classification, and a
//! global edge-to-level map — generalized here from 2-core bookkeeping to
//! plain connectivity, following the replacement-search algorithm as given.

use std::collections::{HashMap, HashSet};

use crate::euler_tour::{EulerTourForest, Vertex};

/// Canonicalizes an unordered pair so it can key a map regardless of the
/// order `link`/`cut` were called with.
fn canon<V: Vertex>(u: V, v: V) -> (V, V) {
    if u <= v {
        (u, v)
    } else {
        (v, u)
    }
}

/// Fully-dynamic undirected graph connectivity with poly-logarithmic
/// amortized update cost. Vertices are opaque keys, materialized lazily on
/// first mention; there is no separate vertex-insertion call.
pub struct LevelStructure<V: Vertex> {
    etfs: Vec<EulerTourForest<V>>,
    spanning: Vec<HashMap<V, HashSet<V>>>,
    auxiliary: Vec<HashMap<V, HashSet<V>>>,
    edge_level: HashMap<(V, V), usize>,
}

impl<V: Vertex> Default for LevelStructure<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex> LevelStructure<V> {
    pub fn new() -> Self {
        Self {
            etfs: vec![EulerTourForest::new()],
            spanning: vec![HashMap::new()],
            auxiliary: vec![HashMap::new()],
            edge_level: HashMap::new(),
        }
    }

    fn ensure_level(&mut self, l: usize) {
        while self.etfs.len() <= l {
            self.etfs.push(EulerTourForest::new());
            self.spanning.push(HashMap::new());
            self.auxiliary.push(HashMap::new());
        }
    }

    fn add_neighbor_set(set: &mut HashMap<V, HashSet<V>>, u: V, v: V) {
        set.entry(u).or_default().insert(v);
        set.entry(v).or_default().insert(u);
    }

    fn remove_neighbor_set(set: &mut HashMap<V, HashSet<V>>, u: V, v: V) {
        if let Some(s) = set.get_mut(&u) {
            s.remove(&v);
            if s.is_empty() {
                set.remove(&u);
            }
        }
        if let Some(s) = set.get_mut(&v) {
            s.remove(&u);
            if s.is_empty() {
                set.remove(&v);
            }
        }
    }

    fn add_spanning(&mut self, l: usize, u: V, v: V) {
        self.ensure_level(l);
        Self::add_neighbor_set(&mut self.spanning[l], u, v);
    }

    fn remove_spanning(&mut self, l: usize, u: V, v: V) {
        Self::remove_neighbor_set(&mut self.spanning[l], u, v);
    }

    fn add_auxiliary(&mut self, l: usize, u: V, v: V) {
        self.ensure_level(l);
        Self::add_neighbor_set(&mut self.auxiliary[l], u, v);
    }

    fn remove_auxiliary(&mut self, l: usize, u: V, v: V) {
        Self::remove_neighbor_set(&mut self.auxiliary[l], u, v);
    }

    fn is_auxiliary(&self, l: usize, u: V, v: V) -> bool {
        self.auxiliary
            .get(l)
            .and_then(|m| m.get(&u))
            .is_some_and(|s| s.contains(&v))
    }

    fn is_spanning(&self, l: usize, u: V, v: V) -> bool {
        self.spanning
            .get(l)
            .and_then(|m| m.get(&u))
            .is_some_and(|s| s.contains(&v))
    }

    fn degree_at(&self, l: usize, v: V) -> usize {
        let span = self.spanning.get(l).and_then(|m| m.get(&v)).map_or(0, |s| s.len());
        let aux = self.auxiliary.get(l).and_then(|m| m.get(&v)).map_or(0, |s| s.len());
        span + aux
    }

    /// An edge entering level `l` must have both endpoints annotated there.
    fn update_link_metadata(&mut self, l: usize, u: V, v: V) {
        self.etfs[l].set_annotation(u, true);
        self.etfs[l].set_annotation(v, true);
    }

    /// An edge leaving level `l` clears an endpoint's annotation there if it
    /// has no other incident edge (spanning or auxiliary) left at `l`.
    fn update_cut_metadata(&mut self, l: usize, u: V, v: V) {
        if self.degree_at(l, u) == 0 {
            self.etfs[l].set_annotation(u, false);
        }
        if self.degree_at(l, v) == 0 {
            self.etfs[l].set_annotation(v, false);
        }
    }

    /// Adds edge `{u, v}`. Idempotent on duplicate edges. If `u, v` were
    /// previously disconnected, adds a spanning edge at level 0; otherwise
    /// adds an auxiliary edge at level 0.
    pub fn link(&mut self, u: V, v: V) {
        assert_ne!(u, v, "LevelStructure::link: self-loops are rejected");
        let key = canon(u, v);
        if self.edge_level.contains_key(&key) {
            return;
        }
        if self.etfs[0].connected(u, v) {
            log::debug!("adding auxiliary edge {u:?}-{v:?} at level 0");
            self.add_auxiliary(0, u, v);
        } else {
            log::debug!("adding spanning edge {u:?}-{v:?} at level 0");
            self.etfs[0].link(u, v);
            self.add_spanning(0, u, v);
        }
        self.edge_level.insert(key, 0);
        self.update_link_metadata(0, u, v);
    }

    /// Removes edge `{u, v}`. Idempotent on absent edges.
    pub fn cut(&mut self, u: V, v: V) {
        if u == v {
            return;
        }
        let key = canon(u, v);
        let Some(l0) = self.edge_level.get(&key).copied() else {
            return;
        };
        self.edge_level.remove(&key);
        if self.is_auxiliary(l0, u, v) {
            log::debug!("cutting auxiliary edge {u:?}-{v:?} at level {l0}");
            self.remove_auxiliary(l0, u, v);
            self.update_cut_metadata(l0, u, v);
            return;
        }
        log::debug!("cutting spanning edge {u:?}-{v:?} at level {l0}");
        self.remove_spanning(l0, u, v);
        self.update_cut_metadata(l0, u, v);
        for l in 0..=l0 {
            self.etfs[l].cut(u, v);
        }
        self.find_replacement(l0, u, v);
    }

    /// Do `u` and `v` lie in the same connected component? O(log n).
    pub fn connected(&mut self, u: V, v: V) -> bool {
        self.etfs[0].connected(u, v)
    }

    /// Holm-de Lichtenberg-Thorup replacement search: `{x, y}` was the
    /// spanning edge just cut, last living at level `l0`. Walks levels
    /// `l0` down to `0`, at each promoting spanning edges inside the
    /// smaller of the two freshly-split components to `l + 1`, then
    /// searching that level's auxiliary edges for one that reconnects the
    /// two sides (promoting non-replacements along the way). Terminates on
    /// the first replacement found, or once level 0 is exhausted.
    fn find_replacement(&mut self, l0: usize, x: V, y: V) {
        for l in (0..=l0).rev() {
            let size_x = self.etfs[l].size(x);
            let size_y = self.etfs[l].size(y);
            let (small, other) = if size_x <= size_y { (x, y) } else { (y, x) };
            self.ensure_level(l + 1);

            // Promote every spanning edge inside the smaller side to l + 1.
            for a in self.etfs[l].annotated_vertices(small) {
                let neighbors: Vec<V> = self
                    .spanning
                    .get(l)
                    .and_then(|m| m.get(&a))
                    .map(|s| s.iter().copied().collect())
                    .unwrap_or_default();
                for b in neighbors {
                    self.remove_spanning(l, a, b);
                    self.add_spanning(l + 1, a, b);
                    self.edge_level.insert(canon(a, b), l + 1);
                    self.etfs[l + 1].link(a, b);
                    self.update_cut_metadata(l, a, b);
                    self.update_link_metadata(l + 1, a, b);
                }
            }

            // Search auxiliary edges inside the smaller side for a
            // replacement; promote the rest to l + 1.
            for a in self.etfs[l].annotated_vertices(small) {
                let neighbors: Vec<V> = self
                    .auxiliary
                    .get(l)
                    .and_then(|m| m.get(&a))
                    .map(|s| s.iter().copied().collect())
                    .unwrap_or_default();
                for b in neighbors {
                    if !self.is_auxiliary(l, a, b) {
                        // Already promoted away earlier in this same scan.
                        continue;
                    }
                    if self.etfs[l].connected(b, other) {
                        log::debug!("replacement edge {a:?}-{b:?} found at level {l}");
                        self.remove_auxiliary(l, a, b);
                        self.add_spanning(l, a, b);
                        self.edge_level.insert(canon(a, b), l);
                        self.update_link_metadata(l, a, b);
                        for j in (0..=l).rev() {
                            self.etfs[j].link(a, b);
                        }
                        return;
                    } else {
                        self.remove_auxiliary(l, a, b);
                        self.add_auxiliary(l + 1, a, b);
                        self.edge_level.insert(canon(a, b), l + 1);
                        self.update_cut_metadata(l, a, b);
                        self.update_link_metadata(l + 1, a, b);
                    }
                }
            }
        }
        log::debug!("no replacement found for {x:?}-{y:?}; components stay disconnected");
    }

    /// Walks `spanning`/`auxiliary`/`edge_level`/`etfs` and checks the
    /// invariants L1-L5 from the specification:
    /// - L1: every live edge is classified at exactly one of `spanning[l]` or
    ///   `auxiliary[l]`, at `l = edge_level`, with no stray bookkeeping
    ///   entries left behind by a promotion or a cut.
    /// - L2/L3: a spanning edge currently at level `l` is a tree edge of
    ///   `etf[j]` for every `j <= l` and of no `etf[j]` for `j > l`; an
    ///   auxiliary edge is a tree edge of no `etf[j]` at all. This is the
    ///   concrete, checkable form of "`etf[l]` represents `F_l`" and
    ///   `F_{l+1} ⊆ F_l`.
    /// - L4: `edge_level <= ⌊log2 n⌋`, `n` the number of distinct vertices
    ///   known to the structure (everyone who's ever been linked or queried).
    /// - L5: a vertex is annotated in `etf[l]` iff it has at least one
    ///   incident spanning or auxiliary edge at level `l`.
    ///
    /// Intended for tests.
    pub fn validate_structure(&mut self) {
        let total_vertices = self.etfs[0].known_vertices().count();
        let level_bound = if total_vertices < 2 {
            0
        } else {
            total_vertices.ilog2() as usize
        };

        for (&(u, v), &level) in self.edge_level.iter() {
            assert!(
                level <= level_bound,
                "edge {u:?}-{v:?} at level {level} exceeds floor(log2 n)={level_bound}"
            );
            let is_spanning = self.is_spanning(level, u, v);
            let is_auxiliary = self.is_auxiliary(level, u, v);
            assert!(
                is_spanning ^ is_auxiliary,
                "edge {u:?}-{v:?} at level {level} must be classified at exactly one of spanning/auxiliary there"
            );
            for j in 0..self.etfs.len() {
                let expected = is_spanning && j <= level;
                assert_eq!(
                    self.etfs[j].linked(u, v),
                    expected,
                    "edge {u:?}-{v:?} (level {level}, spanning={is_spanning}): etf[{j}] linkage mismatch"
                );
            }
        }

        // No stray classification entries: every adjacency recorded in
        // `spanning`/`auxiliary` must agree with `edge_level`.
        for (l, map) in self.spanning.iter().enumerate() {
            for (&u, neighbors) in map.iter() {
                for &v in neighbors {
                    assert_eq!(
                        self.edge_level.get(&canon(u, v)).copied(),
                        Some(l),
                        "stray spanning entry {u:?}-{v:?} at level {l}"
                    );
                }
            }
        }
        for (l, map) in self.auxiliary.iter().enumerate() {
            for (&u, neighbors) in map.iter() {
                for &v in neighbors {
                    assert_eq!(
                        self.edge_level.get(&canon(u, v)).copied(),
                        Some(l),
                        "stray auxiliary entry {u:?}-{v:?} at level {l}"
                    );
                }
            }
        }

        for l in 0..self.etfs.len() {
            let vertices: Vec<V> = self.etfs[l].known_vertices().collect();
            for v in vertices {
                let expected = self.degree_at(l, v) > 0;
                assert_eq!(
                    self.etfs[l].annotation(v),
                    expected,
                    "vertex {v:?} annotation mismatch at level {l}"
                );
            }
        }
    }
}
